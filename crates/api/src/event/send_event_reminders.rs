use super::subscribers::{notifiable_user_ids, notify_users};
use crate::shared::usecase::UseCase;
use klubb_domain::NotificationKind;
use klubb_infra::KlubbContext;
use tracing::info;

/// One reminder tick. Finds published events starting inside the
/// configured lookahead window that have no reminder yet, claims each
/// one atomically and fans out `EventReminder` notifications.
///
/// The claim happens before the fan-out: `mark_reminder_sent` only
/// succeeds when the flag was still unset, so two overlapping ticks
/// cannot remind about the same event twice.
#[derive(Debug)]
pub struct SendEventRemindersUseCase;

#[derive(Debug)]
pub struct ReminderReport {
    pub events_reminded: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendEventRemindersUseCase {
    type Response = ReminderReport;

    type Error = UseCaseError;

    const NAME: &'static str = "SendEventReminders";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let window_start = now + ctx.config.reminder_lookahead_start_millis;
        let window_end = now + ctx.config.reminder_lookahead_end_millis;

        let upcoming = ctx
            .repos
            .events
            .find_in_reminder_window(window_start, window_end)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let mut events_reminded = 0;
        for event in upcoming {
            let claimed = ctx
                .repos
                .events
                .mark_reminder_sent(&event.id)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            if !claimed {
                continue;
            }

            notify_users(
                notifiable_user_ids(ctx).await,
                &event,
                NotificationKind::EventReminder,
                event.title.clone(),
                format!("\"{}\" starts in about an hour.", event.title),
                ctx,
            )
            .await;
            events_reminded += 1;
        }

        if events_reminded > 0 {
            info!("Sent reminders for {} upcoming events", events_reminded);
        }

        Ok(ReminderReport { events_reminded })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::event::change_event_status::ChangeEventStatusUseCase;
    use crate::event::create_event::CreateEventUseCase;
    use crate::shared::usecase::execute;
    use klubb_domain::{Event, EventLocation, EventStatus, User, ID};
    use klubb_infra::{FixedTimeSys, InMemoryMailTransport};
    use std::sync::Arc;

    async fn seed_published_event(ctx: &KlubbContext, start_ts: i64) -> Event {
        let event = execute(
            CreateEventUseCase {
                title: "Klubbkveld".into(),
                description: "".into(),
                start_ts,
                end_ts: start_ts + 1000 * 60 * 60,
                location: EventLocation::Offline {
                    address: "Klubbhuset".into(),
                },
                registration: Default::default(),
                created_by: ID::new(),
            },
            ctx,
        )
        .await
        .expect("To create event");
        execute(
            ChangeEventStatusUseCase {
                event_id: event.id,
                status: EventStatus::Published,
                reason: None,
            },
            ctx,
        )
        .await
        .expect("To publish event")
        .event
    }

    struct TestContext {
        ctx: KlubbContext,
        sys: Arc<FixedTimeSys>,
        member: User,
    }

    async fn setup() -> TestContext {
        let mut ctx = KlubbContext::create_inmemory();
        let sys = Arc::new(FixedTimeSys::new(0));
        ctx.sys = sys.clone();
        ctx.mailer = Arc::new(InMemoryMailTransport::new());

        let mut member = User::new("kari@klubb.no".into(), "Kari".into(), "h".into(), 0);
        member.verified = true;
        ctx.repos.users.insert(&member).await.unwrap();

        TestContext { ctx, sys, member }
    }

    async fn reminder_count(ctx: &KlubbContext, member: &User) -> usize {
        ctx.repos
            .notifications
            .find_by_recipient(&member.id, Default::default(), 0)
            .await
            .unwrap()
            .iter()
            .filter(|n| n.kind == NotificationKind::EventReminder)
            .count()
    }

    #[actix_web::main]
    #[test]
    async fn reminds_exactly_once_per_event() {
        let TestContext { ctx, member, .. } = setup().await;

        // Event starts 55 min from now, inside the 50-60 min window
        seed_published_event(&ctx, 55 * 60 * 1000).await;

        let report = execute(SendEventRemindersUseCase, &ctx)
            .await
            .expect("To run reminder tick");
        assert_eq!(report.events_reminded, 1);
        assert_eq!(reminder_count(&ctx, &member).await, 1);

        let report = execute(SendEventRemindersUseCase, &ctx)
            .await
            .expect("To run reminder tick again");
        assert_eq!(report.events_reminded, 0);
        assert_eq!(reminder_count(&ctx, &member).await, 1);
    }

    #[actix_web::main]
    #[test]
    async fn skips_events_outside_the_window() {
        let TestContext { ctx, sys, member } = setup().await;

        // Too late for this tick at 90 minutes out
        seed_published_event(&ctx, 90 * 60 * 1000).await;
        let report = execute(SendEventRemindersUseCase, &ctx)
            .await
            .expect("To run reminder tick");
        assert_eq!(report.events_reminded, 0);

        // A later tick catches it once the window reaches the event
        sys.set(35 * 60 * 1000);
        let report = execute(SendEventRemindersUseCase, &ctx)
            .await
            .expect("To run reminder tick");
        assert_eq!(report.events_reminded, 1);
        assert_eq!(reminder_count(&ctx, &member).await, 1);
    }

    #[actix_web::main]
    #[test]
    async fn drafts_get_no_reminder() {
        let TestContext { ctx, member, .. } = setup().await;

        execute(
            CreateEventUseCase {
                title: "Utkast".into(),
                description: "".into(),
                start_ts: 55 * 60 * 1000,
                end_ts: 56 * 60 * 1000,
                location: EventLocation::Online {
                    url: "https://klubb.no".into(),
                },
                registration: Default::default(),
                created_by: ID::new(),
            },
            &ctx,
        )
        .await
        .expect("To create draft event");

        let report = execute(SendEventRemindersUseCase, &ctx)
            .await
            .expect("To run reminder tick");
        assert_eq!(report.events_reminded, 0);
        assert_eq!(reminder_count(&ctx, &member).await, 0);
    }
}
