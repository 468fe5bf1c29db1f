use super::subscribers::{notifiable_user_ids, notify_users, participant_ids};
use crate::error::KlubbError;
use crate::shared::auth::protect_admin_route;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::change_event_status::{APIResponse, PathParams, RequestBody};
use klubb_domain::{Event, EventStatus, NotificationKind, ID};
use klubb_infra::KlubbContext;

pub async fn change_event_status_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let _admin = protect_admin_route(&http_req, &ctx).await?;
    let body = body.0;

    let usecase = ChangeEventStatusUseCase {
        event_id: path_params.event_id.clone(),
        status: body.status,
        reason: body.reason,
    };

    execute(usecase, &ctx)
        .await
        .map(|change| HttpResponse::Ok().json(APIResponse::new(change.event)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct ChangeEventStatusUseCase {
    pub event_id: ID,
    pub status: EventStatus,
    pub reason: Option<String>,
}

/// The subscribers need the transition, not just the resulting event.
#[derive(Debug)]
pub struct StatusChange {
    pub event: Event,
    pub previous: EventStatus,
    pub reason: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    MissingCancellationReason,
    InvalidTransition {
        from: EventStatus,
        to: EventStatus,
    },
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => {
                Self::NotFound(format!("The event with id: {}, was not found.", event_id))
            }
            UseCaseError::MissingCancellationReason => {
                Self::BadClientData("Cancelling an event requires a reason".into())
            }
            UseCaseError::InvalidTransition { from, to } => Self::Conflict(format!(
                "The event cannot go from {:?} to {:?}",
                from, to
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ChangeEventStatusUseCase {
    type Response = StatusChange;

    type Error = UseCaseError;

    const NAME: &'static str = "ChangeEventStatus";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        let mut event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.event_id.clone()))?;

        if self.status == EventStatus::Cancelled
            && !matches!(&self.reason, Some(reason) if !reason.trim().is_empty())
        {
            return Err(UseCaseError::MissingCancellationReason);
        }

        let previous = event.status.clone();
        if !previous.can_transition(&self.status) {
            return Err(UseCaseError::InvalidTransition {
                from: previous,
                to: self.status.clone(),
            });
        }

        event.status = self.status.clone();
        event.updated = ctx.sys.get_timestamp_millis();

        ctx.repos
            .events
            .save(&event)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(StatusChange {
            event,
            previous,
            reason: self.reason.clone(),
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(FanOutStatusChange)]
    }
}

/// Publishing announces the event to the whole club, cancelling tells
/// everyone affected why. Completion is quiet, the followup flow owns
/// that.
pub struct FanOutStatusChange;

#[async_trait::async_trait(?Send)]
impl Subscriber<ChangeEventStatusUseCase> for FanOutStatusChange {
    async fn notify(&self, change: &StatusChange, ctx: &KlubbContext) {
        let event = &change.event;
        match event.status {
            EventStatus::Published => {
                notify_users(
                    notifiable_user_ids(ctx).await,
                    event,
                    NotificationKind::EventAnnouncement,
                    event.title.clone(),
                    format!("A new event is open for registration: \"{}\".", event.title),
                    ctx,
                )
                .await;
            }
            EventStatus::Cancelled => {
                let reason = change
                    .reason
                    .as_deref()
                    .unwrap_or("No reason given")
                    .to_string();
                let mut recipients = participant_ids(event);
                for id in notifiable_user_ids(ctx).await {
                    if !recipients.contains(&id) {
                        recipients.push(id);
                    }
                }
                notify_users(
                    recipients,
                    event,
                    NotificationKind::EventCancellation,
                    event.title.clone(),
                    format!("The event \"{}\" was cancelled: {}", event.title, reason),
                    ctx,
                )
                .await;
            }
            EventStatus::Draft | EventStatus::Completed => {}
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::event::create_event::CreateEventUseCase;
    use klubb_domain::{EventLocation, User};
    use klubb_infra::InMemoryMailTransport;
    use std::sync::Arc;

    async fn seed_event(ctx: &KlubbContext) -> Event {
        execute(
            CreateEventUseCase {
                title: "Sommerfest".into(),
                description: "".into(),
                start_ts: 1000,
                end_ts: 2000,
                location: EventLocation::Offline {
                    address: "Bryggen 1".into(),
                },
                registration: Default::default(),
                created_by: ID::new(),
            },
            ctx,
        )
        .await
        .expect("To create event")
    }

    fn change(event_id: ID, status: EventStatus, reason: Option<&str>) -> ChangeEventStatusUseCase {
        ChangeEventStatusUseCase {
            event_id,
            status,
            reason: reason.map(|r| r.to_string()),
        }
    }

    #[actix_web::main]
    #[test]
    async fn publishing_notifies_all_notifiable_users() {
        let mut ctx = KlubbContext::create_inmemory();
        let mailer = Arc::new(InMemoryMailTransport::new());
        ctx.mailer = mailer.clone();

        let mut kari = User::new("kari@klubb.no".into(), "Kari".into(), "h".into(), 0);
        kari.verified = true;
        ctx.repos.users.insert(&kari).await.unwrap();
        let unverified = User::new("ola@klubb.no".into(), "Ola".into(), "h".into(), 0);
        ctx.repos.users.insert(&unverified).await.unwrap();

        let event = seed_event(&ctx).await;
        execute(change(event.id, EventStatus::Published, None), &ctx)
            .await
            .expect("To publish event");

        let inbox = ctx
            .repos
            .notifications
            .find_by_recipient(&kari.id, Default::default(), 0)
            .await
            .unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::EventAnnouncement);

        let quiet = ctx
            .repos
            .notifications
            .find_by_recipient(&unverified.id, Default::default(), 0)
            .await
            .unwrap();
        assert!(quiet.is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn cancellation_requires_reason_and_carries_it() {
        let mut ctx = KlubbContext::create_inmemory();
        let mailer = Arc::new(InMemoryMailTransport::new());
        ctx.mailer = mailer.clone();

        let mut kari = User::new("kari@klubb.no".into(), "Kari".into(), "h".into(), 0);
        kari.verified = true;
        ctx.repos.users.insert(&kari).await.unwrap();

        let event = seed_event(&ctx).await;

        let res = execute(
            change(event.id.clone(), EventStatus::Cancelled, Some("  ")),
            &ctx,
        )
        .await;
        assert_eq!(res.unwrap_err(), UseCaseError::MissingCancellationReason);

        execute(
            change(
                event.id.clone(),
                EventStatus::Cancelled,
                Some("venue unavailable"),
            ),
            &ctx,
        )
        .await
        .expect("To cancel event");

        let inbox = ctx
            .repos
            .notifications
            .find_by_recipient(&kari.id, Default::default(), 0)
            .await
            .unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::EventCancellation);
        assert!(inbox[0].message.contains("venue unavailable"));
        assert!(mailer.sent_mail()[0].text.contains("venue unavailable"));
    }

    #[actix_web::main]
    #[test]
    async fn cancelling_twice_is_a_conflict() {
        let ctx = KlubbContext::create_inmemory();
        let event = seed_event(&ctx).await;

        execute(
            change(event.id.clone(), EventStatus::Cancelled, Some("rain")),
            &ctx,
        )
        .await
        .expect("To cancel event");

        let res = execute(
            change(event.id, EventStatus::Cancelled, Some("rain")),
            &ctx,
        )
        .await;
        assert!(matches!(
            res.unwrap_err(),
            UseCaseError::InvalidTransition { .. }
        ));
    }
}
