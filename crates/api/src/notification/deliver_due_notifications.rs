use super::create_notification::deliver_channels;
use crate::shared::usecase::UseCase;
use klubb_infra::KlubbContext;
use tracing::{info, warn};

/// Periodic dispatch tick for scheduled notifications. Picks up every
/// unsent notification whose `send_at` has passed, delivers its
/// channels and flips `sent`. Also prunes expired records.
#[derive(Debug)]
pub struct DeliverDueNotificationsUseCase;

#[derive(Debug)]
pub struct DeliveryReport {
    pub dispatched: usize,
    pub expired_deleted: i64,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeliverDueNotificationsUseCase {
    type Response = DeliveryReport;

    type Error = UseCaseError;

    const NAME: &'static str = "DeliverDueNotifications";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();

        let due = ctx
            .repos
            .notifications
            .find_due_scheduled(now)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let mut dispatched = 0;
        for mut notification in due {
            if notification.is_expired(now) {
                continue;
            }
            let recipient = match ctx.repos.users.find(&notification.recipient_id).await {
                Some(recipient) => recipient,
                None => {
                    warn!(
                        "Skipping scheduled notification {}: recipient {} no longer exists",
                        notification.id, notification.recipient_id
                    );
                    continue;
                }
            };

            deliver_channels(&mut notification, &recipient, ctx).await;
            notification.sent = true;
            if ctx.repos.notifications.save(&notification).await.is_ok() {
                dispatched += 1;
            }
        }

        let expired = ctx
            .repos
            .notifications
            .delete_expired(now)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        if dispatched > 0 || expired.deleted_count > 0 {
            info!(
                "Dispatched {} scheduled notifications, pruned {} expired",
                dispatched, expired.deleted_count
            );
        }

        Ok(DeliveryReport {
            dispatched,
            expired_deleted: expired.deleted_count,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::notification::create_notification::{CreateNotificationUseCase, NotificationSpec};
    use crate::shared::usecase::execute;
    use klubb_domain::{NotificationKind, User};
    use klubb_infra::{FixedTimeSys, InMemoryMailTransport};
    use std::sync::Arc;

    #[actix_web::main]
    #[test]
    async fn dispatches_scheduled_notifications_once_due() {
        let mut ctx = KlubbContext::create_inmemory();
        let sys = Arc::new(FixedTimeSys::new(1_000));
        ctx.sys = sys.clone();
        let mailer = Arc::new(InMemoryMailTransport::new());
        ctx.mailer = mailer.clone();

        let mut user = User::new("kari@klubb.no".into(), "Kari".into(), "h".into(), 0);
        user.verified = true;
        ctx.repos.users.insert(&user).await.unwrap();

        let mut spec = NotificationSpec::new(
            user.id.clone(),
            NotificationKind::Announcement,
            "Planlagt".into(),
            "Kommer senere".into(),
        );
        spec.send_at = Some(5_000);
        execute(CreateNotificationUseCase { spec }, &ctx)
            .await
            .expect("To create scheduled notification");
        assert!(mailer.sent_mail().is_empty());

        // Not yet due
        let report = execute(DeliverDueNotificationsUseCase, &ctx)
            .await
            .expect("To run dispatch tick");
        assert_eq!(report.dispatched, 0);

        sys.set(5_000);
        let report = execute(DeliverDueNotificationsUseCase, &ctx)
            .await
            .expect("To run dispatch tick");
        assert_eq!(report.dispatched, 1);
        assert_eq!(mailer.sent_mail().len(), 1);

        // Already sent, second tick is a no-op
        let report = execute(DeliverDueNotificationsUseCase, &ctx)
            .await
            .expect("To run dispatch tick");
        assert_eq!(report.dispatched, 0);
        assert_eq!(mailer.sent_mail().len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn prunes_expired_notifications() {
        let mut ctx = KlubbContext::create_inmemory();
        let sys = Arc::new(FixedTimeSys::new(1_000));
        ctx.sys = sys.clone();

        let mut user = User::new("ola@klubb.no".into(), "Ola".into(), "h".into(), 0);
        user.verified = true;
        ctx.repos.users.insert(&user).await.unwrap();

        let mut spec = NotificationSpec::new(
            user.id.clone(),
            NotificationKind::System,
            "Kort levetid".into(),
            "Forsvinner".into(),
        );
        spec.expires_at = Some(2_000);
        execute(CreateNotificationUseCase { spec }, &ctx)
            .await
            .expect("To create notification");

        sys.set(3_000);
        let report = execute(DeliverDueNotificationsUseCase, &ctx)
            .await
            .expect("To run dispatch tick");
        assert_eq!(report.expired_deleted, 1);
    }
}
