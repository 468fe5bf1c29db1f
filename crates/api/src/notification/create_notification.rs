use crate::error::KlubbError;
use crate::shared::usecase::UseCase;
use klubb_domain::{
    Channels, Notification, NotificationKind, Priority, RelatedEntity, User, ID,
};
use klubb_infra::{KlubbContext, Mail};
use tracing::error;

/// Everything needed to address one notification. The bulk use case
/// and the fan-out subscribers all funnel through this.
#[derive(Debug, Clone)]
pub struct NotificationSpec {
    pub recipient_id: ID,
    pub sender_id: Option<ID>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub related: Option<RelatedEntity>,
    pub send_at: Option<i64>,
    pub expires_at: Option<i64>,
}

impl NotificationSpec {
    pub fn new(recipient_id: ID, kind: NotificationKind, title: String, message: String) -> Self {
        Self {
            recipient_id,
            sender_id: None,
            kind,
            title,
            message,
            priority: Default::default(),
            related: None,
            send_at: None,
            expires_at: None,
        }
    }
}

#[derive(Debug)]
pub struct CreateNotificationUseCase {
    pub spec: NotificationSpec,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidTitleOrMessage,
    RecipientNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidTitleOrMessage => Self::BadClientData(
                "Notification title and message must be non-empty and within length bounds".into(),
            ),
            UseCaseError::RecipientNotFound(user_id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", user_id))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateNotificationUseCase {
    type Response = Notification;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateNotification";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        if !Notification::valid_lengths(&self.spec.title, &self.spec.message) {
            return Err(UseCaseError::InvalidTitleOrMessage);
        }

        let recipient = ctx
            .repos
            .users
            .find(&self.spec.recipient_id)
            .await
            .ok_or_else(|| UseCaseError::RecipientNotFound(self.spec.recipient_id.clone()))?;

        let now = ctx.sys.get_timestamp_millis();
        let mut notification = Notification {
            id: Default::default(),
            recipient_id: self.spec.recipient_id.clone(),
            sender_id: self.spec.sender_id.clone(),
            kind: self.spec.kind,
            title: self.spec.title.clone(),
            message: self.spec.message.clone(),
            priority: self.spec.priority,
            channels: Channels::new(recipient.preferences.email_notifications),
            send_at: self.spec.send_at,
            sent: false,
            related: self.spec.related.clone(),
            expires_at: self.spec.expires_at,
            archived: false,
            created: now,
        };

        // The record is written before any delivery attempt so a sent
        // email always has a persisted notification behind it.
        ctx.repos
            .notifications
            .insert(&notification)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        // Scheduled for later: leave it unsent and let the dispatch
        // job pick it up when due.
        if !notification.is_scheduled_after(now) {
            deliver_channels(&mut notification, &recipient, ctx).await;
            notification.sent = true;
            if let Err(e) = ctx.repos.notifications.save(&notification).await {
                error!(
                    "Failed to save channel state for notification {}: {:?}",
                    notification.id, e
                );
            }
        }

        Ok(notification)
    }
}

/// Attempts delivery on every enabled channel. Channel failures are
/// logged and leave the channel's `sent` flag false, they never fail
/// the caller: the in-app record is the source of truth and is always
/// written.
///
/// The push channel has an enabled flag on the wire but no delivery
/// path. That is how the system this replaces behaved and callers rely
/// on the flag round-tripping.
pub async fn deliver_channels(
    notification: &mut Notification,
    recipient: &User,
    ctx: &KlubbContext,
) {
    if notification.channels.email.enabled && recipient.preferences.email_notifications {
        let template = notification.email_template(&recipient.full_name);
        let mail = Mail {
            to: recipient.email.clone(),
            subject: template.subject,
            html: template.html,
            text: template.text,
        };
        match ctx.mailer.send(mail).await {
            Ok(_) => notification.mark_email_sent(ctx.sys.get_timestamp_millis()),
            Err(e) => error!(
                "Failed to deliver notification {} over email to {}: {:?}",
                notification.id, recipient.email, e
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;
    use klubb_domain::User;
    use klubb_infra::InMemoryMailTransport;
    use std::sync::Arc;

    struct TestContext {
        ctx: KlubbContext,
        recipient: User,
        mailer: Arc<InMemoryMailTransport>,
    }

    async fn setup() -> TestContext {
        let mut ctx = KlubbContext::create_inmemory();
        let mailer = Arc::new(InMemoryMailTransport::new());
        ctx.mailer = mailer.clone();

        let mut recipient = User::new(
            "kari@klubb.no".into(),
            "Kari Nordmann".into(),
            "hash".into(),
            0,
        );
        recipient.verified = true;
        ctx.repos.users.insert(&recipient).await.unwrap();

        TestContext {
            ctx,
            recipient,
            mailer,
        }
    }

    fn spec(recipient_id: ID) -> NotificationSpec {
        NotificationSpec::new(
            recipient_id,
            NotificationKind::Announcement,
            "Dugnad".into(),
            "Vi møtes på lørdag".into(),
        )
    }

    #[actix_web::main]
    #[test]
    async fn creates_and_delivers_notification() {
        let TestContext {
            ctx,
            recipient,
            mailer,
        } = setup().await;

        let usecase = CreateNotificationUseCase {
            spec: spec(recipient.id.clone()),
        };
        let notification = execute(usecase, &ctx).await.expect("To create notification");

        assert!(notification.sent);
        assert!(notification.channels.email.sent);
        assert_eq!(mailer.sent_mail().len(), 1);
        assert_eq!(mailer.sent_mail()[0].to, recipient.email);

        let stored = ctx.repos.notifications.find(&notification.id).await.unwrap();
        assert!(stored.sent);
        assert!(stored.channels.email.sent);
    }

    #[actix_web::main]
    #[test]
    async fn respects_email_opt_out() {
        let TestContext {
            ctx,
            mut recipient,
            mailer,
        } = setup().await;
        recipient.preferences.email_notifications = false;
        ctx.repos.users.save(&recipient).await.unwrap();

        let usecase = CreateNotificationUseCase {
            spec: spec(recipient.id.clone()),
        };
        let notification = execute(usecase, &ctx).await.expect("To create notification");

        // The record is written, but no email goes out
        assert!(notification.sent);
        assert!(!notification.channels.email.enabled);
        assert!(!notification.channels.email.sent);
        assert!(mailer.sent_mail().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn email_failure_never_fails_the_caller() {
        let TestContext {
            ctx,
            recipient,
            mailer,
        } = setup().await;
        mailer.set_failing(true);

        let usecase = CreateNotificationUseCase {
            spec: spec(recipient.id.clone()),
        };
        let notification = execute(usecase, &ctx).await.expect("To create notification");

        assert!(notification.sent);
        assert!(notification.channels.email.enabled);
        assert!(!notification.channels.email.sent);
        assert!(ctx.repos.notifications.find(&notification.id).await.is_some());
    }

    #[actix_web::main]
    #[test]
    async fn holds_back_scheduled_notifications() {
        let TestContext {
            ctx,
            recipient,
            mailer,
        } = setup().await;

        let mut spec = spec(recipient.id.clone());
        spec.send_at = Some(ctx.sys.get_timestamp_millis() + 1000 * 60 * 60);
        let usecase = CreateNotificationUseCase { spec };
        let notification = execute(usecase, &ctx).await.expect("To create notification");

        assert!(!notification.sent);
        assert!(!notification.channels.email.sent);
        assert!(mailer.sent_mail().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn rejects_unknown_recipient() {
        let TestContext { ctx, .. } = setup().await;

        let unknown = ID::new();
        let usecase = CreateNotificationUseCase {
            spec: spec(unknown.clone()),
        };
        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::RecipientNotFound(unknown));
    }

    #[actix_web::main]
    #[test]
    async fn rejects_out_of_bounds_title() {
        let TestContext { ctx, recipient, .. } = setup().await;

        let mut bad = spec(recipient.id.clone());
        bad.title = "x".repeat(201);
        let res = execute(CreateNotificationUseCase { spec: bad }, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::InvalidTitleOrMessage);
    }
}
