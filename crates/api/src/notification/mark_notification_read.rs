use crate::error::KlubbError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::mark_all_notifications_read;
use klubb_api_structs::mark_notification_read::{APIResponse, PathParams};
use klubb_domain::{Notification, ID};
use klubb_infra::KlubbContext;

pub async fn mark_notification_read_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = MarkNotificationReadUseCase {
        notification_id: path_params.notification_id.clone(),
        recipient_id: user.id,
    };

    execute(usecase, &ctx)
        .await
        .map(|notification| HttpResponse::Ok().json(APIResponse::new(notification)))
        .map_err(KlubbError::from)
}

pub async fn mark_all_notifications_read_controller(
    http_req: HttpRequest,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = MarkAllNotificationsReadUseCase { recipient_id: user.id };

    execute(usecase, &ctx)
        .await
        .map(|updated| {
            HttpResponse::Ok().json(mark_all_notifications_read::APIResponse { updated })
        })
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct MarkNotificationReadUseCase {
    pub notification_id: ID,
    pub recipient_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(notification_id) => Self::NotFound(format!(
                "The notification with id: {}, was not found.",
                notification_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for MarkNotificationReadUseCase {
    type Response = Notification;

    type Error = UseCaseError;

    const NAME: &'static str = "MarkNotificationRead";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        let mut notification = ctx
            .repos
            .notifications
            .find_for_recipient(&self.notification_id, &self.recipient_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.notification_id.clone()))?;

        notification.mark_read(ctx.sys.get_timestamp_millis());

        ctx.repos
            .notifications
            .save(&notification)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(notification)
    }
}

#[derive(Debug)]
pub struct MarkAllNotificationsReadUseCase {
    pub recipient_id: ID,
}

#[async_trait::async_trait(?Send)]
impl UseCase for MarkAllNotificationsReadUseCase {
    type Response = i64;

    type Error = UseCaseError;

    const NAME: &'static str = "MarkAllNotificationsRead";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .notifications
            .mark_all_read(&self.recipient_id, ctx.sys.get_timestamp_millis())
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use klubb_domain::{Channels, NotificationKind, User};

    async fn seed(ctx: &KlubbContext) -> (User, Notification) {
        let mut user = User::new("kari@klubb.no".into(), "Kari".into(), "h".into(), 0);
        user.verified = true;
        ctx.repos.users.insert(&user).await.unwrap();

        let notification = Notification {
            id: Default::default(),
            recipient_id: user.id.clone(),
            sender_id: None,
            kind: NotificationKind::System,
            title: "Hei".into(),
            message: "Melding".into(),
            priority: Default::default(),
            channels: Channels::new(true),
            send_at: None,
            sent: true,
            related: None,
            expires_at: None,
            archived: false,
            created: 0,
        };
        ctx.repos.notifications.insert(&notification).await.unwrap();
        (user, notification)
    }

    #[actix_web::main]
    #[test]
    async fn marking_read_twice_keeps_first_timestamp() {
        let ctx = KlubbContext::create_inmemory();
        let (user, notification) = seed(&ctx).await;

        let first = execute(
            MarkNotificationReadUseCase {
                notification_id: notification.id.clone(),
                recipient_id: user.id.clone(),
            },
            &ctx,
        )
        .await
        .expect("To mark read");
        assert!(first.channels.in_app.read);
        let first_read_at = first.channels.in_app.read_at;
        assert!(first_read_at.is_some());

        let second = execute(
            MarkNotificationReadUseCase {
                notification_id: notification.id.clone(),
                recipient_id: user.id,
            },
            &ctx,
        )
        .await
        .expect("To mark read again");
        assert_eq!(second.channels.in_app.read_at, first_read_at);
    }

    #[actix_web::main]
    #[test]
    async fn cannot_read_someone_elses_notification() {
        let ctx = KlubbContext::create_inmemory();
        let (_, notification) = seed(&ctx).await;
        let other = User::new("ola@klubb.no".into(), "Ola".into(), "h".into(), 0);
        ctx.repos.users.insert(&other).await.unwrap();

        let res = execute(
            MarkNotificationReadUseCase {
                notification_id: notification.id.clone(),
                recipient_id: other.id,
            },
            &ctx,
        )
        .await;
        assert!(matches!(res.unwrap_err(), UseCaseError::NotFound(_)));
    }
}
