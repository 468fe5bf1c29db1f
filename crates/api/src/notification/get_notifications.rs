use crate::error::KlubbError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::get_notifications::{APIResponse, QueryParams};
use klubb_domain::{Notification, ID};
use klubb_infra::{KlubbContext, NotificationListQuery};

pub async fn get_notifications_controller(
    http_req: HttpRequest,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = GetNotificationsUseCase {
        recipient_id: user.id,
        unread_only: query_params.unread_only.unwrap_or(false),
        include_archived: query_params.include_archived.unwrap_or(false),
    };

    execute(usecase, &ctx)
        .await
        .map(|notifications| HttpResponse::Ok().json(APIResponse::new(notifications)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct GetNotificationsUseCase {
    pub recipient_id: ID,
    pub unread_only: bool,
    pub include_archived: bool,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetNotificationsUseCase {
    type Response = Vec<Notification>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetNotifications";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .notifications
            .find_by_recipient(
                &self.recipient_id,
                NotificationListQuery {
                    unread_only: self.unread_only,
                    include_archived: self.include_archived,
                },
                ctx.sys.get_timestamp_millis(),
            )
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use klubb_domain::{Channels, NotificationKind, User};
    use klubb_infra::FixedTimeSys;
    use std::sync::Arc;

    fn notification(recipient_id: &ID, title: &str) -> Notification {
        Notification {
            id: Default::default(),
            recipient_id: recipient_id.clone(),
            sender_id: None,
            kind: NotificationKind::System,
            title: title.into(),
            message: "Melding".into(),
            priority: Default::default(),
            channels: Channels::new(true),
            send_at: None,
            sent: true,
            related: None,
            expires_at: None,
            archived: false,
            created: 0,
        }
    }

    async fn seed_user(ctx: &KlubbContext) -> User {
        let mut user = User::new("kari@klubb.no".into(), "Kari".into(), "h".into(), 0);
        user.verified = true;
        ctx.repos.users.insert(&user).await.unwrap();
        user
    }

    #[actix_web::main]
    #[test]
    async fn list_skips_scheduled_and_expired_notifications() {
        let mut ctx = KlubbContext::create_inmemory();
        let sys = Arc::new(FixedTimeSys::new(10_000));
        ctx.sys = sys.clone();
        let user = seed_user(&ctx).await;

        let live = notification(&user.id, "Live");
        ctx.repos.notifications.insert(&live).await.unwrap();

        let mut scheduled = notification(&user.id, "Planlagt");
        scheduled.send_at = Some(20_000);
        scheduled.sent = false;
        ctx.repos.notifications.insert(&scheduled).await.unwrap();

        let mut expired = notification(&user.id, "Utløpt");
        expired.expires_at = Some(5_000);
        ctx.repos.notifications.insert(&expired).await.unwrap();

        let listed = execute(
            GetNotificationsUseCase {
                recipient_id: user.id.clone(),
                unread_only: false,
                include_archived: false,
            },
            &ctx,
        )
        .await
        .expect("To list notifications");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, live.id);

        // Once the clock passes send_at the scheduled one shows up
        sys.set(20_000);
        let listed = execute(
            GetNotificationsUseCase {
                recipient_id: user.id,
                unread_only: false,
                include_archived: false,
            },
            &ctx,
        )
        .await
        .expect("To list notifications");
        assert_eq!(listed.len(), 2);
    }

    #[actix_web::main]
    #[test]
    async fn list_honors_unread_and_archived_filters() {
        let ctx = KlubbContext::create_inmemory();
        let user = seed_user(&ctx).await;

        let unread = notification(&user.id, "Ulest");
        ctx.repos.notifications.insert(&unread).await.unwrap();

        let mut read = notification(&user.id, "Lest");
        read.mark_read(100);
        ctx.repos.notifications.insert(&read).await.unwrap();

        let mut archived = notification(&user.id, "Arkivert");
        archived.archived = true;
        ctx.repos.notifications.insert(&archived).await.unwrap();

        let listed = execute(
            GetNotificationsUseCase {
                recipient_id: user.id.clone(),
                unread_only: true,
                include_archived: false,
            },
            &ctx,
        )
        .await
        .expect("To list notifications");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, unread.id);

        let listed = execute(
            GetNotificationsUseCase {
                recipient_id: user.id,
                unread_only: false,
                include_archived: true,
            },
            &ctx,
        )
        .await
        .expect("To list notifications");
        assert_eq!(listed.len(), 3);
    }
}
