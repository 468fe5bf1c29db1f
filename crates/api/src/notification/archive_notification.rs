use crate::error::KlubbError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::archive_notification::{APIResponse, PathParams};
use klubb_domain::{Notification, ID};
use klubb_infra::KlubbContext;

pub async fn archive_notification_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = ArchiveNotificationUseCase {
        notification_id: path_params.notification_id.clone(),
        recipient_id: user.id,
    };

    execute(usecase, &ctx)
        .await
        .map(|notification| HttpResponse::Ok().json(APIResponse::new(notification)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct ArchiveNotificationUseCase {
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
impl UseCase for ArchiveNotificationUseCase {
    type Response = Notification;

    type Error = UseCaseError;

    const NAME: &'static str = "ArchiveNotification";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        let mut notification = ctx
            .repos
            .notifications
            .find_for_recipient(&self.notification_id, &self.recipient_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.notification_id.clone()))?;

        notification.archived = true;

        ctx.repos
            .notifications
            .save(&notification)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(notification)
    }
}
