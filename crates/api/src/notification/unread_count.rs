use crate::error::KlubbError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::unread_count::APIResponse;
use klubb_domain::ID;
use klubb_infra::KlubbContext;

pub async fn unread_count_controller(
    http_req: HttpRequest,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = UnreadCountUseCase { recipient_id: user.id };

    execute(usecase, &ctx)
        .await
        .map(|count| HttpResponse::Ok().json(APIResponse { count }))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct UnreadCountUseCase {
    pub recipient_id: ID,
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
impl UseCase for UnreadCountUseCase {
    type Response = i64;

    type Error = UseCaseError;

    const NAME: &'static str = "UnreadCount";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .notifications
            .count_unread(&self.recipient_id)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
