use crate::error::KlubbError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::list_meetings::{APIResponse, QueryParams};
use klubb_domain::{Meeting, MeetingStatus};
use klubb_infra::KlubbContext;

pub async fn list_meetings_controller(
    http_req: HttpRequest,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let _user = protect_route(&http_req, &ctx).await?;

    let usecase = ListMeetingsUseCase {
        status: query_params.status,
    };

    execute(usecase, &ctx)
        .await
        .map(|meetings| HttpResponse::Ok().json(APIResponse::new(meetings)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct ListMeetingsUseCase {
    pub status: Option<MeetingStatus>,
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
impl UseCase for ListMeetingsUseCase {
    type Response = Vec<Meeting>;

    type Error = UseCaseError;

    const NAME: &'static str = "ListMeetings";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .meetings
            .find_all(self.status)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
