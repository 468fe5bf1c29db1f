use crate::error::KlubbError;
use crate::shared::auth::protect_admin_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::delete_meeting::{APIResponse, PathParams};
use klubb_domain::{Meeting, ID};
use klubb_infra::KlubbContext;

pub async fn delete_meeting_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let _admin = protect_admin_route(&http_req, &ctx).await?;

    let usecase = DeleteMeetingUseCase {
        meeting_id: path_params.meeting_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|meeting| HttpResponse::Ok().json(APIResponse::new(meeting)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct DeleteMeetingUseCase {
    pub meeting_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(meeting_id) => Self::NotFound(format!(
                "The meeting with id: {}, was not found.",
                meeting_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteMeetingUseCase {
    type Response = Meeting;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteMeeting";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .meetings
            .delete(&self.meeting_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.meeting_id.clone()))
    }
}
