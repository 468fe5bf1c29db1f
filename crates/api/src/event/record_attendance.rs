use crate::error::KlubbError;
use crate::shared::auth::protect_admin_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::record_attendance::{APIResponse, PathParams, RequestBody};
use klubb_domain::{Event, ID};
use klubb_infra::KlubbContext;

pub async fn record_attendance_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let _admin = protect_admin_route(&http_req, &ctx).await?;

    let usecase = RecordAttendanceUseCase {
        event_id: path_params.event_id.clone(),
        user_id: body.user_id.clone(),
        attended: body.attended,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct RecordAttendanceUseCase {
    pub event_id: ID,
    pub user_id: ID,
    pub attended: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EventNotFound(ID),
    ParticipantNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EventNotFound(event_id) => {
                Self::NotFound(format!("The event with id: {}, was not found.", event_id))
            }
            UseCaseError::ParticipantNotFound(user_id) => Self::NotFound(format!(
                "The user with id: {}, is not registered for this event.",
                user_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RecordAttendanceUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "RecordAttendance";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        let mut event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::EventNotFound(self.event_id.clone()))?;

        if !event.record_attendance(&self.user_id, self.attended) {
            return Err(UseCaseError::ParticipantNotFound(self.user_id.clone()));
        }
        event.updated = ctx.sys.get_timestamp_millis();

        ctx.repos
            .events
            .save(&event)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(event)
    }
}
