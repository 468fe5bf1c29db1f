use crate::error::KlubbError;
use crate::shared::auth::protect_admin_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::record_meeting_attendance::{APIResponse, PathParams, RequestBody};
use klubb_domain::{Meeting, ID};
use klubb_infra::KlubbContext;

pub async fn record_meeting_attendance_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let _admin = protect_admin_route(&http_req, &ctx).await?;

    let usecase = RecordMeetingAttendanceUseCase {
        meeting_id: path_params.meeting_id.clone(),
        user_id: body.user_id.clone(),
        attended: body.attended,
    };

    execute(usecase, &ctx)
        .await
        .map(|meeting| HttpResponse::Ok().json(APIResponse::new(meeting)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct RecordMeetingAttendanceUseCase {
    pub meeting_id: ID,
    pub user_id: ID,
    pub attended: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    MeetingNotFound(ID),
    AttendeeNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::MeetingNotFound(meeting_id) => Self::NotFound(format!(
                "The meeting with id: {}, was not found.",
                meeting_id
            )),
            UseCaseError::AttendeeNotFound(user_id) => Self::NotFound(format!(
                "The user with id: {}, is not an attendee of this meeting.",
                user_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RecordMeetingAttendanceUseCase {
    type Response = Meeting;

    type Error = UseCaseError;

    const NAME: &'static str = "RecordMeetingAttendance";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        let mut meeting = ctx
            .repos
            .meetings
            .find(&self.meeting_id)
            .await
            .ok_or_else(|| UseCaseError::MeetingNotFound(self.meeting_id.clone()))?;

        if !meeting.record_attendance(&self.user_id, self.attended) {
            return Err(UseCaseError::AttendeeNotFound(self.user_id.clone()));
        }
        meeting.updated = ctx.sys.get_timestamp_millis();

        ctx.repos
            .meetings
            .save(&meeting)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(meeting)
    }
}
