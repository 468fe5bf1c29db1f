use crate::error::KlubbError;
use crate::shared::auth::protect_admin_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::update_meeting::{APIResponse, PathParams, RequestBody};
use klubb_domain::{Meeting, MeetingAttendee, ID};
use klubb_infra::KlubbContext;

pub async fn update_meeting_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let _admin = protect_admin_route(&http_req, &ctx).await?;
    let body = body.0;

    let usecase = UpdateMeetingUseCase {
        meeting_id: path_params.meeting_id.clone(),
        title: body.title,
        agenda: body.agenda,
        start_ts: body.start_ts,
        end_ts: body.end_ts,
        location: body.location,
        attendee_ids: body.attendee_ids,
    };

    execute(usecase, &ctx)
        .await
        .map(|meeting| HttpResponse::Ok().json(APIResponse::new(meeting)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct UpdateMeetingUseCase {
    pub meeting_id: ID,
    pub title: Option<String>,
    pub agenda: Option<String>,
    pub start_ts: Option<i64>,
    pub end_ts: Option<i64>,
    pub location: Option<String>,
    pub attendee_ids: Option<Vec<ID>>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidTimespan,
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(meeting_id) => Self::NotFound(format!(
                "The meeting with id: {}, was not found.",
                meeting_id
            )),
            UseCaseError::InvalidTimespan => Self::BadClientData(
                "The meeting has to end after it starts, please check your start and end timestamps"
                    .into(),
            ),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateMeetingUseCase {
    type Response = Meeting;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateMeeting";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        let mut meeting = ctx
            .repos
            .meetings
            .find(&self.meeting_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.meeting_id.clone()))?;

        if let Some(title) = &self.title {
            meeting.title = title.clone();
        }
        if let Some(agenda) = &self.agenda {
            meeting.agenda = agenda.clone();
        }
        if let Some(start_ts) = self.start_ts {
            meeting.start_ts = start_ts;
        }
        if let Some(end_ts) = self.end_ts {
            meeting.end_ts = end_ts;
        }
        if !Meeting::has_valid_timespan(meeting.start_ts, meeting.end_ts) {
            return Err(UseCaseError::InvalidTimespan);
        }
        if let Some(location) = &self.location {
            meeting.location = location.clone();
        }
        if let Some(attendee_ids) = &self.attendee_ids {
            // Attendance already recorded for kept attendees survives
            meeting.attendees = attendee_ids
                .iter()
                .map(|user_id| MeetingAttendee {
                    user_id: user_id.clone(),
                    attended: meeting
                        .attendees
                        .iter()
                        .any(|a| a.user_id == *user_id && a.attended),
                })
                .collect();
            meeting.attendance_count =
                meeting.attendees.iter().filter(|a| a.attended).count();
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
