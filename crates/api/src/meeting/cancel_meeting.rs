use super::notify_attendees;
use crate::error::KlubbError;
use crate::shared::auth::protect_admin_route;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::cancel_meeting::{APIResponse, PathParams, RequestBody};
use klubb_domain::{Meeting, MeetingStatus, NotificationKind, ID};
use klubb_infra::KlubbContext;

pub async fn cancel_meeting_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let _admin = protect_admin_route(&http_req, &ctx).await?;

    let usecase = CancelMeetingUseCase {
        meeting_id: path_params.meeting_id.clone(),
        reason: body.0.reason,
    };

    execute(usecase, &ctx)
        .await
        .map(|cancellation| HttpResponse::Ok().json(APIResponse::new(cancellation.meeting)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct CancelMeetingUseCase {
    pub meeting_id: ID,
    pub reason: String,
}

#[derive(Debug)]
pub struct MeetingCancellation {
    pub meeting: Meeting,
    pub reason: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    MissingReason,
    AlreadyCancelled,
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(meeting_id) => Self::NotFound(format!(
                "The meeting with id: {}, was not found.",
                meeting_id
            )),
            UseCaseError::MissingReason => {
                Self::BadClientData("Cancelling a meeting requires a reason".into())
            }
            UseCaseError::AlreadyCancelled => {
                Self::Conflict("The meeting is already cancelled".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CancelMeetingUseCase {
    type Response = MeetingCancellation;

    type Error = UseCaseError;

    const NAME: &'static str = "CancelMeeting";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        if self.reason.trim().is_empty() {
            return Err(UseCaseError::MissingReason);
        }

        let mut meeting = ctx
            .repos
            .meetings
            .find(&self.meeting_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.meeting_id.clone()))?;

        if meeting.status == MeetingStatus::Cancelled {
            return Err(UseCaseError::AlreadyCancelled);
        }

        meeting.status = MeetingStatus::Cancelled;
        meeting.updated = ctx.sys.get_timestamp_millis();

        ctx.repos
            .meetings
            .save(&meeting)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(MeetingCancellation {
            meeting,
            reason: self.reason.clone(),
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(NotifyCancellation)]
    }
}

pub struct NotifyCancellation;

#[async_trait::async_trait(?Send)]
impl Subscriber<CancelMeetingUseCase> for NotifyCancellation {
    async fn notify(&self, cancellation: &MeetingCancellation, ctx: &KlubbContext) {
        notify_attendees(
            &cancellation.meeting,
            NotificationKind::MeetingCancelled,
            format!(
                "The meeting \"{}\" was cancelled: {}",
                cancellation.meeting.title, cancellation.reason
            ),
            ctx,
        )
        .await;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::meeting::create_meeting::CreateMeetingUseCase;
    use klubb_domain::User;

    #[actix_web::main]
    #[test]
    async fn cancellation_reaches_attendees_with_the_reason() {
        let ctx = KlubbContext::create_inmemory();
        let mut attendee = User::new("kari@klubb.no".into(), "Kari".into(), "h".into(), 0);
        attendee.verified = true;
        ctx.repos.users.insert(&attendee).await.unwrap();

        let meeting = execute(
            CreateMeetingUseCase {
                organizer_id: ID::new(),
                title: "Styremøte".into(),
                agenda: "".into(),
                start_ts: 1000,
                end_ts: 2000,
                location: "".into(),
                attendee_ids: vec![attendee.id.clone()],
            },
            &ctx,
        )
        .await
        .expect("To create meeting");

        let res = execute(
            CancelMeetingUseCase {
                meeting_id: meeting.id.clone(),
                reason: "".into(),
            },
            &ctx,
        )
        .await;
        assert_eq!(res.unwrap_err(), UseCaseError::MissingReason);

        execute(
            CancelMeetingUseCase {
                meeting_id: meeting.id.clone(),
                reason: "venue unavailable".into(),
            },
            &ctx,
        )
        .await
        .expect("To cancel meeting");

        let inbox = ctx
            .repos
            .notifications
            .find_by_recipient(&attendee.id, Default::default(), 0)
            .await
            .unwrap();
        assert!(inbox
            .iter()
            .any(|n| n.kind == NotificationKind::MeetingCancelled
                && n.message.contains("venue unavailable")));

        let replay = execute(
            CancelMeetingUseCase {
                meeting_id: meeting.id,
                reason: "again".into(),
            },
            &ctx,
        )
        .await;
        assert_eq!(replay.unwrap_err(), UseCaseError::AlreadyCancelled);
    }
}
