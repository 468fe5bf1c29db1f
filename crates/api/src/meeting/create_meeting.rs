use super::notify_attendees;
use crate::error::KlubbError;
use crate::shared::auth::protect_admin_route;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::create_meeting::{APIResponse, RequestBody};
use klubb_domain::{Meeting, MeetingAttendee, MeetingStatus, NotificationKind, ID};
use klubb_infra::KlubbContext;

pub async fn create_meeting_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let admin = protect_admin_route(&http_req, &ctx).await?;
    let body = body.0;

    let usecase = CreateMeetingUseCase {
        organizer_id: admin.id,
        title: body.title,
        agenda: body.agenda.unwrap_or_default(),
        start_ts: body.start_ts,
        end_ts: body.end_ts,
        location: body.location.unwrap_or_default(),
        attendee_ids: body.attendee_ids.unwrap_or_default(),
    };

    execute(usecase, &ctx)
        .await
        .map(|meeting| HttpResponse::Created().json(APIResponse::new(meeting)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct CreateMeetingUseCase {
    pub organizer_id: ID,
    pub title: String,
    pub agenda: String,
    pub start_ts: i64,
    pub end_ts: i64,
    pub location: String,
    pub attendee_ids: Vec<ID>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EmptyTitle,
    InvalidTimespan,
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyTitle => Self::BadClientData("The meeting needs a title".into()),
            UseCaseError::InvalidTimespan => Self::BadClientData(
                "The meeting has to end after it starts, please check your start and end timestamps"
                    .into(),
            ),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateMeetingUseCase {
    type Response = Meeting;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateMeeting";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        if self.title.trim().is_empty() {
            return Err(UseCaseError::EmptyTitle);
        }
        if !Meeting::has_valid_timespan(self.start_ts, self.end_ts) {
            return Err(UseCaseError::InvalidTimespan);
        }

        let now = ctx.sys.get_timestamp_millis();
        let mut attendee_ids: Vec<ID> = Vec::new();
        for user_id in &self.attendee_ids {
            if !attendee_ids.contains(user_id) {
                attendee_ids.push(user_id.clone());
            }
        }
        let meeting = Meeting {
            id: Default::default(),
            organizer_id: self.organizer_id.clone(),
            title: self.title.clone(),
            agenda: self.agenda.clone(),
            start_ts: self.start_ts,
            end_ts: self.end_ts,
            location: self.location.clone(),
            attendees: attendee_ids
                .into_iter()
                .map(|user_id| MeetingAttendee {
                    user_id,
                    attended: false,
                })
                .collect(),
            attendance_count: 0,
            status: MeetingStatus::Scheduled,
            created: now,
            updated: now,
        };

        ctx.repos
            .meetings
            .insert(&meeting)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(meeting)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(InviteAttendees)]
    }
}

pub struct InviteAttendees;

#[async_trait::async_trait(?Send)]
impl Subscriber<CreateMeetingUseCase> for InviteAttendees {
    async fn notify(&self, meeting: &Meeting, ctx: &KlubbContext) {
        notify_attendees(
            meeting,
            NotificationKind::MeetingScheduled,
            format!("You are invited to the meeting \"{}\".", meeting.title),
            ctx,
        )
        .await;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use klubb_domain::User;

    #[actix_web::main]
    #[test]
    async fn invites_attendees() {
        let ctx = KlubbContext::create_inmemory();
        let mut attendee = User::new("kari@klubb.no".into(), "Kari".into(), "h".into(), 0);
        attendee.verified = true;
        ctx.repos.users.insert(&attendee).await.unwrap();

        let meeting = execute(
            CreateMeetingUseCase {
                organizer_id: ID::new(),
                title: "Styremøte".into(),
                agenda: "Budsjett".into(),
                start_ts: 1000,
                end_ts: 2000,
                location: "Klubbhuset".into(),
                attendee_ids: vec![attendee.id.clone()],
            },
            &ctx,
        )
        .await
        .expect("To create meeting");
        assert_eq!(meeting.status, MeetingStatus::Scheduled);
        assert_eq!(meeting.attendees.len(), 1);

        let inbox = ctx
            .repos
            .notifications
            .find_by_recipient(&attendee.id, Default::default(), 0)
            .await
            .unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::MeetingScheduled);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_backwards_timespan() {
        let ctx = KlubbContext::create_inmemory();
        let res = execute(
            CreateMeetingUseCase {
                organizer_id: ID::new(),
                title: "Styremøte".into(),
                agenda: "".into(),
                start_ts: 2000,
                end_ts: 1000,
                location: "".into(),
                attendee_ids: vec![],
            },
            &ctx,
        )
        .await;
        assert_eq!(res.unwrap_err(), UseCaseError::InvalidTimespan);
    }
}
