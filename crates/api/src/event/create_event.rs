use crate::error::KlubbError;
use crate::shared::auth::protect_admin_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::create_event::{APIResponse, RequestBody};
use klubb_domain::{Event, EventLocation, EventStatus, RegistrationPolicy, ID};
use klubb_infra::KlubbContext;

pub async fn create_event_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let admin = protect_admin_route(&http_req, &ctx).await?;
    let body = body.0;

    let usecase = CreateEventUseCase {
        title: body.title,
        description: body.description.unwrap_or_default(),
        start_ts: body.start_ts,
        end_ts: body.end_ts,
        location: body.location,
        registration: body.registration.unwrap_or_default(),
        created_by: admin.id,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Created().json(APIResponse::new(event)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct CreateEventUseCase {
    pub title: String,
    pub description: String,
    pub start_ts: i64,
    pub end_ts: i64,
    pub location: EventLocation,
    pub registration: RegistrationPolicy,
    pub created_by: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidTimespan,
    EmptyTitle,
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidTimespan => Self::BadClientData(
                "The event has to end after it starts, please check your start and end timestamps"
                    .into(),
            ),
            UseCaseError::EmptyTitle => Self::BadClientData("The event needs a title".into()),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateEvent";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        if self.title.trim().is_empty() {
            return Err(UseCaseError::EmptyTitle);
        }
        if !Event::has_valid_timespan(self.start_ts, self.end_ts) {
            return Err(UseCaseError::InvalidTimespan);
        }

        let now = ctx.sys.get_timestamp_millis();
        let event = Event {
            id: Default::default(),
            title: self.title.clone(),
            description: self.description.clone(),
            start_ts: self.start_ts,
            end_ts: self.end_ts,
            location: self.location.clone(),
            registration: self.registration.clone(),
            participants: Vec::new(),
            participant_count: 0,
            attendance_count: 0,
            status: EventStatus::Draft,
            reminder_sent: false,
            followup_sent: false,
            created_by: self.created_by.clone(),
            created: now,
            updated: now,
        };

        ctx.repos
            .events
            .insert(&event)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(event)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn usecase() -> CreateEventUseCase {
        CreateEventUseCase {
            title: "Sommerfest".into(),
            description: "".into(),
            start_ts: 1000,
            end_ts: 2000,
            location: EventLocation::Offline {
                address: "Bryggen 1".into(),
            },
            registration: Default::default(),
            created_by: ID::new(),
        }
    }

    #[actix_web::main]
    #[test]
    async fn creates_draft_event() {
        let ctx = KlubbContext::create_inmemory();
        let event = execute(usecase(), &ctx).await.expect("To create event");
        assert_eq!(event.status, EventStatus::Draft);
        assert!(!event.reminder_sent);
        assert!(ctx.repos.events.find(&event.id).await.is_some());
    }

    #[actix_web::main]
    #[test]
    async fn rejects_event_that_ends_before_it_starts() {
        let ctx = KlubbContext::create_inmemory();
        let mut invalid = usecase();
        invalid.end_ts = invalid.start_ts;
        let res = execute(invalid, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::InvalidTimespan);
    }
}
