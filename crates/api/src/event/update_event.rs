use super::subscribers::{notify_users, participant_ids};
use crate::error::KlubbError;
use crate::shared::auth::protect_admin_route;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::update_event::{APIResponse, PathParams, RequestBody};
use klubb_domain::{Event, EventLocation, EventStatus, NotificationKind, RegistrationPolicy, ID};
use klubb_infra::KlubbContext;

pub async fn update_event_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let _admin = protect_admin_route(&http_req, &ctx).await?;
    let body = body.0;

    let usecase = UpdateEventUseCase {
        event_id: path_params.event_id.clone(),
        title: body.title,
        description: body.description,
        start_ts: body.start_ts,
        end_ts: body.end_ts,
        location: body.location,
        registration: body.registration,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct UpdateEventUseCase {
    pub event_id: ID,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_ts: Option<i64>,
    pub end_ts: Option<i64>,
    pub location: Option<EventLocation>,
    pub registration: Option<RegistrationPolicy>,
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
            UseCaseError::NotFound(event_id) => {
                Self::NotFound(format!("The event with id: {}, was not found.", event_id))
            }
            UseCaseError::InvalidTimespan => Self::BadClientData(
                "The event has to end after it starts, please check your start and end timestamps"
                    .into(),
            ),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateEvent";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        let mut event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.event_id.clone()))?;

        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(description) = &self.description {
            event.description = description.clone();
        }
        if let Some(start_ts) = self.start_ts {
            event.start_ts = start_ts;
        }
        if let Some(end_ts) = self.end_ts {
            event.end_ts = end_ts;
        }
        if !Event::has_valid_timespan(event.start_ts, event.end_ts) {
            return Err(UseCaseError::InvalidTimespan);
        }
        if let Some(location) = &self.location {
            event.location = location.clone();
        }
        if let Some(registration) = &self.registration {
            event.registration = registration.clone();
        }
        event.updated = ctx.sys.get_timestamp_millis();

        ctx.repos
            .events
            .save(&event)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(event)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(NotifyParticipantsOnUpdate)]
    }
}

/// Registered participants hear about changes to a published event.
pub struct NotifyParticipantsOnUpdate;

#[async_trait::async_trait(?Send)]
impl Subscriber<UpdateEventUseCase> for NotifyParticipantsOnUpdate {
    async fn notify(&self, event: &Event, ctx: &KlubbContext) {
        if event.status != EventStatus::Published {
            return;
        }
        notify_users(
            participant_ids(event),
            event,
            NotificationKind::EventUpdate,
            event.title.clone(),
            format!("The event \"{}\" has been updated.", event.title),
            ctx,
        )
        .await;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::event::create_event::CreateEventUseCase;

    async fn seed_event(ctx: &KlubbContext) -> Event {
        execute(
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
            },
            ctx,
        )
        .await
        .expect("To create event")
    }

    #[actix_web::main]
    #[test]
    async fn updates_fields_and_revalidates_timespan() {
        let ctx = KlubbContext::create_inmemory();
        let event = seed_event(&ctx).await;

        let updated = execute(
            UpdateEventUseCase {
                event_id: event.id.clone(),
                title: Some("Vinterfest".into()),
                description: None,
                start_ts: None,
                end_ts: Some(5000),
                location: None,
                registration: None,
            },
            &ctx,
        )
        .await
        .expect("To update event");
        assert_eq!(updated.title, "Vinterfest");
        assert_eq!(updated.end_ts, 5000);

        let res = execute(
            UpdateEventUseCase {
                event_id: event.id,
                title: None,
                description: None,
                start_ts: Some(6000),
                end_ts: None,
                location: None,
                registration: None,
            },
            &ctx,
        )
        .await;
        assert_eq!(res.unwrap_err(), UseCaseError::InvalidTimespan);
    }
}
