use super::subscribers::notify_users;
use crate::error::KlubbError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::register_for_event::{APIResponse, PathParams};
use klubb_domain::{Event, NotificationKind, RegistrationError, ID};
use klubb_infra::KlubbContext;

pub async fn register_for_event_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = RegisterForEventUseCase {
        event_id: path_params.event_id.clone(),
        user_id: user.id,
    };

    execute(usecase, &ctx)
        .await
        .map(|registration| HttpResponse::Ok().json(APIResponse::new(registration.event)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct RegisterForEventUseCase {
    pub event_id: ID,
    pub user_id: ID,
}

#[derive(Debug)]
pub struct Registration {
    pub event: Event,
    pub user_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    Registration(RegistrationError),
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => {
                Self::NotFound(format!("The event with id: {}, was not found.", event_id))
            }
            UseCaseError::Registration(reason) => match reason {
                RegistrationError::NotOpen => {
                    Self::Conflict("The event is not open for registration".into())
                }
                RegistrationError::DeadlinePassed => {
                    Self::Conflict("The registration deadline has passed".into())
                }
                RegistrationError::Full => Self::Conflict("The event is full".into()),
                RegistrationError::AlreadyRegistered => {
                    Self::Conflict("You are already registered for this event".into())
                }
            },
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RegisterForEventUseCase {
    type Response = Registration;

    type Error = UseCaseError;

    const NAME: &'static str = "RegisterForEvent";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        let mut event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.event_id.clone()))?;

        event
            .register(self.user_id.clone(), ctx.sys.get_timestamp_millis())
            .map_err(UseCaseError::Registration)?;
        event.updated = ctx.sys.get_timestamp_millis();

        ctx.repos
            .events
            .save(&event)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(Registration {
            event,
            user_id: self.user_id.clone(),
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(ConfirmRegistration)]
    }
}

/// Confirmation back to the registrant only.
pub struct ConfirmRegistration;

#[async_trait::async_trait(?Send)]
impl Subscriber<RegisterForEventUseCase> for ConfirmRegistration {
    async fn notify(&self, registration: &Registration, ctx: &KlubbContext) {
        let event = &registration.event;
        notify_users(
            vec![registration.user_id.clone()],
            event,
            NotificationKind::EventRegistration,
            event.title.clone(),
            format!("You are registered for \"{}\".", event.title),
            ctx,
        )
        .await;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::event::change_event_status::ChangeEventStatusUseCase;
    use crate::event::create_event::CreateEventUseCase;
    use klubb_domain::{EventLocation, EventStatus, RegistrationPolicy, User};

    async fn seed_published_event(ctx: &KlubbContext, max: Option<usize>) -> Event {
        let event = execute(
            CreateEventUseCase {
                title: "Skitur".into(),
                description: "".into(),
                start_ts: 1000,
                end_ts: 2000,
                location: EventLocation::Online {
                    url: "https://klubb.no/tur".into(),
                },
                registration: RegistrationPolicy {
                    max_participants: max,
                    ..Default::default()
                },
                created_by: ID::new(),
            },
            ctx,
        )
        .await
        .expect("To create event");
        execute(
            ChangeEventStatusUseCase {
                event_id: event.id,
                status: EventStatus::Published,
                reason: None,
            },
            ctx,
        )
        .await
        .expect("To publish event")
        .event
    }

    async fn seed_member(ctx: &KlubbContext, email: &str) -> User {
        let mut user = User::new(email.into(), "Medlem".into(), "h".into(), 0);
        user.verified = true;
        ctx.repos.users.insert(&user).await.unwrap();
        user
    }

    #[actix_web::main]
    #[test]
    async fn registers_and_confirms() {
        let ctx = KlubbContext::create_inmemory();
        let event = seed_published_event(&ctx, None).await;
        let user = seed_member(&ctx, "kari@klubb.no").await;

        let registration = execute(
            RegisterForEventUseCase {
                event_id: event.id.clone(),
                user_id: user.id.clone(),
            },
            &ctx,
        )
        .await
        .expect("To register");
        assert_eq!(registration.event.participant_count, 1);

        let inbox = ctx
            .repos
            .notifications
            .find_by_recipient(&user.id, Default::default(), 0)
            .await
            .unwrap();
        assert!(inbox
            .iter()
            .any(|n| n.kind == NotificationKind::EventRegistration));
    }

    #[actix_web::main]
    #[test]
    async fn rejects_when_full() {
        let ctx = KlubbContext::create_inmemory();
        let event = seed_published_event(&ctx, Some(1)).await;
        let first = seed_member(&ctx, "kari@klubb.no").await;
        let second = seed_member(&ctx, "ola@klubb.no").await;

        execute(
            RegisterForEventUseCase {
                event_id: event.id.clone(),
                user_id: first.id,
            },
            &ctx,
        )
        .await
        .expect("To register");

        let res = execute(
            RegisterForEventUseCase {
                event_id: event.id,
                user_id: second.id,
            },
            &ctx,
        )
        .await;
        assert_eq!(
            res.unwrap_err(),
            UseCaseError::Registration(RegistrationError::Full)
        );
    }
}
