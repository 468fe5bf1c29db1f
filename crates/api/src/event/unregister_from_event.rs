use crate::error::KlubbError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::unregister_from_event::{APIResponse, PathParams};
use klubb_domain::{Event, ID};
use klubb_infra::KlubbContext;

pub async fn unregister_from_event_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = UnregisterFromEventUseCase {
        event_id: path_params.event_id.clone(),
        user_id: user.id,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct UnregisterFromEventUseCase {
    pub event_id: ID,
    pub user_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EventNotFound(ID),
    NotRegistered,
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EventNotFound(event_id) => {
                Self::NotFound(format!("The event with id: {}, was not found.", event_id))
            }
            UseCaseError::NotRegistered => {
                Self::NotFound("You are not registered for this event".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UnregisterFromEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "UnregisterFromEvent";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        let mut event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::EventNotFound(self.event_id.clone()))?;

        if !event.unregister(&self.user_id) {
            return Err(UseCaseError::NotRegistered);
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
