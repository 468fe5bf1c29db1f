use crate::error::KlubbError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::list_events::{APIResponse, QueryParams};
use klubb_domain::Event;
use klubb_infra::{EventQuery, KlubbContext};

pub async fn list_events_controller(
    http_req: HttpRequest,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let _user = protect_route(&http_req, &ctx).await?;

    let usecase = ListEventsUseCase {
        query: EventQuery {
            status: query_params.status.clone(),
            from_ts: query_params.from_ts,
            until_ts: query_params.until_ts,
        },
    };

    execute(usecase, &ctx)
        .await
        .map(|events| HttpResponse::Ok().json(APIResponse::new(events)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct ListEventsUseCase {
    pub query: EventQuery,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ListEventsUseCase {
    type Response = Vec<Event>;

    type Error = UseCaseError;

    const NAME: &'static str = "ListEvents";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .events
            .find_by_query(self.query.clone())
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
