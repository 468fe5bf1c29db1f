use crate::error::KlubbError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::list_todos::{APIResponse, QueryParams};
use klubb_domain::{Todo, TodoStatus, ID};
use klubb_infra::KlubbContext;

pub async fn list_todos_controller(
    http_req: HttpRequest,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = ListTodosUseCase {
        user_id: user.id,
        status: query_params.status,
    };

    execute(usecase, &ctx)
        .await
        .map(|todos| HttpResponse::Ok().json(APIResponse::new(todos)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct ListTodosUseCase {
    pub user_id: ID,
    pub status: Option<TodoStatus>,
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
impl UseCase for ListTodosUseCase {
    type Response = Vec<Todo>;

    type Error = UseCaseError;

    const NAME: &'static str = "ListTodos";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .todos
            .find_for_user(&self.user_id, self.status)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
