use crate::error::KlubbError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::delete_todo::{APIResponse, PathParams};
use klubb_domain::{Todo, ID};
use klubb_infra::KlubbContext;

pub async fn delete_todo_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = DeleteTodoUseCase {
        todo_id: path_params.todo_id.clone(),
        user_id: user.id,
    };

    execute(usecase, &ctx)
        .await
        .map(|todo| HttpResponse::Ok().json(APIResponse::new(todo)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct DeleteTodoUseCase {
    pub todo_id: ID,
    pub user_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    NotYours,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(todo_id) => {
                Self::NotFound(format!("The todo with id: {}, was not found.", todo_id))
            }
            UseCaseError::NotYours => {
                Self::Forbidden("Only the owner can delete a todo".into())
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteTodoUseCase {
    type Response = Todo;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteTodo";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        let todo = ctx
            .repos
            .todos
            .find(&self.todo_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.todo_id.clone()))?;

        if todo.owner_id != self.user_id {
            return Err(UseCaseError::NotYours);
        }

        ctx.repos
            .todos
            .delete(&self.todo_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.todo_id.clone()))
    }
}
