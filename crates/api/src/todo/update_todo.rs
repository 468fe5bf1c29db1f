use super::notify_assignee;
use crate::error::KlubbError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::update_todo::{APIResponse, PathParams, RequestBody};
use klubb_domain::{Todo, TodoStatus, ID};
use klubb_infra::KlubbContext;

pub async fn update_todo_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let user = protect_route(&http_req, &ctx).await?;
    let body = body.0;

    let usecase = UpdateTodoUseCase {
        todo_id: path_params.todo_id.clone(),
        user_id: user.id,
        title: body.title,
        description: body.description,
        status: body.status,
        due_ts: body.due_ts,
        assignee_id: body.assignee_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|update| HttpResponse::Ok().json(APIResponse::new(update.todo)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct UpdateTodoUseCase {
    pub todo_id: ID,
    pub user_id: ID,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
    pub due_ts: Option<i64>,
    pub assignee_id: Option<ID>,
}

#[derive(Debug)]
pub struct TodoUpdate {
    pub todo: Todo,
    pub newly_assigned: Option<ID>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    NotYours,
    AssigneeNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(todo_id) => {
                Self::NotFound(format!("The todo with id: {}, was not found.", todo_id))
            }
            UseCaseError::NotYours => {
                Self::Forbidden("Only the owner or assignee can change a todo".into())
            }
            UseCaseError::AssigneeNotFound(user_id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", user_id))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateTodoUseCase {
    type Response = TodoUpdate;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateTodo";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        let mut todo = ctx
            .repos
            .todos
            .find(&self.todo_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.todo_id.clone()))?;

        let is_assignee = todo.assignee_id.as_ref() == Some(&self.user_id);
        if todo.owner_id != self.user_id && !is_assignee {
            return Err(UseCaseError::NotYours);
        }

        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(description) = &self.description {
            todo.description = description.clone();
        }
        if let Some(due_ts) = self.due_ts {
            todo.due_ts = Some(due_ts);
        }

        let mut newly_assigned = None;
        if let Some(assignee_id) = &self.assignee_id {
            if ctx.repos.users.find(assignee_id).await.is_none() {
                return Err(UseCaseError::AssigneeNotFound(assignee_id.clone()));
            }
            if todo.assignee_id.as_ref() != Some(assignee_id) {
                newly_assigned = Some(assignee_id.clone());
            }
            todo.assignee_id = Some(assignee_id.clone());
        }

        let now = ctx.sys.get_timestamp_millis();
        if let Some(status) = self.status {
            todo.set_status(status, now);
        }
        todo.updated = now;

        ctx.repos
            .todos
            .save(&todo)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(TodoUpdate {
            todo,
            newly_assigned,
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(NotifyNewAssignee)]
    }
}

pub struct NotifyNewAssignee;

#[async_trait::async_trait(?Send)]
impl Subscriber<UpdateTodoUseCase> for NotifyNewAssignee {
    async fn notify(&self, update: &TodoUpdate, ctx: &KlubbContext) {
        if let Some(assignee_id) = &update.newly_assigned {
            if *assignee_id != update.todo.owner_id {
                notify_assignee(assignee_id.clone(), &update.todo, ctx).await;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::todo::create_todo::CreateTodoUseCase;
    use klubb_domain::User;

    async fn seed(ctx: &KlubbContext) -> (User, Todo) {
        let owner = User::new("kari@klubb.no".into(), "Kari".into(), "h".into(), 0);
        ctx.repos.users.insert(&owner).await.unwrap();
        let todo = execute(
            CreateTodoUseCase {
                owner_id: owner.id.clone(),
                title: "Bestille lokale".into(),
                description: "".into(),
                due_ts: None,
                assignee_id: None,
            },
            ctx,
        )
        .await
        .expect("To create todo");
        (owner, todo)
    }

    #[actix_web::main]
    #[test]
    async fn completing_sets_completed_at_once() {
        let ctx = KlubbContext::create_inmemory();
        let (owner, todo) = seed(&ctx).await;

        let done = execute(
            UpdateTodoUseCase {
                todo_id: todo.id.clone(),
                user_id: owner.id.clone(),
                title: None,
                description: None,
                status: Some(TodoStatus::Done),
                due_ts: None,
                assignee_id: None,
            },
            &ctx,
        )
        .await
        .expect("To complete todo");
        let completed_at = done.todo.completed_at;
        assert!(completed_at.is_some());

        let reopened = execute(
            UpdateTodoUseCase {
                todo_id: todo.id,
                user_id: owner.id,
                title: None,
                description: None,
                status: Some(TodoStatus::Open),
                due_ts: None,
                assignee_id: None,
            },
            &ctx,
        )
        .await
        .expect("To reopen todo");
        assert_eq!(reopened.todo.completed_at, None);
    }

    #[actix_web::main]
    #[test]
    async fn strangers_cannot_touch_the_todo() {
        let ctx = KlubbContext::create_inmemory();
        let (_, todo) = seed(&ctx).await;
        let stranger = User::new("ola@klubb.no".into(), "Ola".into(), "h".into(), 0);
        ctx.repos.users.insert(&stranger).await.unwrap();

        let res = execute(
            UpdateTodoUseCase {
                todo_id: todo.id,
                user_id: stranger.id,
                title: Some("Hijacked".into()),
                description: None,
                status: None,
                due_ts: None,
                assignee_id: None,
            },
            &ctx,
        )
        .await;
        assert_eq!(res.unwrap_err(), UseCaseError::NotYours);
    }
}
