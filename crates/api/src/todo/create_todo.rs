use super::notify_assignee;
use crate::error::KlubbError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::create_todo::{APIResponse, RequestBody};
use klubb_domain::{Todo, TodoStatus, ID};
use klubb_infra::KlubbContext;

pub async fn create_todo_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let user = protect_route(&http_req, &ctx).await?;
    let body = body.0;

    let usecase = CreateTodoUseCase {
        owner_id: user.id,
        title: body.title,
        description: body.description.unwrap_or_default(),
        due_ts: body.due_ts,
        assignee_id: body.assignee_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|todo| HttpResponse::Created().json(APIResponse::new(todo)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct CreateTodoUseCase {
    pub owner_id: ID,
    pub title: String,
    pub description: String,
    pub due_ts: Option<i64>,
    pub assignee_id: Option<ID>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EmptyTitle,
    AssigneeNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyTitle => Self::BadClientData("The todo needs a title".into()),
            UseCaseError::AssigneeNotFound(user_id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", user_id))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateTodoUseCase {
    type Response = Todo;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateTodo";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        if self.title.trim().is_empty() {
            return Err(UseCaseError::EmptyTitle);
        }
        if let Some(assignee_id) = &self.assignee_id {
            if ctx.repos.users.find(assignee_id).await.is_none() {
                return Err(UseCaseError::AssigneeNotFound(assignee_id.clone()));
            }
        }

        let now = ctx.sys.get_timestamp_millis();
        let todo = Todo {
            id: Default::default(),
            owner_id: self.owner_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            status: TodoStatus::Open,
            due_ts: self.due_ts,
            completed_at: None,
            assignee_id: self.assignee_id.clone(),
            created: now,
            updated: now,
        };

        ctx.repos
            .todos
            .insert(&todo)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(todo)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(NotifyAssignee)]
    }
}

pub struct NotifyAssignee;

#[async_trait::async_trait(?Send)]
impl Subscriber<CreateTodoUseCase> for NotifyAssignee {
    async fn notify(&self, todo: &Todo, ctx: &KlubbContext) {
        if let Some(assignee_id) = &todo.assignee_id {
            // Self-assignment needs no notification
            if *assignee_id != todo.owner_id {
                notify_assignee(assignee_id.clone(), todo, ctx).await;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use klubb_domain::{NotificationKind, User};

    #[actix_web::main]
    #[test]
    async fn assignment_notifies_the_assignee() {
        let ctx = KlubbContext::create_inmemory();
        let owner = User::new("kari@klubb.no".into(), "Kari".into(), "h".into(), 0);
        let mut assignee = User::new("ola@klubb.no".into(), "Ola".into(), "h".into(), 0);
        assignee.verified = true;
        ctx.repos.users.insert(&owner).await.unwrap();
        ctx.repos.users.insert(&assignee).await.unwrap();

        let todo = execute(
            CreateTodoUseCase {
                owner_id: owner.id,
                title: "Bestille lokale".into(),
                description: "".into(),
                due_ts: None,
                assignee_id: Some(assignee.id.clone()),
            },
            &ctx,
        )
        .await
        .expect("To create todo");
        assert_eq!(todo.status, TodoStatus::Open);

        let inbox = ctx
            .repos
            .notifications
            .find_by_recipient(&assignee.id, Default::default(), 0)
            .await
            .unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::TodoAssigned);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_unknown_assignee() {
        let ctx = KlubbContext::create_inmemory();
        let owner = User::new("kari@klubb.no".into(), "Kari".into(), "h".into(), 0);
        ctx.repos.users.insert(&owner).await.unwrap();

        let unknown = ID::new();
        let res = execute(
            CreateTodoUseCase {
                owner_id: owner.id,
                title: "Rydde".into(),
                description: "".into(),
                due_ts: None,
                assignee_id: Some(unknown.clone()),
            },
            &ctx,
        )
        .await;
        assert_eq!(res.unwrap_err(), UseCaseError::AssigneeNotFound(unknown));
    }
}
