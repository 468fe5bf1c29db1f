mod create_todo;
mod delete_todo;
mod list_todos;
mod update_todo;

use crate::notification::{CreateNotificationUseCase, NotificationSpec};
use crate::shared::usecase::execute;
use actix_web::web;
use create_todo::create_todo_controller;
use delete_todo::delete_todo_controller;
use klubb_domain::{NotificationKind, RelatedEntity, RelatedEntityKind, Todo, ID};
use klubb_infra::KlubbContext;
use list_todos::list_todos_controller;
use tracing::error;
use update_todo::update_todo_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/todos", web::post().to(create_todo_controller));
    cfg.route("/todos", web::get().to(list_todos_controller));
    cfg.route("/todos/{todo_id}", web::put().to(update_todo_controller));
    cfg.route("/todos/{todo_id}", web::delete().to(delete_todo_controller));
}

pub(crate) async fn notify_assignee(assignee_id: ID, todo: &Todo, ctx: &KlubbContext) {
    let mut spec = NotificationSpec::new(
        assignee_id,
        NotificationKind::TodoAssigned,
        todo.title.clone(),
        format!("The task \"{}\" has been assigned to you.", todo.title),
    );
    spec.related = Some(RelatedEntity {
        kind: RelatedEntityKind::Todo,
        id: todo.id.clone(),
    });
    if let Err(e) = execute(CreateNotificationUseCase { spec }, ctx).await {
        error!("Could not notify assignee for todo {}: {:?}", todo.id, e);
    }
}
