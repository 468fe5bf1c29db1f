use klubb_domain::{Todo, TodoStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TodoDTO {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub status: TodoStatus,
    pub due_ts: Option<i64>,
    pub completed_at: Option<i64>,
    pub assignee_id: Option<String>,
    pub created: i64,
    pub updated: i64,
}

impl TodoDTO {
    pub fn new(todo: Todo) -> Self {
        Self {
            id: todo.id.as_string(),
            owner_id: todo.owner_id.as_string(),
            title: todo.title,
            description: todo.description,
            status: todo.status,
            due_ts: todo.due_ts,
            completed_at: todo.completed_at,
            assignee_id: todo.assignee_id.map(|id| id.as_string()),
            created: todo.created,
            updated: todo.updated,
        }
    }
}
