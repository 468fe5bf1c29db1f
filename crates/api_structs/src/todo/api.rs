use crate::dtos::TodoDTO;
use klubb_domain::{Todo, TodoStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub todo: TodoDTO,
}

impl TodoResponse {
    pub fn new(todo: Todo) -> Self {
        Self {
            todo: TodoDTO::new(todo),
        }
    }
}

pub mod create_todo {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: String,
        pub description: Option<String>,
        pub due_ts: Option<i64>,
        pub assignee_id: Option<ID>,
    }

    pub type APIResponse = TodoResponse;
}

pub mod list_todos {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub status: Option<TodoStatus>,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub todos: Vec<TodoDTO>,
    }

    impl APIResponse {
        pub fn new(todos: Vec<Todo>) -> Self {
            Self {
                todos: todos.into_iter().map(TodoDTO::new).collect(),
            }
        }
    }
}

pub mod update_todo {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub todo_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: Option<String>,
        pub description: Option<String>,
        pub status: Option<TodoStatus>,
        pub due_ts: Option<i64>,
        pub assignee_id: Option<ID>,
    }

    pub type APIResponse = TodoResponse;
}

pub mod delete_todo {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub todo_id: ID,
    }

    pub type APIResponse = TodoResponse;
}
