use super::ITodoRepo;
use crate::repos::shared::inmemory_repo::*;
use klubb_domain::{Todo, TodoStatus, ID};

pub struct InMemoryTodoRepo {
    todos: std::sync::Mutex<Vec<Todo>>,
}

impl InMemoryTodoRepo {
    pub fn new() -> Self {
        Self {
            todos: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ITodoRepo for InMemoryTodoRepo {
    async fn insert(&self, todo: &Todo) -> anyhow::Result<()> {
        insert(todo, &self.todos);
        Ok(())
    }

    async fn save(&self, todo: &Todo) -> anyhow::Result<()> {
        save(todo, &self.todos);
        Ok(())
    }

    async fn find(&self, todo_id: &ID) -> Option<Todo> {
        find(todo_id, &self.todos)
    }

    async fn find_for_user(
        &self,
        user_id: &ID,
        status: Option<TodoStatus>,
    ) -> anyhow::Result<Vec<Todo>> {
        Ok(find_by(&self.todos, |t| {
            (t.owner_id == *user_id || t.assignee_id.as_ref() == Some(user_id))
                && status.map_or(true, |s| t.status == s)
        }))
    }

    async fn delete(&self, todo_id: &ID) -> Option<Todo> {
        delete(todo_id, &self.todos)
    }
}
