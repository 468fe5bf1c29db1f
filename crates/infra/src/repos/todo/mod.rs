mod inmemory;
mod mongo;

pub use inmemory::InMemoryTodoRepo;
use klubb_domain::{Todo, TodoStatus, ID};
pub use mongo::MongoTodoRepo;

#[async_trait::async_trait]
pub trait ITodoRepo: Send + Sync {
    async fn insert(&self, todo: &Todo) -> anyhow::Result<()>;
    async fn save(&self, todo: &Todo) -> anyhow::Result<()>;
    async fn find(&self, todo_id: &ID) -> Option<Todo>;
    /// Todos visible to a user: owned by or assigned to them.
    async fn find_for_user(
        &self,
        user_id: &ID,
        status: Option<TodoStatus>,
    ) -> anyhow::Result<Vec<Todo>>;
    async fn delete(&self, todo_id: &ID) -> Option<Todo>;
}
