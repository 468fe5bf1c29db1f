mod inmemory;
mod mongo;

pub use inmemory::InMemoryUserRepo;
use klubb_domain::{User, ID};
pub use mongo::MongoUserRepo;

#[async_trait::async_trait]
pub trait IUserRepo: Send + Sync {
    async fn insert(&self, user: &User) -> anyhow::Result<()>;
    async fn save(&self, user: &User) -> anyhow::Result<()>;
    async fn find(&self, user_id: &ID) -> Option<User>;
    async fn find_many(&self, user_ids: &[ID]) -> anyhow::Result<Vec<User>>;
    async fn find_by_email(&self, email: &str) -> Option<User>;
    async fn find_all(&self) -> anyhow::Result<Vec<User>>;
    /// Users that club-wide fan-outs should target: active + verified.
    async fn find_notifiable(&self) -> anyhow::Result<Vec<User>>;
    async fn delete(&self, user_id: &ID) -> Option<User>;
}
