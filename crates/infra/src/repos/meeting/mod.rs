mod inmemory;
mod mongo;

pub use inmemory::InMemoryMeetingRepo;
use klubb_domain::{Meeting, MeetingStatus, ID};
pub use mongo::MongoMeetingRepo;

#[async_trait::async_trait]
pub trait IMeetingRepo: Send + Sync {
    async fn insert(&self, meeting: &Meeting) -> anyhow::Result<()>;
    async fn save(&self, meeting: &Meeting) -> anyhow::Result<()>;
    async fn find(&self, meeting_id: &ID) -> Option<Meeting>;
    async fn find_all(&self, status: Option<MeetingStatus>) -> anyhow::Result<Vec<Meeting>>;
    async fn delete(&self, meeting_id: &ID) -> Option<Meeting>;
}
