mod inmemory;
mod mongo;

pub use inmemory::InMemoryEventRepo;
use klubb_domain::{Event, EventStatus, ID};
pub use mongo::MongoEventRepo;

#[derive(Debug, Default, Clone)]
pub struct EventQuery {
    pub status: Option<EventStatus>,
    pub from_ts: Option<i64>,
    pub until_ts: Option<i64>,
}

#[async_trait::async_trait]
pub trait IEventRepo: Send + Sync {
    async fn insert(&self, event: &Event) -> anyhow::Result<()>;
    async fn save(&self, event: &Event) -> anyhow::Result<()>;
    async fn find(&self, event_id: &ID) -> Option<Event>;
    async fn find_by_query(&self, query: EventQuery) -> anyhow::Result<Vec<Event>>;
    /// Published events starting inside `[window_start, window_end)`
    /// that have not had their reminder sent yet.
    async fn find_in_reminder_window(
        &self,
        window_start: i64,
        window_end: i64,
    ) -> anyhow::Result<Vec<Event>>;
    /// Atomically claims the reminder flag. Returns false when the
    /// flag was already set, so a concurrent tick cannot fan out the
    /// same event twice.
    async fn mark_reminder_sent(&self, event_id: &ID) -> anyhow::Result<bool>;
    async fn delete(&self, event_id: &ID) -> Option<Event>;
}
