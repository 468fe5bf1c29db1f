mod inmemory;
mod mongo;

use crate::repos::shared::repo::DeleteResult;
pub use inmemory::InMemoryNotificationRepo;
use klubb_domain::{Notification, ID};
pub use mongo::MongoNotificationRepo;

#[derive(Debug, Default, Clone)]
pub struct NotificationListQuery {
    pub unread_only: bool,
    pub include_archived: bool,
}

#[async_trait::async_trait]
pub trait INotificationRepo: Send + Sync {
    async fn insert(&self, notification: &Notification) -> anyhow::Result<()>;
    async fn bulk_insert(&self, notifications: &[Notification]) -> anyhow::Result<()>;
    async fn save(&self, notification: &Notification) -> anyhow::Result<()>;
    async fn find(&self, notification_id: &ID) -> Option<Notification>;
    /// Ownership is enforced by the query filter: a notification that
    /// exists but belongs to someone else is simply not found.
    async fn find_for_recipient(
        &self,
        notification_id: &ID,
        recipient_id: &ID,
    ) -> Option<Notification>;
    /// Listing skips scheduled-for-later and expired records.
    async fn find_by_recipient(
        &self,
        recipient_id: &ID,
        query: NotificationListQuery,
        now: i64,
    ) -> anyhow::Result<Vec<Notification>>;
    async fn mark_all_read(&self, recipient_id: &ID, now: i64) -> anyhow::Result<i64>;
    async fn count_unread(&self, recipient_id: &ID) -> anyhow::Result<i64>;
    /// Scheduled notifications whose `send_at` has passed without
    /// being dispatched yet.
    async fn find_due_scheduled(&self, now: i64) -> anyhow::Result<Vec<Notification>>;
    async fn delete_expired(&self, now: i64) -> anyhow::Result<DeleteResult>;
    async fn delete(&self, notification_id: &ID) -> Option<Notification>;
}
