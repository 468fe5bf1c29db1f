use super::{INotificationRepo, NotificationListQuery};
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::repo::DeleteResult;
use klubb_domain::{Notification, ID};

pub struct InMemoryNotificationRepo {
    notifications: std::sync::Mutex<Vec<Notification>>,
}

impl InMemoryNotificationRepo {
    pub fn new() -> Self {
        Self {
            notifications: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl INotificationRepo for InMemoryNotificationRepo {
    async fn insert(&self, notification: &Notification) -> anyhow::Result<()> {
        insert(notification, &self.notifications);
        Ok(())
    }

    async fn bulk_insert(&self, notifications: &[Notification]) -> anyhow::Result<()> {
        for notification in notifications {
            insert(notification, &self.notifications);
        }
        Ok(())
    }

    async fn save(&self, notification: &Notification) -> anyhow::Result<()> {
        save(notification, &self.notifications);
        Ok(())
    }

    async fn find(&self, notification_id: &ID) -> Option<Notification> {
        find(notification_id, &self.notifications)
    }

    async fn find_for_recipient(
        &self,
        notification_id: &ID,
        recipient_id: &ID,
    ) -> Option<Notification> {
        find_by(&self.notifications, |n| {
            n.id == *notification_id && n.recipient_id == *recipient_id
        })
        .into_iter()
        .next()
    }

    async fn find_by_recipient(
        &self,
        recipient_id: &ID,
        query: NotificationListQuery,
        now: i64,
    ) -> anyhow::Result<Vec<Notification>> {
        Ok(find_by(&self.notifications, |n| {
            n.recipient_id == *recipient_id
                && !n.is_scheduled_after(now)
                && !n.is_expired(now)
                && (query.include_archived || !n.archived)
                && (!query.unread_only || !n.channels.in_app.read)
        }))
    }

    async fn mark_all_read(&self, recipient_id: &ID, now: i64) -> anyhow::Result<i64> {
        Ok(update_many(
            &self.notifications,
            |n| n.recipient_id == *recipient_id && !n.archived && !n.channels.in_app.read,
            |n| n.mark_read(now),
        ))
    }

    async fn count_unread(&self, recipient_id: &ID) -> anyhow::Result<i64> {
        Ok(count_by(&self.notifications, |n| {
            n.recipient_id == *recipient_id && !n.archived && !n.channels.in_app.read
        }))
    }

    async fn find_due_scheduled(&self, now: i64) -> anyhow::Result<Vec<Notification>> {
        Ok(find_by(&self.notifications, |n| {
            !n.sent && matches!(n.send_at, Some(at) if at <= now)
        }))
    }

    async fn delete_expired(&self, now: i64) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.notifications, |n| n.is_expired(now)))
    }

    async fn delete(&self, notification_id: &ID) -> Option<Notification> {
        delete(notification_id, &self.notifications)
    }
}
