use super::{INotificationRepo, NotificationListQuery};
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use crate::repos::shared::repo::DeleteResult;
use klubb_domain::{
    Channels, Notification, NotificationKind, Priority, RelatedEntity, ID,
};
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    Collection, Database,
};
use serde::{Deserialize, Serialize};

pub struct MongoNotificationRepo {
    collection: Collection,
}

impl MongoNotificationRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("notifications"),
        }
    }
}

#[async_trait::async_trait]
impl INotificationRepo for MongoNotificationRepo {
    async fn insert(&self, notification: &Notification) -> anyhow::Result<()> {
        mongo_repo::insert::<_, NotificationMongo>(&self.collection, notification).await
    }

    async fn bulk_insert(&self, notifications: &[Notification]) -> anyhow::Result<()> {
        mongo_repo::bulk_insert::<_, NotificationMongo>(&self.collection, notifications).await
    }

    async fn save(&self, notification: &Notification) -> anyhow::Result<()> {
        mongo_repo::save::<_, NotificationMongo>(&self.collection, notification).await
    }

    async fn find(&self, notification_id: &ID) -> Option<Notification> {
        mongo_repo::find::<_, NotificationMongo>(&self.collection, notification_id.inner_ref())
            .await
    }

    async fn find_for_recipient(
        &self,
        notification_id: &ID,
        recipient_id: &ID,
    ) -> Option<Notification> {
        let filter = doc! {
            "_id": notification_id.inner_ref(),
            "recipient_id": recipient_id.inner_ref()
        };
        mongo_repo::find_one_by::<_, NotificationMongo>(&self.collection, filter).await
    }

    async fn find_by_recipient(
        &self,
        recipient_id: &ID,
        query: NotificationListQuery,
        now: i64,
    ) -> anyhow::Result<Vec<Notification>> {
        let mut filter = doc! {
            "recipient_id": recipient_id.inner_ref(),
            "$and": [
                { "$or": [ { "send_at": Bson::Null }, { "send_at": { "$lte": now } } ] },
                { "$or": [ { "expires_at": Bson::Null }, { "expires_at": { "$gt": now } } ] }
            ]
        };
        if !query.include_archived {
            filter.insert("archived", false);
        }
        if query.unread_only {
            filter.insert("channels.inApp.read", false);
        }
        mongo_repo::find_many_by::<_, NotificationMongo>(&self.collection, filter).await
    }

    async fn mark_all_read(&self, recipient_id: &ID, now: i64) -> anyhow::Result<i64> {
        let filter = doc! {
            "recipient_id": recipient_id.inner_ref(),
            "archived": false,
            "channels.inApp.read": false
        };
        let update = doc! {
            "$set": {
                "channels.inApp.read": true,
                "channels.inApp.readAt": now
            }
        };
        mongo_repo::update_many(&self.collection, filter, update).await
    }

    async fn count_unread(&self, recipient_id: &ID) -> anyhow::Result<i64> {
        let filter = doc! {
            "recipient_id": recipient_id.inner_ref(),
            "archived": false,
            "channels.inApp.read": false
        };
        mongo_repo::count(&self.collection, filter).await
    }

    async fn find_due_scheduled(&self, now: i64) -> anyhow::Result<Vec<Notification>> {
        // $lte never matches null, so unscheduled records are skipped
        let filter = doc! {
            "sent": false,
            "send_at": { "$lte": now }
        };
        mongo_repo::find_many_by::<_, NotificationMongo>(&self.collection, filter).await
    }

    async fn delete_expired(&self, now: i64) -> anyhow::Result<DeleteResult> {
        let filter = doc! {
            "expires_at": { "$lte": now }
        };
        mongo_repo::delete_many_by(&self.collection, filter).await
    }

    async fn delete(&self, notification_id: &ID) -> Option<Notification> {
        mongo_repo::delete::<_, NotificationMongo>(&self.collection, notification_id.inner_ref())
            .await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct NotificationMongo {
    pub _id: ObjectId,
    pub recipient_id: ObjectId,
    pub sender_id: Option<ObjectId>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub channels: Channels,
    pub send_at: Option<i64>,
    pub sent: bool,
    pub related: Option<RelatedEntity>,
    pub expires_at: Option<i64>,
    pub archived: bool,
    pub created: i64,
}

impl MongoDocument<Notification> for NotificationMongo {
    fn into_domain(self) -> Notification {
        Notification {
            id: ID::from(self._id),
            recipient_id: ID::from(self.recipient_id),
            sender_id: self.sender_id.map(ID::from),
            kind: self.kind,
            title: self.title,
            message: self.message,
            priority: self.priority,
            channels: self.channels,
            send_at: self.send_at,
            sent: self.sent,
            related: self.related,
            expires_at: self.expires_at,
            archived: self.archived,
            created: self.created,
        }
    }

    fn from_domain(notification: &Notification) -> Self {
        Self {
            _id: notification.id.clone().inner(),
            recipient_id: notification.recipient_id.clone().inner(),
            sender_id: notification.sender_id.clone().map(|id| id.inner()),
            kind: notification.kind,
            title: notification.title.clone(),
            message: notification.message.clone(),
            priority: notification.priority,
            channels: notification.channels.clone(),
            send_at: notification.send_at,
            sent: notification.sent,
            related: notification.related.clone(),
            expires_at: notification.expires_at,
            archived: notification.archived,
            created: notification.created,
        }
    }

    fn get_id_filter(&self) -> Document {
        doc! {
            "_id": self._id.clone()
        }
    }
}
