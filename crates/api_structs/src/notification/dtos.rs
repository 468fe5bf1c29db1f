use klubb_domain::{Channels, Notification, NotificationKind, Priority, RelatedEntity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDTO {
    pub id: String,
    pub recipient_id: String,
    pub sender_id: Option<String>,
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

impl NotificationDTO {
    pub fn new(notification: Notification) -> Self {
        Self {
            id: notification.id.as_string(),
            recipient_id: notification.recipient_id.as_string(),
            sender_id: notification.sender_id.map(|id| id.as_string()),
            kind: notification.kind,
            title: notification.title,
            message: notification.message,
            priority: notification.priority,
            channels: notification.channels,
            send_at: notification.send_at,
            sent: notification.sent,
            related: notification.related,
            expires_at: notification.expires_at,
            archived: notification.archived,
            created: notification.created,
        }
    }
}
