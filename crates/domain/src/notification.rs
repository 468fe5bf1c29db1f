use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

pub const NOTIFICATION_TITLE_MAX_LEN: usize = 200;
pub const NOTIFICATION_MESSAGE_MAX_LEN: usize = 1000;

/// A notification addressed to a single recipient. Created once,
/// mutated only to flip read / sent / archived flags.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: ID,
    pub recipient_id: ID,
    pub sender_id: Option<ID>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub channels: Channels,
    /// When set to a future timestamp the notification is held back
    /// from delivery and list queries until due.
    pub send_at: Option<i64>,
    pub sent: bool,
    pub related: Option<RelatedEntity>,
    /// Past this timestamp the record is hidden and eligible for
    /// deletion.
    pub expires_at: Option<i64>,
    pub archived: bool,
    pub created: i64,
}

impl Notification {
    pub fn is_scheduled_after(&self, now: i64) -> bool {
        matches!(self.send_at, Some(at) if at > now)
    }

    pub fn is_expired(&self, now: i64) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }

    /// Idempotent. `read_at` keeps the timestamp of the first call.
    pub fn mark_read(&mut self, now: i64) {
        if !self.channels.in_app.read {
            self.channels.in_app.read = true;
            self.channels.in_app.read_at = Some(now);
        }
    }

    pub fn mark_email_sent(&mut self, now: i64) {
        self.channels.email.sent = true;
        self.channels.email.sent_at = Some(now);
    }

    pub fn valid_lengths(title: &str, message: &str) -> bool {
        !title.is_empty()
            && title.len() <= NOTIFICATION_TITLE_MAX_LEN
            && !message.is_empty()
            && message.len() <= NOTIFICATION_MESSAGE_MAX_LEN
    }
}

impl Entity for Notification {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// Closed set of notification kinds. The email renderer below matches
/// on this exhaustively, so an unmapped kind cannot exist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    EventAnnouncement,
    EventReminder,
    EventUpdate,
    EventCancellation,
    EventRegistration,
    EventFeedbackRequest,
    TodoAssigned,
    TodoDueSoon,
    TodoCompleted,
    MeetingScheduled,
    MeetingReminder,
    MeetingCancelled,
    Announcement,
    Welcome,
    System,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// Per-channel delivery record.
///
/// The push channel is declared here because the wire format carries
/// it, but no delivery path exists for it. That mirrors the system
/// being reimplemented and is intentional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channels {
    pub in_app: InAppChannel,
    pub email: EmailChannel,
    pub push: PushChannel,
}

impl Channels {
    pub fn new(email_enabled: bool) -> Self {
        Self {
            in_app: InAppChannel {
                enabled: true,
                read: false,
                read_at: None,
            },
            email: EmailChannel {
                enabled: email_enabled,
                sent: false,
                sent_at: None,
            },
            push: PushChannel {
                enabled: false,
                sent: false,
                sent_at: None,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InAppChannel {
    pub enabled: bool,
    pub read: bool,
    pub read_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailChannel {
    pub enabled: bool,
    pub sent: bool,
    pub sent_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushChannel {
    pub enabled: bool,
    pub sent: bool,
    pub sent_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RelatedEntity {
    pub kind: RelatedEntityKind,
    pub id: ID,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RelatedEntityKind {
    Event,
    Todo,
    Meeting,
    User,
}

pub struct EmailTemplate {
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl Notification {
    /// Renders the email for this notification. Resolved by matching
    /// on the kind, so every kind has a template by construction.
    pub fn email_template(&self, recipient_name: &str) -> EmailTemplate {
        let heading = match self.kind {
            NotificationKind::EventAnnouncement => "New event",
            NotificationKind::EventReminder => "Starting soon",
            NotificationKind::EventUpdate => "Event updated",
            NotificationKind::EventCancellation => "Event cancelled",
            NotificationKind::EventRegistration => "Registration confirmed",
            NotificationKind::EventFeedbackRequest => "How was it?",
            NotificationKind::TodoAssigned => "Task assigned to you",
            NotificationKind::TodoDueSoon => "Task due soon",
            NotificationKind::TodoCompleted => "Task completed",
            NotificationKind::MeetingScheduled => "Meeting scheduled",
            NotificationKind::MeetingReminder => "Meeting reminder",
            NotificationKind::MeetingCancelled => "Meeting cancelled",
            NotificationKind::Announcement => "Announcement",
            NotificationKind::Welcome => "Welcome to the club",
            NotificationKind::System => "Notice",
        };

        let subject = format!("{}: {}", heading, self.title);
        let text = format!("Hi {},\n\n{}\n", recipient_name, self.message);
        let html = format!(
            "<html><body><h2>{}</h2><p>Hi {},</p><p>{}</p></body></html>",
            heading, recipient_name, self.message
        );
        EmailTemplate {
            subject,
            html,
            text,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn notification(kind: NotificationKind) -> Notification {
        Notification {
            id: Default::default(),
            recipient_id: Default::default(),
            sender_id: None,
            kind,
            title: "Sommerfest".into(),
            message: "Starter klokka ti".into(),
            priority: Default::default(),
            channels: Channels::new(true),
            send_at: None,
            sent: false,
            related: None,
            expires_at: None,
            archived: false,
            created: 0,
        }
    }

    #[test]
    fn mark_read_is_idempotent() {
        let mut n = notification(NotificationKind::System);
        n.mark_read(10);
        assert!(n.channels.in_app.read);
        assert_eq!(n.channels.in_app.read_at, Some(10));
        n.mark_read(20);
        assert!(n.channels.in_app.read);
        assert_eq!(n.channels.in_app.read_at, Some(10));
    }

    #[test]
    fn scheduling_and_expiry_windows() {
        let mut n = notification(NotificationKind::Announcement);
        n.send_at = Some(100);
        assert!(n.is_scheduled_after(50));
        assert!(!n.is_scheduled_after(100));

        n.expires_at = Some(200);
        assert!(!n.is_expired(199));
        assert!(n.is_expired(200));
    }

    #[test]
    fn length_bounds() {
        assert!(Notification::valid_lengths("t", "m"));
        assert!(!Notification::valid_lengths("", "m"));
        assert!(!Notification::valid_lengths("t", ""));
        assert!(!Notification::valid_lengths(&"x".repeat(201), "m"));
        assert!(!Notification::valid_lengths("t", &"x".repeat(1001)));
    }

    #[test]
    fn cancellation_template_carries_reason() {
        let mut n = notification(NotificationKind::EventCancellation);
        n.message = "Cancelled: venue unavailable".into();
        let template = n.email_template("Kari");
        assert!(template.subject.starts_with("Event cancelled"));
        assert!(template.text.contains("venue unavailable"));
        assert!(template.html.contains("venue unavailable"));
    }
}
