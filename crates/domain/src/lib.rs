mod event;
mod meeting;
mod notification;
mod shared;
mod todo;
mod user;

pub use event::{
    Event, EventLocation, EventStatus, Participant, RegistrationError, RegistrationPolicy,
};
pub use meeting::{Meeting, MeetingAttendee, MeetingStatus};
pub use notification::{
    Channels, EmailChannel, EmailTemplate, InAppChannel, Notification, NotificationKind, Priority,
    PushChannel, RelatedEntity, RelatedEntityKind, NOTIFICATION_MESSAGE_MAX_LEN,
    NOTIFICATION_TITLE_MAX_LEN,
};
pub use shared::entity::{Entity, ID};
pub use todo::{Todo, TodoStatus};
pub use user::{CalendarIntegration, CalendarProvider, User, UserPreferences, UserRole};
