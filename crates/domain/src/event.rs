use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A club event that members register for.
///
/// `participant_count` and `attendance_count` are derived from the
/// participant list and recomputed on every mutation of it.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: ID,
    pub title: String,
    pub description: String,
    pub start_ts: i64,
    pub end_ts: i64,
    pub location: EventLocation,
    pub registration: RegistrationPolicy,
    pub participants: Vec<Participant>,
    pub participant_count: usize,
    pub attendance_count: usize,
    pub status: EventStatus,
    pub reminder_sent: bool,
    pub followup_sent: bool,
    pub created_by: ID,
    pub created: i64,
    pub updated: i64,
}

impl Event {
    /// `end_ts` must be strictly after `start_ts`.
    pub fn has_valid_timespan(start_ts: i64, end_ts: i64) -> bool {
        end_ts > start_ts
    }

    pub fn registered(&self, user_id: &ID) -> bool {
        self.participants.iter().any(|p| p.user_id == *user_id)
    }

    pub fn register(&mut self, user_id: ID, now: i64) -> Result<(), RegistrationError> {
        if self.status != EventStatus::Published {
            return Err(RegistrationError::NotOpen);
        }
        if let Some(deadline) = self.registration.deadline_ts {
            if now > deadline {
                return Err(RegistrationError::DeadlinePassed);
            }
        }
        if let Some(max) = self.registration.max_participants {
            if self.participants.len() >= max {
                return Err(RegistrationError::Full);
            }
        }
        if self.registered(&user_id) {
            return Err(RegistrationError::AlreadyRegistered);
        }

        self.participants.push(Participant {
            user_id,
            registered_at: now,
            attended: false,
            feedback: None,
        });
        self.sync_counts();
        Ok(())
    }

    /// Returns false when the user was not registered.
    pub fn unregister(&mut self, user_id: &ID) -> bool {
        let before = self.participants.len();
        self.participants.retain(|p| p.user_id != *user_id);
        self.sync_counts();
        before != self.participants.len()
    }

    pub fn record_attendance(&mut self, user_id: &ID, attended: bool) -> bool {
        let found = match self.participants.iter_mut().find(|p| p.user_id == *user_id) {
            Some(p) => {
                p.attended = attended;
                true
            }
            None => false,
        };
        self.sync_counts();
        found
    }

    fn sync_counts(&mut self) {
        self.participant_count = self.participants.len();
        self.attendance_count = self.participants.iter().filter(|p| p.attended).count();
    }
}

impl Entity for Event {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Published,
    Cancelled,
    Completed,
}

impl EventStatus {
    /// Valid forward transitions. Anything else needs no support,
    /// cancelled and completed are terminal.
    pub fn can_transition(&self, to: &EventStatus) -> bool {
        matches!(
            (self, to),
            (EventStatus::Draft, EventStatus::Published)
                | (EventStatus::Draft, EventStatus::Cancelled)
                | (EventStatus::Published, EventStatus::Cancelled)
                | (EventStatus::Published, EventStatus::Completed)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventLocation {
    Online { url: String },
    Offline { address: String },
    Hybrid { url: String, address: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPolicy {
    pub deadline_ts: Option<i64>,
    pub max_participants: Option<usize>,
    /// Fee in the club currency's minor unit. Informational only,
    /// payment handling happens outside this server.
    pub fee: Option<u32>,
    pub external_rsvp_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: ID,
    pub registered_at: i64,
    pub attended: bool,
    pub feedback: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum RegistrationError {
    NotOpen,
    DeadlinePassed,
    Full,
    AlreadyRegistered,
}

#[cfg(test)]
mod test {
    use super::*;

    fn published_event() -> Event {
        Event {
            id: Default::default(),
            title: "Sommerfest".into(),
            description: "Grilling ved sjøen".into(),
            start_ts: 1000,
            end_ts: 2000,
            location: EventLocation::Offline {
                address: "Bryggen 1".into(),
            },
            registration: Default::default(),
            participants: Vec::new(),
            participant_count: 0,
            attendance_count: 0,
            status: EventStatus::Published,
            reminder_sent: false,
            followup_sent: false,
            created_by: Default::default(),
            created: 0,
            updated: 0,
        }
    }

    #[test]
    fn timespan_must_end_after_start() {
        assert!(Event::has_valid_timespan(0, 1));
        assert!(!Event::has_valid_timespan(1, 1));
        assert!(!Event::has_valid_timespan(2, 1));
    }

    #[test]
    fn register_updates_derived_counts() {
        let mut event = published_event();
        let user_id = ID::new();
        assert!(event.register(user_id.clone(), 50).is_ok());
        assert_eq!(event.participant_count, 1);
        assert_eq!(event.attendance_count, 0);

        assert!(event.record_attendance(&user_id, true));
        assert_eq!(event.attendance_count, 1);

        assert!(event.unregister(&user_id));
        assert_eq!(event.participant_count, 0);
        assert_eq!(event.attendance_count, 0);
    }

    #[test]
    fn register_rejects_full_event() {
        let mut event = published_event();
        event.registration.max_participants = Some(1);
        assert!(event.register(ID::new(), 50).is_ok());
        assert_eq!(event.register(ID::new(), 50), Err(RegistrationError::Full));
        assert_eq!(event.participant_count, 1);
    }

    #[test]
    fn register_rejects_passed_deadline() {
        let mut event = published_event();
        event.registration.deadline_ts = Some(100);
        assert_eq!(
            event.register(ID::new(), 101),
            Err(RegistrationError::DeadlinePassed)
        );
    }

    #[test]
    fn register_rejects_duplicates_and_drafts() {
        let mut event = published_event();
        let user_id = ID::new();
        assert!(event.register(user_id.clone(), 50).is_ok());
        assert_eq!(
            event.register(user_id, 51),
            Err(RegistrationError::AlreadyRegistered)
        );

        let mut draft = published_event();
        draft.status = EventStatus::Draft;
        assert_eq!(draft.register(ID::new(), 50), Err(RegistrationError::NotOpen));
    }

    #[test]
    fn status_transitions_are_forward_only() {
        use EventStatus::*;
        assert!(Draft.can_transition(&Published));
        assert!(Draft.can_transition(&Cancelled));
        assert!(Published.can_transition(&Cancelled));
        assert!(Published.can_transition(&Completed));

        assert!(!Published.can_transition(&Draft));
        assert!(!Cancelled.can_transition(&Published));
        assert!(!Cancelled.can_transition(&Cancelled));
        assert!(!Completed.can_transition(&Published));
    }
}
