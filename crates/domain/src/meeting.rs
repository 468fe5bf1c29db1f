use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// An internal meeting with a fixed attendee list, as opposed to an
/// `Event` which members register for themselves.
#[derive(Debug, Clone)]
pub struct Meeting {
    pub id: ID,
    pub organizer_id: ID,
    pub title: String,
    pub agenda: String,
    pub start_ts: i64,
    pub end_ts: i64,
    pub location: String,
    pub attendees: Vec<MeetingAttendee>,
    pub attendance_count: usize,
    pub status: MeetingStatus,
    pub created: i64,
    pub updated: i64,
}

impl Meeting {
    pub fn has_valid_timespan(start_ts: i64, end_ts: i64) -> bool {
        end_ts > start_ts
    }

    pub fn record_attendance(&mut self, user_id: &ID, attended: bool) -> bool {
        let found = match self.attendees.iter_mut().find(|a| a.user_id == *user_id) {
            Some(a) => {
                a.attended = attended;
                true
            }
            None => false,
        };
        self.attendance_count = self.attendees.iter().filter(|a| a.attended).count();
        found
    }
}

impl Entity for Meeting {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingAttendee {
    pub user_id: ID,
    pub attended: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Scheduled,
    Cancelled,
    Completed,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn attendance_count_is_derived() {
        let user_id = ID::new();
        let mut meeting = Meeting {
            id: Default::default(),
            organizer_id: Default::default(),
            title: "Styremøte".into(),
            agenda: String::new(),
            start_ts: 0,
            end_ts: 100,
            location: "Klubbhuset".into(),
            attendees: vec![
                MeetingAttendee {
                    user_id: user_id.clone(),
                    attended: false,
                },
                MeetingAttendee {
                    user_id: ID::new(),
                    attended: false,
                },
            ],
            attendance_count: 0,
            status: MeetingStatus::Scheduled,
            created: 0,
            updated: 0,
        };

        assert!(meeting.record_attendance(&user_id, true));
        assert_eq!(meeting.attendance_count, 1);
        assert!(!meeting.record_attendance(&ID::new(), true));
        assert_eq!(meeting.attendance_count, 1);
    }
}
