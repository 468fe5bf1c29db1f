use klubb_domain::{Meeting, MeetingAttendee, MeetingStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MeetingDTO {
    pub id: String,
    pub organizer_id: String,
    pub title: String,
    pub agenda: String,
    pub start_ts: i64,
    pub end_ts: i64,
    pub location: String,
    pub attendees: Vec<MeetingAttendeeDTO>,
    pub attendance_count: usize,
    pub status: MeetingStatus,
    pub created: i64,
    pub updated: i64,
}

impl MeetingDTO {
    pub fn new(meeting: Meeting) -> Self {
        Self {
            id: meeting.id.as_string(),
            organizer_id: meeting.organizer_id.as_string(),
            title: meeting.title,
            agenda: meeting.agenda,
            start_ts: meeting.start_ts,
            end_ts: meeting.end_ts,
            location: meeting.location,
            attendees: meeting
                .attendees
                .into_iter()
                .map(MeetingAttendeeDTO::new)
                .collect(),
            attendance_count: meeting.attendance_count,
            status: meeting.status,
            created: meeting.created,
            updated: meeting.updated,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MeetingAttendeeDTO {
    pub user_id: String,
    pub attended: bool,
}

impl MeetingAttendeeDTO {
    pub fn new(attendee: MeetingAttendee) -> Self {
        Self {
            user_id: attendee.user_id.as_string(),
            attended: attendee.attended,
        }
    }
}
