use klubb_domain::{Event, EventLocation, EventStatus, Participant, RegistrationPolicy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventDTO {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_ts: i64,
    pub end_ts: i64,
    pub location: EventLocation,
    pub registration: RegistrationPolicy,
    pub participants: Vec<ParticipantDTO>,
    pub participant_count: usize,
    pub attendance_count: usize,
    pub status: EventStatus,
    pub reminder_sent: bool,
    pub followup_sent: bool,
    pub created_by: String,
    pub created: i64,
    pub updated: i64,
}

impl EventDTO {
    pub fn new(event: Event) -> Self {
        Self {
            id: event.id.as_string(),
            title: event.title,
            description: event.description,
            start_ts: event.start_ts,
            end_ts: event.end_ts,
            location: event.location,
            registration: event.registration,
            participants: event
                .participants
                .into_iter()
                .map(ParticipantDTO::new)
                .collect(),
            participant_count: event.participant_count,
            attendance_count: event.attendance_count,
            status: event.status,
            reminder_sent: event.reminder_sent,
            followup_sent: event.followup_sent,
            created_by: event.created_by.as_string(),
            created: event.created,
            updated: event.updated,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDTO {
    pub user_id: String,
    pub registered_at: i64,
    pub attended: bool,
    pub feedback: Option<String>,
}

impl ParticipantDTO {
    pub fn new(participant: Participant) -> Self {
        Self {
            user_id: participant.user_id.as_string(),
            registered_at: participant.registered_at,
            attended: participant.attended,
            feedback: participant.feedback,
        }
    }
}
