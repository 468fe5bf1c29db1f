use crate::dtos::MeetingDTO;
use klubb_domain::{Meeting, MeetingStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingResponse {
    pub meeting: MeetingDTO,
}

impl MeetingResponse {
    pub fn new(meeting: Meeting) -> Self {
        Self {
            meeting: MeetingDTO::new(meeting),
        }
    }
}

pub mod create_meeting {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: String,
        pub agenda: Option<String>,
        pub start_ts: i64,
        pub end_ts: i64,
        pub location: Option<String>,
        pub attendee_ids: Option<Vec<ID>>,
    }

    pub type APIResponse = MeetingResponse;
}

pub mod list_meetings {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub status: Option<MeetingStatus>,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub meetings: Vec<MeetingDTO>,
    }

    impl APIResponse {
        pub fn new(meetings: Vec<Meeting>) -> Self {
            Self {
                meetings: meetings.into_iter().map(MeetingDTO::new).collect(),
            }
        }
    }
}

pub mod update_meeting {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub meeting_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: Option<String>,
        pub agenda: Option<String>,
        pub start_ts: Option<i64>,
        pub end_ts: Option<i64>,
        pub location: Option<String>,
        pub attendee_ids: Option<Vec<ID>>,
    }

    pub type APIResponse = MeetingResponse;
}

pub mod cancel_meeting {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub meeting_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub reason: String,
    }

    pub type APIResponse = MeetingResponse;
}

pub mod delete_meeting {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub meeting_id: ID,
    }

    pub type APIResponse = MeetingResponse;
}

pub mod record_meeting_attendance {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub meeting_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub user_id: ID,
        pub attended: bool,
    }

    pub type APIResponse = MeetingResponse;
}
