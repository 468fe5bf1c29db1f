use super::IMeetingRepo;
use crate::repos::shared::inmemory_repo::*;
use klubb_domain::{Meeting, MeetingStatus, ID};

pub struct InMemoryMeetingRepo {
    meetings: std::sync::Mutex<Vec<Meeting>>,
}

impl InMemoryMeetingRepo {
    pub fn new() -> Self {
        Self {
            meetings: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IMeetingRepo for InMemoryMeetingRepo {
    async fn insert(&self, meeting: &Meeting) -> anyhow::Result<()> {
        insert(meeting, &self.meetings);
        Ok(())
    }

    async fn save(&self, meeting: &Meeting) -> anyhow::Result<()> {
        save(meeting, &self.meetings);
        Ok(())
    }

    async fn find(&self, meeting_id: &ID) -> Option<Meeting> {
        find(meeting_id, &self.meetings)
    }

    async fn find_all(&self, status: Option<MeetingStatus>) -> anyhow::Result<Vec<Meeting>> {
        Ok(find_by(&self.meetings, |m| {
            status.map_or(true, |s| m.status == s)
        }))
    }

    async fn delete(&self, meeting_id: &ID) -> Option<Meeting> {
        delete(meeting_id, &self.meetings)
    }
}
