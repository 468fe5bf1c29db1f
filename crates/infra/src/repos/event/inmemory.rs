use super::{EventQuery, IEventRepo};
use crate::repos::shared::inmemory_repo::*;
use klubb_domain::{Event, EventStatus, ID};

pub struct InMemoryEventRepo {
    events: std::sync::Mutex<Vec<Event>>,
}

impl InMemoryEventRepo {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IEventRepo for InMemoryEventRepo {
    async fn insert(&self, event: &Event) -> anyhow::Result<()> {
        insert(event, &self.events);
        Ok(())
    }

    async fn save(&self, event: &Event) -> anyhow::Result<()> {
        save(event, &self.events);
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<Event> {
        find(event_id, &self.events)
    }

    async fn find_by_query(&self, query: EventQuery) -> anyhow::Result<Vec<Event>> {
        Ok(find_by(&self.events, |e| {
            if let Some(status) = &query.status {
                if e.status != *status {
                    return false;
                }
            }
            if let Some(from) = query.from_ts {
                if e.start_ts < from {
                    return false;
                }
            }
            if let Some(until) = query.until_ts {
                if e.start_ts >= until {
                    return false;
                }
            }
            true
        }))
    }

    async fn find_in_reminder_window(
        &self,
        window_start: i64,
        window_end: i64,
    ) -> anyhow::Result<Vec<Event>> {
        Ok(find_by(&self.events, |e| {
            e.status == EventStatus::Published
                && !e.reminder_sent
                && e.start_ts >= window_start
                && e.start_ts < window_end
        }))
    }

    async fn mark_reminder_sent(&self, event_id: &ID) -> anyhow::Result<bool> {
        let claimed = find_one_and_update(
            &self.events,
            |e| e.id == *event_id && !e.reminder_sent,
            |e| e.reminder_sent = true,
        );
        Ok(claimed.is_some())
    }

    async fn delete(&self, event_id: &ID) -> Option<Event> {
        delete(event_id, &self.events)
    }
}
