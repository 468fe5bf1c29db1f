use super::{EventQuery, IEventRepo};
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use klubb_domain::{
    Event, EventLocation, EventStatus, Participant, RegistrationPolicy, ID,
};
use mongodb::{
    bson::{doc, oid::ObjectId, to_bson, Document},
    Collection, Database,
};
use serde::{Deserialize, Serialize};

pub struct MongoEventRepo {
    collection: Collection,
}

impl MongoEventRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("events"),
        }
    }
}

#[async_trait::async_trait]
impl IEventRepo for MongoEventRepo {
    async fn insert(&self, event: &Event) -> anyhow::Result<()> {
        mongo_repo::insert::<_, EventMongo>(&self.collection, event).await
    }

    async fn save(&self, event: &Event) -> anyhow::Result<()> {
        mongo_repo::save::<_, EventMongo>(&self.collection, event).await
    }

    async fn find(&self, event_id: &ID) -> Option<Event> {
        mongo_repo::find::<_, EventMongo>(&self.collection, event_id.inner_ref()).await
    }

    async fn find_by_query(&self, query: EventQuery) -> anyhow::Result<Vec<Event>> {
        let mut filter = doc! {};
        if let Some(status) = &query.status {
            filter.insert("status", to_bson(status)?);
        }
        let mut start_ts = doc! {};
        if let Some(from) = query.from_ts {
            start_ts.insert("$gte", from);
        }
        if let Some(until) = query.until_ts {
            start_ts.insert("$lt", until);
        }
        if !start_ts.is_empty() {
            filter.insert("start_ts", start_ts);
        }
        mongo_repo::find_many_by::<_, EventMongo>(&self.collection, filter).await
    }

    async fn find_in_reminder_window(
        &self,
        window_start: i64,
        window_end: i64,
    ) -> anyhow::Result<Vec<Event>> {
        let filter = doc! {
            "status": to_bson(&EventStatus::Published)?,
            "reminder_sent": false,
            "start_ts": {
                "$gte": window_start,
                "$lt": window_end
            }
        };
        mongo_repo::find_many_by::<_, EventMongo>(&self.collection, filter).await
    }

    async fn mark_reminder_sent(&self, event_id: &ID) -> anyhow::Result<bool> {
        let filter = doc! {
            "_id": event_id.inner_ref(),
            "reminder_sent": false
        };
        let update = doc! {
            "$set": {
                "reminder_sent": true
            }
        };
        let claimed =
            mongo_repo::find_one_and_update::<_, EventMongo>(&self.collection, filter, update)
                .await?;
        Ok(claimed.is_some())
    }

    async fn delete(&self, event_id: &ID) -> Option<Event> {
        mongo_repo::delete::<_, EventMongo>(&self.collection, event_id.inner_ref()).await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct EventMongo {
    pub _id: ObjectId,
    pub title: String,
    pub description: String,
    pub start_ts: i64,
    pub end_ts: i64,
    pub location: EventLocation,
    pub registration: RegistrationPolicy,
    pub participants: Vec<Participant>,
    pub status: EventStatus,
    pub reminder_sent: bool,
    pub followup_sent: bool,
    pub created_by: ObjectId,
    pub created: i64,
    pub updated: i64,
}

impl MongoDocument<Event> for EventMongo {
    fn into_domain(self) -> Event {
        let mut event = Event {
            id: ID::from(self._id),
            title: self.title,
            description: self.description,
            start_ts: self.start_ts,
            end_ts: self.end_ts,
            location: self.location,
            registration: self.registration,
            participants: self.participants,
            participant_count: 0,
            attendance_count: 0,
            status: self.status,
            reminder_sent: self.reminder_sent,
            followup_sent: self.followup_sent,
            created_by: ID::from(self.created_by),
            created: self.created,
            updated: self.updated,
        };
        // Derived counters are not persisted
        event.participant_count = event.participants.len();
        event.attendance_count = event.participants.iter().filter(|p| p.attended).count();
        event
    }

    fn from_domain(event: &Event) -> Self {
        Self {
            _id: event.id.clone().inner(),
            title: event.title.clone(),
            description: event.description.clone(),
            start_ts: event.start_ts,
            end_ts: event.end_ts,
            location: event.location.clone(),
            registration: event.registration.clone(),
            participants: event.participants.clone(),
            status: event.status.clone(),
            reminder_sent: event.reminder_sent,
            followup_sent: event.followup_sent,
            created_by: event.created_by.clone().inner(),
            created: event.created,
            updated: event.updated,
        }
    }

    fn get_id_filter(&self) -> Document {
        doc! {
            "_id": self._id.clone()
        }
    }
}
