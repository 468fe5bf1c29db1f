use super::IMeetingRepo;
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use klubb_domain::{Meeting, MeetingAttendee, MeetingStatus, ID};
use mongodb::{
    bson::{doc, oid::ObjectId, to_bson, Document},
    Collection, Database,
};
use serde::{Deserialize, Serialize};

pub struct MongoMeetingRepo {
    collection: Collection,
}

impl MongoMeetingRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("meetings"),
        }
    }
}

#[async_trait::async_trait]
impl IMeetingRepo for MongoMeetingRepo {
    async fn insert(&self, meeting: &Meeting) -> anyhow::Result<()> {
        mongo_repo::insert::<_, MeetingMongo>(&self.collection, meeting).await
    }

    async fn save(&self, meeting: &Meeting) -> anyhow::Result<()> {
        mongo_repo::save::<_, MeetingMongo>(&self.collection, meeting).await
    }

    async fn find(&self, meeting_id: &ID) -> Option<Meeting> {
        mongo_repo::find::<_, MeetingMongo>(&self.collection, meeting_id.inner_ref()).await
    }

    async fn find_all(&self, status: Option<MeetingStatus>) -> anyhow::Result<Vec<Meeting>> {
        let mut filter = doc! {};
        if let Some(status) = status {
            filter.insert("status", to_bson(&status)?);
        }
        mongo_repo::find_many_by::<_, MeetingMongo>(&self.collection, filter).await
    }

    async fn delete(&self, meeting_id: &ID) -> Option<Meeting> {
        mongo_repo::delete::<_, MeetingMongo>(&self.collection, meeting_id.inner_ref()).await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct MeetingMongo {
    pub _id: ObjectId,
    pub organizer_id: ObjectId,
    pub title: String,
    pub agenda: String,
    pub start_ts: i64,
    pub end_ts: i64,
    pub location: String,
    pub attendees: Vec<MeetingAttendee>,
    pub status: MeetingStatus,
    pub created: i64,
    pub updated: i64,
}

impl MongoDocument<Meeting> for MeetingMongo {
    fn into_domain(self) -> Meeting {
        let mut meeting = Meeting {
            id: ID::from(self._id),
            organizer_id: ID::from(self.organizer_id),
            title: self.title,
            agenda: self.agenda,
            start_ts: self.start_ts,
            end_ts: self.end_ts,
            location: self.location,
            attendees: self.attendees,
            attendance_count: 0,
            status: self.status,
            created: self.created,
            updated: self.updated,
        };
        meeting.attendance_count = meeting.attendees.iter().filter(|a| a.attended).count();
        meeting
    }

    fn from_domain(meeting: &Meeting) -> Self {
        Self {
            _id: meeting.id.clone().inner(),
            organizer_id: meeting.organizer_id.clone().inner(),
            title: meeting.title.clone(),
            agenda: meeting.agenda.clone(),
            start_ts: meeting.start_ts,
            end_ts: meeting.end_ts,
            location: meeting.location.clone(),
            attendees: meeting.attendees.clone(),
            status: meeting.status,
            created: meeting.created,
            updated: meeting.updated,
        }
    }

    fn get_id_filter(&self) -> Document {
        doc! {
            "_id": self._id.clone()
        }
    }
}
