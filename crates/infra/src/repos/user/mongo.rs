use super::IUserRepo;
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use klubb_domain::{CalendarIntegration, User, UserPreferences, UserRole, ID};
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    Collection, Database,
};
use serde::{Deserialize, Serialize};

pub struct MongoUserRepo {
    collection: Collection,
}

impl MongoUserRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for MongoUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        mongo_repo::insert::<_, UserMongo>(&self.collection, user).await
    }

    async fn save(&self, user: &User) -> anyhow::Result<()> {
        mongo_repo::save::<_, UserMongo>(&self.collection, user).await
    }

    async fn find(&self, user_id: &ID) -> Option<User> {
        mongo_repo::find::<_, UserMongo>(&self.collection, user_id.inner_ref()).await
    }

    async fn find_many(&self, user_ids: &[ID]) -> anyhow::Result<Vec<User>> {
        let filter = doc! {
            "_id": {
                "$in": user_ids.iter().map(|id| id.inner_ref()).collect::<Vec<_>>()
            }
        };
        mongo_repo::find_many_by::<_, UserMongo>(&self.collection, filter).await
    }

    async fn find_by_email(&self, email: &str) -> Option<User> {
        let filter = doc! {
            "email": email
        };
        mongo_repo::find_one_by::<_, UserMongo>(&self.collection, filter).await
    }

    async fn find_all(&self) -> anyhow::Result<Vec<User>> {
        mongo_repo::find_many_by::<_, UserMongo>(&self.collection, doc! {}).await
    }

    async fn find_notifiable(&self) -> anyhow::Result<Vec<User>> {
        let filter = doc! {
            "active": true,
            "verified": true
        };
        mongo_repo::find_many_by::<_, UserMongo>(&self.collection, filter).await
    }

    async fn delete(&self, user_id: &ID) -> Option<User> {
        mongo_repo::delete::<_, UserMongo>(&self.collection, user_id.inner_ref()).await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct UserMongo {
    pub _id: ObjectId,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub verified: bool,
    pub active: bool,
    pub last_login_at: Option<i64>,
    pub login_count: i64,
    pub preferences: UserPreferences,
    pub pending_token: Option<String>,
    pub integrations: Vec<CalendarIntegration>,
    pub created: i64,
    pub updated: i64,
}

impl MongoDocument<User> for UserMongo {
    fn into_domain(self) -> User {
        User {
            id: ID::from(self._id),
            email: self.email,
            full_name: self.full_name,
            password_hash: self.password_hash,
            role: self.role,
            verified: self.verified,
            active: self.active,
            last_login_at: self.last_login_at,
            login_count: self.login_count,
            preferences: self.preferences,
            pending_token: self.pending_token,
            integrations: self.integrations,
            created: self.created,
            updated: self.updated,
        }
    }

    fn from_domain(user: &User) -> Self {
        Self {
            _id: user.id.clone().inner(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role.clone(),
            verified: user.verified,
            active: user.active,
            last_login_at: user.last_login_at,
            login_count: user.login_count,
            preferences: user.preferences.clone(),
            pending_token: user.pending_token.clone(),
            integrations: user.integrations.clone(),
            created: user.created,
            updated: user.updated,
        }
    }

    fn get_id_filter(&self) -> Document {
        doc! {
            "_id": self._id.clone()
        }
    }
}
