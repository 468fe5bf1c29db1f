mod event;
mod meeting;
mod notification;
mod shared;
mod todo;
mod user;

use event::{InMemoryEventRepo, MongoEventRepo};
use meeting::{InMemoryMeetingRepo, MongoMeetingRepo};
use mongodb::{options::ClientOptions, Client};
use notification::{InMemoryNotificationRepo, MongoNotificationRepo};
use std::sync::Arc;
use todo::{InMemoryTodoRepo, MongoTodoRepo};
use tracing::info;
use user::{InMemoryUserRepo, MongoUserRepo};

pub use event::{EventQuery, IEventRepo};
pub use meeting::IMeetingRepo;
pub use notification::{INotificationRepo, NotificationListQuery};
pub use shared::repo::DeleteResult;
pub use todo::ITodoRepo;
pub use user::IUserRepo;

#[derive(Clone)]
pub struct Repos {
    pub users: Arc<dyn IUserRepo>,
    pub events: Arc<dyn IEventRepo>,
    pub notifications: Arc<dyn INotificationRepo>,
    pub todos: Arc<dyn ITodoRepo>,
    pub meetings: Arc<dyn IMeetingRepo>,
}

impl Repos {
    pub async fn create_mongodb(
        connection_string: &str,
        db_name: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let client_options = ClientOptions::parse(connection_string).await?;
        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // This is needed to make sure that db is ready when opening server
        info!("DB CHECKING CONNECTION ...");
        db.collection("server-start")
            .insert_one(
                mongodb::bson::doc! {
                "server-start": 1
                },
                None,
            )
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");
        Ok(Self {
            users: Arc::new(MongoUserRepo::new(&db)),
            events: Arc::new(MongoEventRepo::new(&db)),
            notifications: Arc::new(MongoNotificationRepo::new(&db)),
            todos: Arc::new(MongoTodoRepo::new(&db)),
            meetings: Arc::new(MongoMeetingRepo::new(&db)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepo::new()),
            events: Arc::new(InMemoryEventRepo::new()),
            notifications: Arc::new(InMemoryNotificationRepo::new()),
            todos: Arc::new(InMemoryTodoRepo::new()),
            meetings: Arc::new(InMemoryMeetingRepo::new()),
        }
    }
}
