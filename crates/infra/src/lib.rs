mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, SmtpConfig};
use repos::Repos;
pub use repos::{
    DeleteResult, EventQuery, IEventRepo, IMeetingRepo, INotificationRepo, ITodoRepo, IUserRepo,
    NotificationListQuery,
};
pub use services::*;
use std::sync::Arc;
pub use system::{FixedTimeSys, ISys, RealSys};

#[derive(Clone)]
pub struct KlubbContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub mailer: Arc<dyn IMailTransport>,
}

struct ContextParams {
    pub mongodb_connection_string: String,
    pub mongodb_db_name: String,
}

impl KlubbContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_mongodb(
            &params.mongodb_connection_string,
            &params.mongodb_db_name,
        )
        .await
        .expect("Mongodb credentials must be set and valid");
        let config = Config::new();
        let mailer = create_mail_transport(&config);
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            mailer,
        }
    }

    /// In-memory context for tests: no database, recording mailer.
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            mailer: Arc::new(InMemoryMailTransport::new()),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> KlubbContext {
    const MONGODB_CONNECTION_STRING: &str = "MONGODB_CONNECTION_STRING";
    const MONGODB_NAME: &str = "MONGODB_NAME";

    KlubbContext::create(ContextParams {
        mongodb_connection_string: std::env::var(MONGODB_CONNECTION_STRING)
            .unwrap_or_else(|_| panic!("{} env var to be present.", MONGODB_CONNECTION_STRING)),
        mongodb_db_name: std::env::var(MONGODB_NAME).unwrap_or_else(|_| "klubb".into()),
    })
    .await
}
