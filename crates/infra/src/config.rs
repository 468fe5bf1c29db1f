use klubb_utils::create_random_secret;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Secret used to sign and verify member JWTs
    pub jwt_secret: String,
    /// SMTP transport settings. When absent, outgoing email is logged
    /// and dropped, which is what you want in local development.
    pub smtp: Option<SmtpConfig>,
    /// From-address on all outgoing mail
    pub email_from: String,
    /// Where contact form submissions are sent
    pub contact_email: String,
    /// How often the reminder job wakes up, in millis
    pub reminder_interval_millis: u64,
    /// The reminder job picks up events starting between
    /// `now + lookahead_start` and `now + lookahead_end`
    pub reminder_lookahead_start_millis: i64,
    pub reminder_lookahead_end_millis: i64,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

const MINUTE_MILLIS: i64 = 1000 * 60;

impl Config {
    pub fn new() -> Self {
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                info!("Did not find JWT_SECRET environment variable. Going to create one, tokens will not survive a restart.");
                create_random_secret(32)
            }
        };

        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or_else(|_| default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let smtp = match std::env::var("SMTP_HOST") {
            Ok(host) => Some(SmtpConfig {
                host,
                port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|p| p.parse::<u16>().ok())
                    .unwrap_or(587),
                username: std::env::var("SMTP_USERNAME").ok(),
                password: std::env::var("SMTP_PASSWORD").ok(),
            }),
            Err(_) => {
                info!("Did not find SMTP_HOST environment variable. Outgoing email will be logged and dropped.");
                None
            }
        };

        Self {
            port,
            jwt_secret,
            smtp,
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "noreply@klubb.local".into()),
            contact_email: std::env::var("CONTACT_EMAIL")
                .unwrap_or_else(|_| "styret@klubb.local".into()),
            reminder_interval_millis: 10 * MINUTE_MILLIS as u64,
            reminder_lookahead_start_millis: 50 * MINUTE_MILLIS,
            reminder_lookahead_end_millis: 60 * MINUTE_MILLIS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
