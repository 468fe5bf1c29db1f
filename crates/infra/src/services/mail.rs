use crate::config::{Config, SmtpConfig};
use anyhow::Context;
use lettre::{
    message::{header, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

/// The narrow contract the notification dispatcher depends on. Any
/// SMTP-capable sender will do.
#[derive(Debug, Clone)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[async_trait::async_trait]
pub trait IMailTransport: Send + Sync {
    async fn send(&self, mail: Mail) -> anyhow::Result<()>;
}

pub fn create_mail_transport(config: &Config) -> Arc<dyn IMailTransport> {
    match &config.smtp {
        Some(smtp) => Arc::new(SmtpMailTransport::new(smtp, config.email_from.clone())),
        None => Arc::new(LoggingMailTransport {}),
    }
}

pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailTransport {
    pub fn new(config: &SmtpConfig, from: String) -> Self {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .port(config.port);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(
                username.to_owned(),
                password.to_owned(),
            ));
        }
        Self {
            transport: builder.build(),
            from,
        }
    }
}

#[async_trait::async_trait]
impl IMailTransport for SmtpMailTransport {
    async fn send(&self, mail: Mail) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.parse().context("Invalid from address")?)
            .to(mail.to.parse().context("Invalid to address")?)
            .subject(&mail.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(mail.text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(mail.html),
                    ),
            )
            .context("Failed to build email")?;

        self.transport.send(message).await?;
        Ok(())
    }
}

/// Used when no SMTP transport is configured.
pub struct LoggingMailTransport {}

#[async_trait::async_trait]
impl IMailTransport for LoggingMailTransport {
    async fn send(&self, mail: Mail) -> anyhow::Result<()> {
        info!("Email to {} dropped (no SMTP configured): {}", mail.to, mail.subject);
        Ok(())
    }
}

/// Records outgoing mail so tests can assert on deliveries, and can be
/// told to fail to exercise the error paths.
pub struct InMemoryMailTransport {
    pub sent: Mutex<Vec<Mail>>,
    fail: AtomicBool,
}

impl InMemoryMailTransport {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent_mail(&self) -> Vec<Mail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemoryMailTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IMailTransport for InMemoryMailTransport {
    async fn send(&self, mail: Mail) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("smtp transport unavailable");
        }
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}
