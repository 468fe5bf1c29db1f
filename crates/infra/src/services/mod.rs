mod mail;

pub use mail::{
    create_mail_transport, IMailTransport, InMemoryMailTransport, LoggingMailTransport, Mail,
    SmtpMailTransport,
};
