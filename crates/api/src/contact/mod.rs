use crate::error::KlubbError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use klubb_api_structs::send_contact_message::{APIResponse, RequestBody};
use klubb_infra::{KlubbContext, Mail};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/contact", web::post().to(send_contact_message_controller));
}

pub async fn send_contact_message_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let body = body.0;

    let usecase = SendContactMessageUseCase {
        name: body.name,
        email: body.email,
        subject: body.subject,
        message: body.message,
    };

    execute(usecase, &ctx)
        .await
        .map(|_| {
            HttpResponse::Ok().json(APIResponse {
                message: "Thanks for reaching out, we will get back to you.".into(),
            })
        })
        .map_err(KlubbError::from)
}

/// Forwards a message from the public contact form to the club inbox.
/// Open to unauthenticated callers.
#[derive(Debug)]
pub struct SendContactMessageUseCase {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    MissingFields,
    InvalidEmail,
    SendFailed,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::MissingFields => {
                Self::BadClientData("All contact form fields are required".into())
            }
            UseCaseError::InvalidEmail => {
                Self::BadClientData("The provided email is not valid".into())
            }
            // No detail leaks about the mail setup
            UseCaseError::SendFailed => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendContactMessageUseCase {
    type Response = ();

    type Error = UseCaseError;

    const NAME: &'static str = "SendContactMessage";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        if [&self.name, &self.email, &self.subject, &self.message]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(UseCaseError::MissingFields);
        }
        if !self.email.contains('@') {
            return Err(UseCaseError::InvalidEmail);
        }

        let mail = Mail {
            to: ctx.config.contact_email.clone(),
            subject: format!("[Contact form] {}", self.subject),
            html: format!(
                "<html><body><p><b>{}</b> &lt;{}&gt; wrote:</p><p>{}</p></body></html>",
                self.name, self.email, self.message
            ),
            text: format!("{} <{}> wrote:\n\n{}\n", self.name, self.email, self.message),
        };

        ctx.mailer
            .send(mail)
            .await
            .map_err(|_| UseCaseError::SendFailed)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use klubb_infra::InMemoryMailTransport;
    use std::sync::Arc;

    fn usecase() -> SendContactMessageUseCase {
        SendContactMessageUseCase {
            name: "Kari Nordmann".into(),
            email: "kari@example.com".into(),
            subject: "Medlemskap".into(),
            message: "Hvordan blir jeg medlem?".into(),
        }
    }

    #[actix_web::main]
    #[test]
    async fn forwards_to_the_club_inbox() {
        let mut ctx = KlubbContext::create_inmemory();
        let mailer = Arc::new(InMemoryMailTransport::new());
        ctx.mailer = mailer.clone();

        execute(usecase(), &ctx).await.expect("To send message");

        let sent = mailer.sent_mail();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, ctx.config.contact_email);
        assert!(sent[0].text.contains("Hvordan blir jeg medlem?"));
    }

    #[actix_web::main]
    #[test]
    async fn rejects_blank_fields_and_bad_email() {
        let ctx = KlubbContext::create_inmemory();

        let mut blank = usecase();
        blank.message = "  ".into();
        assert_eq!(
            execute(blank, &ctx).await.unwrap_err(),
            UseCaseError::MissingFields
        );

        let mut bad_email = usecase();
        bad_email.email = "not-an-email".into();
        assert_eq!(
            execute(bad_email, &ctx).await.unwrap_err(),
            UseCaseError::InvalidEmail
        );
    }

    #[actix_web::main]
    #[test]
    async fn mail_failure_is_an_internal_error() {
        let mut ctx = KlubbContext::create_inmemory();
        let mailer = Arc::new(InMemoryMailTransport::new());
        mailer.set_failing(true);
        ctx.mailer = mailer;

        assert_eq!(
            execute(usecase(), &ctx).await.unwrap_err(),
            UseCaseError::SendFailed
        );
    }
}
