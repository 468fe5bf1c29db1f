use crate::error::KlubbError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use klubb_api_structs::forgot_password::{APIResponse, RequestBody};
use klubb_infra::{KlubbContext, Mail};
use klubb_utils::create_random_secret;
use tracing::error;

const RESET_TOKEN_LEN: usize = 32;

/// The response never reveals whether the address has an account.
const NEUTRAL_MESSAGE: &str =
    "If an account exists for that email, a password reset link has been sent.";

pub async fn forgot_password_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let usecase = ForgotPasswordUseCase {
        email: body.0.email,
    };

    execute(usecase, &ctx)
        .await
        .map(|message| HttpResponse::Ok().json(APIResponse { message }))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct ForgotPasswordUseCase {
    pub email: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ForgotPasswordUseCase {
    type Response = String;

    type Error = UseCaseError;

    const NAME: &'static str = "ForgotPassword";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        let mut user = match ctx.repos.users.find_by_email(&self.email).await {
            Some(user) => user,
            None => return Ok(NEUTRAL_MESSAGE.to_string()),
        };

        let token = create_random_secret(RESET_TOKEN_LEN);
        user.pending_token = Some(token.clone());
        user.updated = ctx.sys.get_timestamp_millis();
        ctx.repos
            .users
            .save(&user)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let mail = Mail {
            to: user.email.clone(),
            subject: "Password reset".into(),
            html: format!(
                "<html><body><p>Hi {},</p><p>Use this token to reset your password: <b>{}</b></p></body></html>",
                user.full_name, token
            ),
            text: format!(
                "Hi {},\n\nUse this token to reset your password: {}\n",
                user.full_name, token
            ),
        };
        if let Err(e) = ctx.mailer.send(mail).await {
            error!("Could not send password reset mail to {}: {:?}", user.id, e);
        }

        Ok(NEUTRAL_MESSAGE.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use klubb_domain::User;
    use klubb_infra::InMemoryMailTransport;
    use std::sync::Arc;

    #[actix_web::main]
    #[test]
    async fn response_does_not_reveal_account_existence() {
        let mut ctx = KlubbContext::create_inmemory();
        let mailer = Arc::new(InMemoryMailTransport::new());
        ctx.mailer = mailer.clone();

        let user = User::new("kari@klubb.no".into(), "Kari".into(), "h".into(), 0);
        ctx.repos.users.insert(&user).await.unwrap();

        let known = execute(
            ForgotPasswordUseCase {
                email: "kari@klubb.no".into(),
            },
            &ctx,
        )
        .await
        .expect("To run forgot password");
        let unknown = execute(
            ForgotPasswordUseCase {
                email: "unknown@klubb.no".into(),
            },
            &ctx,
        )
        .await
        .expect("To run forgot password");
        assert_eq!(known, unknown);

        // Only the real account got a mail and a stored token
        assert_eq!(mailer.sent_mail().len(), 1);
        let stored = ctx.repos.users.find(&user.id).await.unwrap();
        let token = stored.pending_token.expect("To have a reset token");
        assert!(mailer.sent_mail()[0].text.contains(&token));
    }
}
