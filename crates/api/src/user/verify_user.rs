use crate::error::KlubbError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use klubb_api_structs::verify_user::{APIResponse, RequestBody};
use klubb_domain::User;
use klubb_infra::KlubbContext;

pub async fn verify_user_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let body = body.0;

    let usecase = VerifyUserUseCase {
        email: body.email,
        token: body.token,
    };

    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Ok().json(APIResponse::new(user)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct VerifyUserUseCase {
    pub email: String,
    pub token: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidToken,
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidToken => {
                Self::BadClientData("Invalid verification token".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for VerifyUserUseCase {
    type Response = User;

    type Error = UseCaseError;

    const NAME: &'static str = "VerifyUser";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        let mut user = ctx
            .repos
            .users
            .find_by_email(&self.email)
            .await
            .ok_or(UseCaseError::InvalidToken)?;

        // Token comparison also fails for accounts with no pending
        // token, same error either way
        match &user.pending_token {
            Some(token) if *token == self.token => {}
            _ => return Err(UseCaseError::InvalidToken),
        }

        user.verified = true;
        user.pending_token = None;
        user.updated = ctx.sys.get_timestamp_millis();

        ctx.repos
            .users
            .save(&user)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(user)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::user::create_user::CreateUserUseCase;
    use klubb_domain::UserRole;

    #[actix_web::main]
    #[test]
    async fn token_verifies_once() {
        let ctx = KlubbContext::create_inmemory();
        let user = execute(
            CreateUserUseCase {
                email: "kari@klubb.no".into(),
                full_name: "Kari".into(),
                password: "longenough".into(),
                role: UserRole::User,
            },
            &ctx,
        )
        .await
        .expect("To create user");
        let token = user.pending_token.clone().unwrap();

        let wrong = execute(
            VerifyUserUseCase {
                email: user.email.clone(),
                token: "bogus".into(),
            },
            &ctx,
        )
        .await;
        assert_eq!(wrong.unwrap_err(), UseCaseError::InvalidToken);

        let verified = execute(
            VerifyUserUseCase {
                email: user.email.clone(),
                token: token.clone(),
            },
            &ctx,
        )
        .await
        .expect("To verify user");
        assert!(verified.verified);
        assert!(verified.pending_token.is_none());

        // Consumed, a replay fails
        let replay = execute(
            VerifyUserUseCase {
                email: user.email,
                token,
            },
            &ctx,
        )
        .await;
        assert_eq!(replay.unwrap_err(), UseCaseError::InvalidToken);
    }
}
