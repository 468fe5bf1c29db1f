use crate::error::KlubbError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use klubb_api_structs::reset_password::{APIResponse, RequestBody};
use klubb_domain::User;
use klubb_infra::KlubbContext;

pub async fn reset_password_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let body = body.0;

    let usecase = ResetPasswordUseCase {
        email: body.email,
        token: body.token,
        password: body.password,
    };

    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Ok().json(APIResponse::new(user)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct ResetPasswordUseCase {
    pub email: String,
    pub token: String,
    pub password: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidToken,
    WeakPassword,
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidToken => Self::BadClientData("Invalid reset token".into()),
            UseCaseError::WeakPassword => Self::BadClientData(
                "The password has to be at least 8 characters long".into(),
            ),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ResetPasswordUseCase {
    type Response = User;

    type Error = UseCaseError;

    const NAME: &'static str = "ResetPassword";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        if self.password.len() < 8 {
            return Err(UseCaseError::WeakPassword);
        }

        let mut user = ctx
            .repos
            .users
            .find_by_email(&self.email)
            .await
            .ok_or(UseCaseError::InvalidToken)?;

        match &user.pending_token {
            Some(token) if *token == self.token => {}
            _ => return Err(UseCaseError::InvalidToken),
        }

        user.password_hash = bcrypt::hash(&self.password, bcrypt::DEFAULT_COST)
            .map_err(|_| UseCaseError::StorageError)?;
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
