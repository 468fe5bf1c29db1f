use crate::error::KlubbError;
use crate::shared::auth::issue_token;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::login::{APIResponse, RequestBody};
use klubb_domain::User;
use klubb_infra::KlubbContext;

pub async fn login_controller(
    _http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let body = body.0;

    let usecase = LoginUseCase {
        email: body.email,
        password: body.password,
    };

    let user = execute(usecase, &ctx).await.map_err(KlubbError::from)?;
    let token = issue_token(&user, &ctx)?;
    Ok(HttpResponse::Ok().json(APIResponse::new(token, user)))
}

#[derive(Debug)]
pub struct LoginUseCase {
    pub email: String,
    pub password: String,
}

/// Wrong email and wrong password map to the same message so the
/// endpoint cannot be used to probe which addresses have accounts.
#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidCredentials,
    AccountDeactivated,
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidCredentials => {
                Self::Unauthorized("Invalid email or password".into())
            }
            UseCaseError::AccountDeactivated => {
                Self::Unauthorized("Account is deactivated".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for LoginUseCase {
    type Response = User;

    type Error = UseCaseError;

    const NAME: &'static str = "Login";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        let mut user = ctx
            .repos
            .users
            .find_by_email(&self.email)
            .await
            .ok_or(UseCaseError::InvalidCredentials)?;

        let valid = bcrypt::verify(&self.password, &user.password_hash)
            .map_err(|_| UseCaseError::StorageError)?;
        if !valid {
            return Err(UseCaseError::InvalidCredentials);
        }
        if !user.active {
            return Err(UseCaseError::AccountDeactivated);
        }

        user.login_count += 1;
        user.last_login_at = Some(ctx.sys.get_timestamp_millis());
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

    async fn seed_user(ctx: &KlubbContext, password: &str) -> User {
        let hash = bcrypt::hash(password, 4).unwrap();
        let mut user = User::new("kari@klubb.no".into(), "Kari".into(), hash, 0);
        user.verified = true;
        ctx.repos.users.insert(&user).await.unwrap();
        user
    }

    #[actix_web::main]
    #[test]
    async fn login_bumps_counters() {
        let ctx = KlubbContext::create_inmemory();
        seed_user(&ctx, "hunter2").await;

        let user = execute(
            LoginUseCase {
                email: "kari@klubb.no".into(),
                password: "hunter2".into(),
            },
            &ctx,
        )
        .await
        .expect("To log in");
        assert_eq!(user.login_count, 1);
        assert!(user.last_login_at.is_some());
    }

    #[actix_web::main]
    #[test]
    async fn wrong_email_and_wrong_password_are_indistinguishable() {
        let ctx = KlubbContext::create_inmemory();
        seed_user(&ctx, "hunter2").await;

        let wrong_password = execute(
            LoginUseCase {
                email: "kari@klubb.no".into(),
                password: "nope".into(),
            },
            &ctx,
        )
        .await
        .unwrap_err();
        let wrong_email = execute(
            LoginUseCase {
                email: "unknown@klubb.no".into(),
                password: "hunter2".into(),
            },
            &ctx,
        )
        .await
        .unwrap_err();
        assert_eq!(wrong_password, wrong_email);
        assert_eq!(
            KlubbError::from(wrong_password).to_string(),
            KlubbError::from(wrong_email).to_string()
        );
    }
}
