use crate::error::KlubbError;
use crate::notification::{CreateNotificationUseCase, NotificationSpec};
use crate::shared::auth::protect_admin_route;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::create_user::{APIResponse, RequestBody};
use klubb_domain::{NotificationKind, Priority, User, UserRole};
use klubb_infra::KlubbContext;
use klubb_utils::create_random_secret;
use tracing::error;

const VERIFICATION_TOKEN_LEN: usize = 32;

pub async fn create_user_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let _admin = protect_admin_route(&http_req, &ctx).await?;
    let body = body.0;

    let usecase = CreateUserUseCase {
        email: body.email,
        full_name: body.full_name,
        password: body.password,
        role: body.role.unwrap_or(UserRole::User),
    };

    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Created().json(APIResponse::new(user)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct CreateUserUseCase {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EmailTaken(String),
    InvalidEmail,
    WeakPassword,
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmailTaken(email) => Self::Conflict(format!(
                "A user with the email: {}, already exists",
                email
            )),
            UseCaseError::InvalidEmail => {
                Self::BadClientData("The provided email is not valid".into())
            }
            UseCaseError::WeakPassword => Self::BadClientData(
                "The password has to be at least 8 characters long".into(),
            ),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateUserUseCase {
    type Response = User;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateUser";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        if !self.email.contains('@') || self.email.trim().len() < 3 {
            return Err(UseCaseError::InvalidEmail);
        }
        if self.password.len() < 8 {
            return Err(UseCaseError::WeakPassword);
        }
        if ctx.repos.users.find_by_email(&self.email).await.is_some() {
            return Err(UseCaseError::EmailTaken(self.email.clone()));
        }

        let hash = bcrypt::hash(&self.password, bcrypt::DEFAULT_COST)
            .map_err(|_| UseCaseError::StorageError)?;

        let mut user = User::new(
            self.email.clone(),
            self.full_name.clone(),
            hash,
            ctx.sys.get_timestamp_millis(),
        );
        user.role = self.role.clone();
        user.pending_token = Some(create_random_secret(VERIFICATION_TOKEN_LEN));

        ctx.repos
            .users
            .insert(&user)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(user)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SendWelcome)]
    }
}

/// Welcomes the new member and hands them their verification token.
pub struct SendWelcome;

#[async_trait::async_trait(?Send)]
impl Subscriber<CreateUserUseCase> for SendWelcome {
    async fn notify(&self, user: &User, ctx: &KlubbContext) {
        let token = match &user.pending_token {
            Some(token) => token.clone(),
            None => return,
        };
        let mut spec = NotificationSpec::new(
            user.id.clone(),
            NotificationKind::Welcome,
            "Welcome!".into(),
            format!(
                "Welcome to the club, {}! Verify your account with the token: {}",
                user.full_name, token
            ),
        );
        spec.priority = Priority::High;
        if let Err(e) = execute(CreateNotificationUseCase { spec }, ctx).await {
            error!("Could not send welcome notification to {}: {:?}", user.id, e);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use klubb_infra::InMemoryMailTransport;
    use std::sync::Arc;

    fn usecase(email: &str) -> CreateUserUseCase {
        CreateUserUseCase {
            email: email.into(),
            full_name: "Kari Nordmann".into(),
            password: "longenough".into(),
            role: UserRole::User,
        }
    }

    #[actix_web::main]
    #[test]
    async fn creates_user_with_verification_token_and_welcome_mail() {
        let mut ctx = KlubbContext::create_inmemory();
        let mailer = Arc::new(InMemoryMailTransport::new());
        ctx.mailer = mailer.clone();

        let user = execute(usecase("kari@klubb.no"), &ctx)
            .await
            .expect("To create user");
        assert!(!user.verified);
        let token = user.pending_token.clone().expect("To get a token");

        assert_eq!(mailer.sent_mail().len(), 1);
        assert!(mailer.sent_mail()[0].text.contains(&token));
    }

    #[actix_web::main]
    #[test]
    async fn rejects_duplicate_email() {
        let ctx = KlubbContext::create_inmemory();
        execute(usecase("kari@klubb.no"), &ctx)
            .await
            .expect("To create user");
        let res = execute(usecase("kari@klubb.no"), &ctx).await;
        assert_eq!(
            res.unwrap_err(),
            UseCaseError::EmailTaken("kari@klubb.no".into())
        );
    }

    #[actix_web::main]
    #[test]
    async fn rejects_short_password() {
        let ctx = KlubbContext::create_inmemory();
        let mut short = usecase("ola@klubb.no");
        short.password = "short".into();
        assert_eq!(
            execute(short, &ctx).await.unwrap_err(),
            UseCaseError::WeakPassword
        );
    }
}
