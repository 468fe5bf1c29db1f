use crate::error::KlubbError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::update_user::{APIResponse, RequestBody};
use klubb_domain::{User, ID};
use klubb_infra::KlubbContext;

pub async fn update_user_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let user = protect_route(&http_req, &ctx).await?;
    let body = body.0;

    let usecase = UpdateUserUseCase {
        user_id: user.id,
        full_name: body.full_name,
        email_notifications: body.email_notifications,
    };

    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Ok().json(APIResponse::new(user)))
        .map_err(KlubbError::from)
}

#[derive(Debug)]
pub struct UpdateUserUseCase {
    pub user_id: ID,
    pub full_name: Option<String>,
    pub email_notifications: Option<bool>,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for KlubbError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(user_id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", user_id))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateUserUseCase {
    type Response = User;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateUser";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        let mut user = ctx
            .repos
            .users
            .find(&self.user_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.user_id.clone()))?;

        if let Some(full_name) = &self.full_name {
            user.full_name = full_name.clone();
        }
        if let Some(email_notifications) = self.email_notifications {
            user.preferences.email_notifications = email_notifications;
        }
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

    #[actix_web::main]
    #[test]
    async fn toggles_email_preference() {
        let ctx = KlubbContext::create_inmemory();
        let user = User::new("kari@klubb.no".into(), "Kari".into(), "h".into(), 0);
        ctx.repos.users.insert(&user).await.unwrap();

        let updated = execute(
            UpdateUserUseCase {
                user_id: user.id.clone(),
                full_name: None,
                email_notifications: Some(false),
            },
            &ctx,
        )
        .await
        .expect("To update user");
        assert!(!updated.preferences.email_notifications);
        assert_eq!(updated.full_name, "Kari");
    }
}
