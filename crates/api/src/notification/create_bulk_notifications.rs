use super::create_notification::{CreateNotificationUseCase, NotificationSpec, UseCaseError};
use crate::error::KlubbError;
use crate::shared::auth::protect_admin_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use klubb_api_structs::broadcast_notification::{APIResponse, BulkResultDTO, RequestBody};
use klubb_domain::{Notification, NotificationKind, ID};
use klubb_infra::KlubbContext;

pub async fn broadcast_notification_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<KlubbContext>,
) -> Result<HttpResponse, KlubbError> {
    let admin = protect_admin_route(&http_req, &ctx).await?;
    let body = body.0;

    let recipient_ids = match body.recipient_ids {
        Some(ids) => ids,
        None => ctx
            .repos
            .users
            .find_notifiable()
            .await
            .map_err(|_| KlubbError::InternalError)?
            .into_iter()
            .map(|u| u.id)
            .collect(),
    };

    let usecase = CreateBulkNotificationsUseCase {
        recipient_ids,
        template: NotificationSpec {
            recipient_id: Default::default(),
            sender_id: Some(admin.id),
            kind: body.kind.unwrap_or(NotificationKind::Announcement),
            title: body.title,
            message: body.message,
            priority: body.priority.unwrap_or_default(),
            related: body.related,
            send_at: body.send_at,
            expires_at: body.expires_at,
        },
    };

    execute(usecase, &ctx)
        .await
        .map(|results| {
            HttpResponse::Ok().json(APIResponse {
                results: results
                    .into_iter()
                    .map(|r| BulkResultDTO {
                        recipient_id: r.recipient_id.as_string(),
                        success: r.result.is_ok(),
                        error: r.result.err(),
                    })
                    .collect(),
            })
        })
        .map_err(KlubbError::from)
}

/// Outcome for one recipient of a bulk send. Failures carry a message
/// instead of aborting the rest of the batch.
#[derive(Debug)]
pub struct BulkDeliveryResult {
    pub recipient_id: ID,
    pub result: Result<Notification, String>,
}

/// Sends one notification per recipient, sequentially and best-effort.
/// A failed recipient never blocks the remaining ones.
#[derive(Debug)]
pub struct CreateBulkNotificationsUseCase {
    pub recipient_ids: Vec<ID>,
    pub template: NotificationSpec,
}

#[derive(Debug)]
pub enum BulkUseCaseError {
    EmptyRecipientList,
}

impl From<BulkUseCaseError> for KlubbError {
    fn from(e: BulkUseCaseError) -> Self {
        match e {
            BulkUseCaseError::EmptyRecipientList => {
                Self::BadClientData("No recipients to notify".into())
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateBulkNotificationsUseCase {
    type Response = Vec<BulkDeliveryResult>;

    type Error = BulkUseCaseError;

    const NAME: &'static str = "CreateBulkNotifications";

    async fn execute(&mut self, ctx: &KlubbContext) -> Result<Self::Response, Self::Error> {
        if self.recipient_ids.is_empty() {
            return Err(BulkUseCaseError::EmptyRecipientList);
        }

        let mut results = Vec::with_capacity(self.recipient_ids.len());
        for recipient_id in &self.recipient_ids {
            let mut spec = self.template.clone();
            spec.recipient_id = recipient_id.clone();
            let res = execute(CreateNotificationUseCase { spec }, ctx).await;
            results.push(BulkDeliveryResult {
                recipient_id: recipient_id.clone(),
                result: res.map_err(|e| match e {
                    UseCaseError::InvalidTitleOrMessage => "Invalid title or message".to_string(),
                    UseCaseError::RecipientNotFound(id) => {
                        format!("The user with id: {}, was not found.", id)
                    }
                    UseCaseError::StorageError => "Internal storage error".to_string(),
                }),
            });
        }

        Ok(results)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use klubb_domain::{NotificationKind, User};

    #[actix_web::main]
    #[test]
    async fn partial_failure_still_delivers_the_rest() {
        let ctx = KlubbContext::create_inmemory();

        let mut kari = User::new("kari@klubb.no".into(), "Kari".into(), "h".into(), 0);
        kari.verified = true;
        let mut ola = User::new("ola@klubb.no".into(), "Ola".into(), "h".into(), 0);
        ola.verified = true;
        ctx.repos.users.insert(&kari).await.unwrap();
        ctx.repos.users.insert(&ola).await.unwrap();

        let unknown = ID::new();
        let usecase = CreateBulkNotificationsUseCase {
            recipient_ids: vec![kari.id.clone(), unknown.clone(), ola.id.clone()],
            template: NotificationSpec::new(
                Default::default(),
                NotificationKind::Announcement,
                "Info".into(),
                "Hei alle".into(),
            ),
        };
        let results = execute(usecase, &ctx).await.expect("To run bulk send");

        assert_eq!(results.len(), 3);
        assert!(results[0].result.is_ok());
        assert!(results[1].result.is_err());
        assert_eq!(results[1].recipient_id, unknown);
        assert!(results[2].result.is_ok());

        let delivered = ctx
            .repos
            .notifications
            .find_by_recipient(&ola.id, Default::default(), 0)
            .await
            .unwrap();
        assert_eq!(delivered.len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_empty_recipient_list() {
        let ctx = KlubbContext::create_inmemory();
        let usecase = CreateBulkNotificationsUseCase {
            recipient_ids: vec![],
            template: NotificationSpec::new(
                Default::default(),
                NotificationKind::Announcement,
                "Info".into(),
                "Hei".into(),
            ),
        };
        assert!(execute(usecase, &ctx).await.is_err());
    }
}
