use crate::notification::{CreateBulkNotificationsUseCase, NotificationSpec};
use crate::shared::usecase::execute;
use klubb_domain::{Event, NotificationKind, RelatedEntity, RelatedEntityKind, ID};
use klubb_infra::KlubbContext;
use tracing::error;

/// Shared fan-out path for the event lifecycle subscribers. Best
/// effort by design, a failed fan-out never rolls back the event
/// write it follows.
pub(crate) async fn notify_users(
    recipient_ids: Vec<ID>,
    event: &Event,
    kind: NotificationKind,
    title: String,
    message: String,
    ctx: &KlubbContext,
) {
    if recipient_ids.is_empty() {
        return;
    }

    let mut template = NotificationSpec::new(Default::default(), kind, title, message);
    template.related = Some(RelatedEntity {
        kind: RelatedEntityKind::Event,
        id: event.id.clone(),
    });

    if let Err(e) = execute(
        CreateBulkNotificationsUseCase {
            recipient_ids,
            template,
        },
        ctx,
    )
    .await
    {
        error!("Fan-out for event {} failed: {:?}", event.id, e);
    }
}

pub(crate) fn participant_ids(event: &Event) -> Vec<ID> {
    event
        .participants
        .iter()
        .map(|p| p.user_id.clone())
        .collect()
}

pub(crate) async fn notifiable_user_ids(ctx: &KlubbContext) -> Vec<ID> {
    match ctx.repos.users.find_notifiable().await {
        Ok(users) => users.into_iter().map(|u| u.id).collect(),
        Err(e) => {
            error!("Could not resolve fan-out audience: {:?}", e);
            Vec::new()
        }
    }
}
