mod cancel_meeting;
mod create_meeting;
mod delete_meeting;
mod list_meetings;
mod record_meeting_attendance;
mod update_meeting;

use crate::notification::{CreateBulkNotificationsUseCase, NotificationSpec};
use crate::shared::usecase::execute;
use actix_web::web;
use cancel_meeting::cancel_meeting_controller;
use create_meeting::create_meeting_controller;
use delete_meeting::delete_meeting_controller;
use klubb_domain::{Meeting, NotificationKind, RelatedEntity, RelatedEntityKind};
use klubb_infra::KlubbContext;
use list_meetings::list_meetings_controller;
use record_meeting_attendance::record_meeting_attendance_controller;
use tracing::error;
use update_meeting::update_meeting_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/meetings", web::get().to(list_meetings_controller));

    // Admin
    cfg.route("/meetings", web::post().to(create_meeting_controller));
    cfg.route(
        "/meetings/{meeting_id}",
        web::put().to(update_meeting_controller),
    );
    cfg.route(
        "/meetings/{meeting_id}",
        web::delete().to(delete_meeting_controller),
    );
    cfg.route(
        "/meetings/{meeting_id}/cancel",
        web::post().to(cancel_meeting_controller),
    );
    cfg.route(
        "/meetings/{meeting_id}/attendance",
        web::post().to(record_meeting_attendance_controller),
    );
}

pub(crate) async fn notify_attendees(
    meeting: &Meeting,
    kind: NotificationKind,
    message: String,
    ctx: &KlubbContext,
) {
    let recipient_ids: Vec<_> = meeting.attendees.iter().map(|a| a.user_id.clone()).collect();
    if recipient_ids.is_empty() {
        return;
    }

    let mut template = NotificationSpec::new(Default::default(), kind, meeting.title.clone(), message);
    template.related = Some(RelatedEntity {
        kind: RelatedEntityKind::Meeting,
        id: meeting.id.clone(),
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
        error!("Fan-out for meeting {} failed: {:?}", meeting.id, e);
    }
}
