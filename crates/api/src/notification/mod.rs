mod archive_notification;
mod create_bulk_notifications;
mod create_notification;
mod deliver_due_notifications;
mod get_notifications;
mod mark_notification_read;
mod unread_count;

use actix_web::web;
use archive_notification::archive_notification_controller;
use create_bulk_notifications::broadcast_notification_controller;
use get_notifications::get_notifications_controller;
use mark_notification_read::{
    mark_all_notifications_read_controller, mark_notification_read_controller,
};
use unread_count::unread_count_controller;

pub use create_bulk_notifications::{BulkDeliveryResult, CreateBulkNotificationsUseCase};
pub use create_notification::{CreateNotificationUseCase, NotificationSpec};
pub use deliver_due_notifications::DeliverDueNotificationsUseCase;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/notifications", web::get().to(get_notifications_controller));
    cfg.route(
        "/notifications/unread-count",
        web::get().to(unread_count_controller),
    );
    cfg.route(
        "/notifications/read-all",
        web::post().to(mark_all_notifications_read_controller),
    );
    cfg.route(
        "/notifications/{notification_id}/read",
        web::post().to(mark_notification_read_controller),
    );
    cfg.route(
        "/notifications/{notification_id}/archive",
        web::post().to(archive_notification_controller),
    );
    // Admin only
    cfg.route(
        "/notifications/broadcast",
        web::post().to(broadcast_notification_controller),
    );
}
