mod change_event_status;
mod create_event;
mod delete_event;
mod get_event;
mod list_events;
mod record_attendance;
mod register_for_event;
mod send_event_reminders;
mod subscribers;
mod unregister_from_event;
mod update_event;

use actix_web::web;
use change_event_status::change_event_status_controller;
use create_event::create_event_controller;
use delete_event::delete_event_controller;
use get_event::get_event_controller;
use list_events::list_events_controller;
use record_attendance::record_attendance_controller;
use register_for_event::register_for_event_controller;
use unregister_from_event::unregister_from_event_controller;
use update_event::update_event_controller;

pub use send_event_reminders::SendEventRemindersUseCase;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Admin
    cfg.route("/events", web::post().to(create_event_controller));
    cfg.route("/events/{event_id}", web::put().to(update_event_controller));
    cfg.route(
        "/events/{event_id}",
        web::delete().to(delete_event_controller),
    );
    cfg.route(
        "/events/{event_id}/status",
        web::post().to(change_event_status_controller),
    );
    cfg.route(
        "/events/{event_id}/attendance",
        web::post().to(record_attendance_controller),
    );

    // Members
    cfg.route("/events", web::get().to(list_events_controller));
    cfg.route("/events/{event_id}", web::get().to(get_event_controller));
    cfg.route(
        "/events/{event_id}/register",
        web::post().to(register_for_event_controller),
    );
    cfg.route(
        "/events/{event_id}/register",
        web::delete().to(unregister_from_event_controller),
    );
}
