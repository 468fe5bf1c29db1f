mod create_user;
mod delete_user;
mod forgot_password;
mod get_me;
mod list_users;
mod login;
mod reset_password;
mod update_user;
mod verify_user;

use actix_web::web;
use create_user::create_user_controller;
use delete_user::delete_user_controller;
use forgot_password::forgot_password_controller;
use get_me::get_me_controller;
use list_users::list_users_controller;
use login::login_controller;
use reset_password::reset_password_controller;
use update_user::update_user_controller;
use verify_user::verify_user_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Unauthenticated
    cfg.route("/auth/login", web::post().to(login_controller));
    cfg.route("/auth/verify", web::post().to(verify_user_controller));
    cfg.route(
        "/auth/forgot-password",
        web::post().to(forgot_password_controller),
    );
    cfg.route(
        "/auth/reset-password",
        web::post().to(reset_password_controller),
    );

    // Members
    cfg.route("/users/me", web::get().to(get_me_controller));
    cfg.route("/users/me", web::put().to(update_user_controller));

    // Admin
    cfg.route("/users", web::post().to(create_user_controller));
    cfg.route("/users", web::get().to(list_users_controller));
    cfg.route("/users/{user_id}", web::delete().to(delete_user_controller));
}
