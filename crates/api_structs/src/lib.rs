mod contact;
mod event;
mod meeting;
mod notification;
mod status;
mod todo;
mod user;

pub mod dtos {
    pub use crate::event::dtos::*;
    pub use crate::meeting::dtos::*;
    pub use crate::notification::dtos::*;
    pub use crate::todo::dtos::*;
    pub use crate::user::dtos::*;
}

pub use crate::contact::api::*;
pub use crate::event::api::*;
pub use crate::meeting::api::*;
pub use crate::notification::api::*;
pub use crate::status::api::*;
pub use crate::todo::api::*;
pub use crate::user::api::*;
