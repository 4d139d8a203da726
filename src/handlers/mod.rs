pub mod client;
pub mod health;
pub mod meeting;
pub mod membership;
pub mod notification;
pub mod profile;
pub mod recurrence;
pub mod service;
pub mod stats;

pub use client::client_config;
pub use health::health_config;
pub use meeting::meeting_config;
pub use membership::membership_config;
pub use notification::notification_config;
pub use profile::profile_config;
pub use recurrence::recurrence_config;
pub use service::service_config;
pub use stats::stats_config;

use crate::error::{AppError, AppResult};
use crate::middlewares::AuthenticatedUser;
use actix_web::{HttpMessage, HttpRequest};
use uuid::Uuid;

pub(crate) fn get_auth_user(req: &HttpRequest) -> AppResult<AuthenticatedUser> {
    req.extensions()
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or_else(|| AppError::AuthError("Missing authenticated user".to_string()))
}

pub(crate) fn get_user_id_from_request(req: &HttpRequest) -> AppResult<Uuid> {
    Ok(get_auth_user(req)?.id)
}
