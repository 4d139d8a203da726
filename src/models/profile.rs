use crate::entities::{Currency, user_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub profile_picture_url: Option<String>,
    pub tutorial_checked: bool,
    pub currency: Currency,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub profile_picture_url: Option<String>,
    pub tutorial_checked: Option<bool>,
    pub currency: Option<Currency>,
}

impl From<user_entity::Model> for ProfileResponse {
    fn from(user: user_entity::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            profile_picture_url: user.profile_picture_url,
            tutorial_checked: user.tutorial_checked,
            currency: user.currency,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
