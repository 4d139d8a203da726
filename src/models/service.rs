use crate::entities::service_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateServiceRequest {
    pub name: String,
    pub default_duration_minutes: i32,
    pub default_price_per_hour: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub default_duration_minutes: Option<i32>,
    pub default_price_per_hour: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub default_duration_minutes: i32,
    pub default_price_per_hour: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<service_entity::Model> for ServiceResponse {
    fn from(service: service_entity::Model) -> Self {
        Self {
            id: service.id,
            user_id: service.user_id,
            name: service.name,
            default_duration_minutes: service.default_duration_minutes,
            default_price_per_hour: service.default_price_per_hour,
            created_at: service.created_at,
            updated_at: service.updated_at,
        }
    }
}
