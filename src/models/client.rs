use crate::entities::client_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateClientRequest {
    pub service_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub custom_duration_minutes: Option<i32>,
    pub custom_price_per_hour: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateClientRequest {
    pub service_id: Option<Uuid>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub custom_duration_minutes: Option<i32>,
    pub custom_price_per_hour: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub custom_duration_minutes: Option<i32>,
    pub custom_price_per_hour: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientListQuery {
    pub service_id: Option<Uuid>,
}

impl From<client_entity::Model> for ClientResponse {
    fn from(client: client_entity::Model) -> Self {
        Self {
            id: client.id,
            user_id: client.user_id,
            service_id: client.service_id,
            name: client.name,
            email: client.email,
            phone: client.phone,
            custom_duration_minutes: client.custom_duration_minutes,
            custom_price_per_hour: client.custom_price_per_hour,
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}
