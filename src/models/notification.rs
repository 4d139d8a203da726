use crate::entities::{NotificationType, notification_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub related_entity_id: Option<Uuid>,
    pub related_entity_type: Option<String>,
    pub read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateNotificationRequest {
    pub read: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MarkNotificationsReadRequest {
    pub notification_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationListQuery {
    pub unread_only: Option<bool>,
}

impl From<notification_entity::Model> for NotificationResponse {
    fn from(notification: notification_entity::Model) -> Self {
        Self {
            id: notification.id,
            user_id: notification.user_id,
            notification_type: notification.notification_type,
            title: notification.title,
            message: notification.message,
            related_entity_id: notification.related_entity_id,
            related_entity_type: notification.related_entity_type,
            read: notification.read,
            read_at: notification.read_at,
            created_at: notification.created_at,
        }
    }
}
