use crate::entities::{MeetingStatus, meeting_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateMeetingRequest {
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub title: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub price_per_hour: f64,
    /// When set, the meeting is funded by this membership and counts
    /// against its allowance.
    pub membership_id: Option<Uuid>,
    pub status: Option<MeetingStatus>,
    #[serde(default)]
    pub paid: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateMeetingRequest {
    pub service_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub title: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub price_per_hour: Option<f64>,
    pub status: Option<MeetingStatus>,
    pub paid: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeetingResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub recurrence_id: Option<Uuid>,
    pub membership_id: Option<Uuid>,
    pub title: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub price_per_hour: f64,
    pub price_total: f64,
    pub status: MeetingStatus,
    pub paid: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeetingListQuery {
    pub status: Option<String>,
    pub date: Option<String>,
}

impl From<meeting_entity::Model> for MeetingResponse {
    fn from(meeting: meeting_entity::Model) -> Self {
        Self {
            id: meeting.id,
            user_id: meeting.user_id,
            service_id: meeting.service_id,
            client_id: meeting.client_id,
            recurrence_id: meeting.recurrence_id,
            membership_id: meeting.membership_id,
            title: meeting.title,
            start_time: meeting.start_time,
            end_time: meeting.end_time,
            price_per_hour: meeting.price_per_hour,
            price_total: meeting.price_total,
            status: meeting.status,
            paid: meeting.paid,
            created_at: meeting.created_at,
            updated_at: meeting.updated_at,
        }
    }
}
