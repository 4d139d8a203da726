use crate::entities::{Frequency, recurrence_entity};
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// How far an edit or delete on a series meeting reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceUpdateScope {
    ThisMeetingOnly,
    ThisAndFuture,
    AllMeetings,
}

impl RecurrenceUpdateScope {
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "this_meeting_only" => Ok(Self::ThisMeetingOnly),
            "this_and_future" => Ok(Self::ThisAndFuture),
            "all_meetings" => Ok(Self::AllMeetings),
            other => Err(AppError::ValidationError(format!(
                "Invalid scope '{}', expected one of: this_meeting_only, this_and_future, all_meetings",
                other
            ))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateRecurrenceRequest {
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub frequency: Frequency,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub title: String,
    /// Time of day in UTC, "HH:MM" or "HH:MM:SS".
    pub start_time: String,
    pub end_time: String,
    pub price_per_hour: f64,
    #[serde(default)]
    pub use_membership: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateRecurrenceRequest {
    pub service_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub frequency: Option<Frequency>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub title: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub price_per_hour: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecurrenceResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub frequency: Frequency,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub price_per_hour: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Why a series came out shorter than its date range allows.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LimitationInfo {
    pub total_possible_meetings: u64,
    pub meetings_created: u64,
    pub membership_name: String,
    pub available_meetings: u64,
    pub total_meetings: i32,
    pub completed_meetings: u64,
    pub scheduled_meetings: u64,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateRecurrenceResponse {
    pub recurrence: RecurrenceResponse,
    pub meetings_created: u64,
    pub membership_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limitation_info: Option<LimitationInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScopedUpdateQuery {
    pub update_scope: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScopedDeleteQuery {
    pub delete_scope: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScopedDeleteResponse {
    pub deleted: u64,
}

impl From<recurrence_entity::Model> for RecurrenceResponse {
    fn from(recurrence: recurrence_entity::Model) -> Self {
        Self {
            id: recurrence.id,
            user_id: recurrence.user_id,
            service_id: recurrence.service_id,
            client_id: recurrence.client_id,
            frequency: recurrence.frequency,
            start_date: recurrence.start_date,
            end_date: recurrence.end_date,
            title: recurrence.title,
            start_time: recurrence.start_time,
            end_time: recurrence.end_time,
            price_per_hour: recurrence.price_per_hour,
            created_at: recurrence.created_at,
            updated_at: recurrence.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_all_scopes() {
        assert_eq!(
            RecurrenceUpdateScope::parse("this_meeting_only").unwrap(),
            RecurrenceUpdateScope::ThisMeetingOnly
        );
        assert_eq!(
            RecurrenceUpdateScope::parse("this_and_future").unwrap(),
            RecurrenceUpdateScope::ThisAndFuture
        );
        assert_eq!(
            RecurrenceUpdateScope::parse("all_meetings").unwrap(),
            RecurrenceUpdateScope::AllMeetings
        );
    }

    #[test]
    fn parse_rejects_unknown_scope() {
        let err = RecurrenceUpdateScope::parse("everything").unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
