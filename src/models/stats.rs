use crate::models::meeting::MeetingResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatsOverview {
    pub total_meetings: u64,
    pub done_meetings: u64,
    pub canceled_meetings: u64,
    pub total_clients: u64,
    /// Revenue counts done meetings only.
    pub total_revenue: f64,
    pub revenue_paid: f64,
    pub total_hours: f64,
    pub total_memberships: u64,
    pub active_memberships: u64,
    pub membership_revenue: f64,
    pub membership_revenue_paid: f64,
    pub clients_with_memberships: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientStats {
    pub client_id: Uuid,
    pub client_name: String,
    pub total_meetings: u64,
    pub done_meetings: u64,
    pub canceled_meetings: u64,
    pub total_revenue: f64,
    pub total_hours: f64,
    pub last_meeting: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientStatsResponse {
    pub client_stats: ClientStats,
    pub meetings: Vec<MeetingResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailyBreakdownItem {
    /// Calendar day in UTC, "YYYY-MM-DD".
    pub date: String,
    pub revenue: f64,
    pub meetings_count: u64,
    pub meeting_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub service_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailyStatsQuery {
    pub start_date: String,
    pub end_date: String,
    pub service_id: Option<Uuid>,
}
