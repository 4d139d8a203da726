use crate::entities::{MembershipStatus, membership_entity};
use crate::utils::round_money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateMembershipRequest {
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    pub total_meetings: i32,
    pub price_per_membership: f64,
    pub availability_days: i32,
    #[serde(default)]
    pub paid: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateMembershipRequest {
    pub name: Option<String>,
    pub total_meetings: Option<i32>,
    pub price_per_membership: Option<f64>,
    pub availability_days: Option<i32>,
    pub status: Option<MembershipStatus>,
    pub paid: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MembershipResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    pub total_meetings: i32,
    pub price_per_membership: f64,
    /// Derived from the current price and total, never stored.
    pub price_per_meeting: f64,
    pub availability_days: i32,
    pub status: MembershipStatus,
    pub paid: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Live allowance counts for one membership.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MembershipAvailability {
    pub membership_id: Uuid,
    pub membership_name: String,
    pub price_per_meeting: f64,
    pub total_meetings: i32,
    pub completed_meetings: u64,
    pub scheduled_meetings: u64,
    pub available_meetings: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MembershipProgressResponse {
    pub membership_id: Uuid,
    pub total_meetings: i32,
    pub completed_meetings: u64,
    pub remaining_meetings: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SetMembershipStartDateRequest {
    pub start_date: DateTime<Utc>,
}

pub fn membership_price_per_meeting(price_per_membership: f64, total_meetings: i32) -> f64 {
    if total_meetings <= 0 {
        return 0.0;
    }
    round_money(price_per_membership / total_meetings as f64)
}

impl From<membership_entity::Model> for MembershipResponse {
    fn from(membership: membership_entity::Model) -> Self {
        let price_per_meeting =
            membership_price_per_meeting(membership.price_per_membership, membership.total_meetings);
        Self {
            id: membership.id,
            user_id: membership.user_id,
            service_id: membership.service_id,
            client_id: membership.client_id,
            name: membership.name,
            total_meetings: membership.total_meetings,
            price_per_membership: membership.price_per_membership,
            price_per_meeting,
            availability_days: membership.availability_days,
            status: membership.status,
            paid: membership.paid,
            start_date: membership.start_date,
            created_at: membership.created_at,
            updated_at: membership.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_per_meeting_is_derived_and_rounded() {
        assert_eq!(membership_price_per_meeting(500.0, 10), 50.0);
        assert_eq!(membership_price_per_meeting(250.0, 3), 83.33);
        assert_eq!(membership_price_per_meeting(100.0, 0), 0.0);
    }
}
