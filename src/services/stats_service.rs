use crate::entities::{
    MeetingStatus, MembershipStatus, client_entity, meeting_entity, membership_entity,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    ClientStats, ClientStatsResponse, DailyBreakdownItem, DailyStatsQuery, MeetingResponse,
    StatsOverview, StatsQuery,
};
use crate::utils::{combine_date_time, round_money};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::collections::{BTreeMap, HashMap, HashSet};
use uuid::Uuid;

#[derive(Clone)]
pub struct StatsService {
    pool: DatabaseConnection,
}

impl StatsService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Meeting and membership totals for the user, optionally narrowed to
    /// a date range and service. The membership block ignores the dates:
    /// a membership sold in March still counts in an April report.
    pub async fn get_overview(&self, user_id: Uuid, query: StatsQuery) -> AppResult<StatsOverview> {
        let (range_start, range_end) = parse_optional_range(&query.start_date, &query.end_date)?;
        let meetings = self
            .load_meetings(user_id, range_start, range_end, query.service_id)
            .await?;

        let mut done = 0u64;
        let mut canceled = 0u64;
        let mut clients = HashSet::new();
        let mut revenue = 0.0;
        let mut revenue_paid = 0.0;
        let mut hours = 0.0;
        for meeting in &meetings {
            clients.insert(meeting.client_id);
            match meeting.status {
                MeetingStatus::Done => {
                    done += 1;
                    revenue += meeting.price_total;
                    if meeting.paid {
                        revenue_paid += meeting.price_total;
                    }
                    hours += meeting_hours(meeting);
                }
                MeetingStatus::Canceled => canceled += 1,
                MeetingStatus::Upcoming => {}
            }
        }

        let mut membership_find = membership_entity::Entity::find()
            .filter(membership_entity::Column::UserId.eq(user_id));
        if let Some(service_id) = query.service_id {
            membership_find =
                membership_find.filter(membership_entity::Column::ServiceId.eq(service_id));
        }
        let memberships = membership_find.all(&self.pool).await?;

        let active_memberships = memberships
            .iter()
            .filter(|m| m.status == MembershipStatus::Active)
            .count() as u64;
        let membership_revenue: f64 = memberships.iter().map(|m| m.price_per_membership).sum();
        let membership_revenue_paid: f64 = memberships
            .iter()
            .filter(|m| m.paid)
            .map(|m| m.price_per_membership)
            .sum();
        let clients_with_memberships = memberships
            .iter()
            .map(|m| m.client_id)
            .collect::<HashSet<_>>()
            .len() as u64;

        Ok(StatsOverview {
            total_meetings: meetings.len() as u64,
            done_meetings: done,
            canceled_meetings: canceled,
            total_clients: clients.len() as u64,
            total_revenue: round_money(revenue),
            revenue_paid: round_money(revenue_paid),
            total_hours: round_hours(hours),
            total_memberships: memberships.len() as u64,
            active_memberships,
            membership_revenue: round_money(membership_revenue),
            membership_revenue_paid: round_money(membership_revenue_paid),
            clients_with_memberships,
        })
    }

    /// Per-client rollups. Clients without a meeting in the window are
    /// left out.
    pub async fn get_client_stats(
        &self,
        user_id: Uuid,
        query: StatsQuery,
    ) -> AppResult<Vec<ClientStatsResponse>> {
        let (range_start, range_end) = parse_optional_range(&query.start_date, &query.end_date)?;
        let clients = client_entity::Entity::find()
            .filter(client_entity::Column::UserId.eq(user_id))
            .order_by_asc(client_entity::Column::Name)
            .all(&self.pool)
            .await?;
        let meetings = self
            .load_meetings(user_id, range_start, range_end, query.service_id)
            .await?;

        let mut grouped: HashMap<Uuid, Vec<meeting_entity::Model>> = HashMap::new();
        for meeting in meetings {
            grouped.entry(meeting.client_id).or_default().push(meeting);
        }

        let mut stats = Vec::new();
        for client in clients {
            let Some(client_meetings) = grouped.remove(&client.id) else {
                continue;
            };
            stats.push(build_client_stats(client.id, client.name, client_meetings));
        }
        Ok(stats)
    }

    pub async fn get_single_client_stats(
        &self,
        user_id: Uuid,
        client_id: Uuid,
        query: StatsQuery,
    ) -> AppResult<ClientStatsResponse> {
        let client = client_entity::Entity::find()
            .filter(client_entity::Column::Id.eq(client_id))
            .filter(client_entity::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;

        let (range_start, range_end) = parse_optional_range(&query.start_date, &query.end_date)?;
        let meetings = self
            .load_meetings(user_id, range_start, range_end, query.service_id)
            .await?
            .into_iter()
            .filter(|m| m.client_id == client.id)
            .collect();

        Ok(build_client_stats(client.id, client.name, meetings))
    }

    /// One item per calendar day in the range, revenue from done meetings
    /// only. Upcoming meetings still appear in the counts so the chart can
    /// show planned load.
    pub async fn get_daily_breakdown(
        &self,
        user_id: Uuid,
        query: DailyStatsQuery,
    ) -> AppResult<Vec<DailyBreakdownItem>> {
        let start = parse_date_field(&query.start_date, "start_date")?;
        let end = parse_date_field(&query.end_date, "end_date")?;

        let mut find = meeting_entity::Entity::find()
            .filter(meeting_entity::Column::UserId.eq(user_id))
            .filter(meeting_entity::Column::StartTime.gte(combine_date_time(start, NaiveTime::MIN)))
            .filter(meeting_entity::Column::StartTime.lt(day_end_exclusive(end)))
            .filter(
                meeting_entity::Column::Status
                    .is_in([MeetingStatus::Done, MeetingStatus::Upcoming]),
            );
        if let Some(service_id) = query.service_id {
            find = find.filter(meeting_entity::Column::ServiceId.eq(service_id));
        }
        let meetings = find
            .order_by_asc(meeting_entity::Column::StartTime)
            .all(&self.pool)
            .await?;

        let mut grouped: BTreeMap<NaiveDate, Vec<&meeting_entity::Model>> = BTreeMap::new();
        for meeting in &meetings {
            grouped
                .entry(meeting.start_time.date_naive())
                .or_default()
                .push(meeting);
        }

        let empty = Vec::new();
        let mut items = Vec::new();
        let mut day = start;
        while day <= end {
            let day_meetings = grouped.get(&day).unwrap_or(&empty);
            let revenue: f64 = day_meetings
                .iter()
                .filter(|m| m.status == MeetingStatus::Done)
                .map(|m| m.price_total)
                .sum();
            items.push(DailyBreakdownItem {
                date: day.format("%Y-%m-%d").to_string(),
                revenue: round_money(revenue),
                meetings_count: day_meetings.len() as u64,
                meeting_ids: day_meetings.iter().map(|m| m.id).collect(),
            });

            let Some(next) = day.succ_opt() else { break };
            day = next;
        }

        Ok(items)
    }

    async fn load_meetings(
        &self,
        user_id: Uuid,
        range_start: Option<DateTime<Utc>>,
        range_end_exclusive: Option<DateTime<Utc>>,
        service_id: Option<Uuid>,
    ) -> AppResult<Vec<meeting_entity::Model>> {
        let mut find = meeting_entity::Entity::find()
            .filter(meeting_entity::Column::UserId.eq(user_id));
        if let Some(start) = range_start {
            find = find.filter(meeting_entity::Column::StartTime.gte(start));
        }
        if let Some(end) = range_end_exclusive {
            find = find.filter(meeting_entity::Column::StartTime.lt(end));
        }
        if let Some(service_id) = service_id {
            find = find.filter(meeting_entity::Column::ServiceId.eq(service_id));
        }

        Ok(find
            .order_by_asc(meeting_entity::Column::StartTime)
            .all(&self.pool)
            .await?)
    }
}

fn build_client_stats(
    client_id: Uuid,
    client_name: String,
    meetings: Vec<meeting_entity::Model>,
) -> ClientStatsResponse {
    let mut done = 0u64;
    let mut canceled = 0u64;
    let mut revenue = 0.0;
    let mut hours = 0.0;
    let mut last_meeting = None;
    for meeting in &meetings {
        last_meeting = last_meeting.max(Some(meeting.start_time));
        match meeting.status {
            MeetingStatus::Done => {
                done += 1;
                revenue += meeting.price_total;
                hours += meeting_hours(meeting);
            }
            MeetingStatus::Canceled => canceled += 1,
            MeetingStatus::Upcoming => {}
        }
    }

    ClientStatsResponse {
        client_stats: ClientStats {
            client_id,
            client_name,
            total_meetings: meetings.len() as u64,
            done_meetings: done,
            canceled_meetings: canceled,
            total_revenue: round_money(revenue),
            total_hours: round_hours(hours),
            last_meeting,
        },
        meetings: meetings.into_iter().map(MeetingResponse::from).collect(),
    }
}

fn meeting_hours(meeting: &meeting_entity::Model) -> f64 {
    (meeting.end_time - meeting.start_time).num_seconds() as f64 / 3600.0
}

fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

fn parse_date_field(value: &str, field: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        AppError::ValidationError(format!(
            "Invalid {} '{}', expected YYYY-MM-DD",
            field, value
        ))
    })
}

fn parse_optional_range(
    start: &Option<String>,
    end: &Option<String>,
) -> AppResult<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
    let range_start = match start.as_deref() {
        Some(value) => Some(combine_date_time(
            parse_date_field(value, "start_date")?,
            NaiveTime::MIN,
        )),
        None => None,
    };
    let range_end = match end.as_deref() {
        Some(value) => Some(day_end_exclusive(parse_date_field(value, "end_date")?)),
        None => None,
    };
    Ok((range_start, range_end))
}

// End dates are inclusive; the filter uses the next midnight as an
// exclusive upper bound.
fn day_end_exclusive(date: NaiveDate) -> DateTime<Utc> {
    match date.succ_opt() {
        Some(next) => combine_date_time(next, NaiveTime::MIN),
        None => DateTime::<Utc>::MAX_UTC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn client_meeting(status: MeetingStatus, paid: bool, day: u32) -> meeting_entity::Model {
        let start = Utc.with_ymd_and_hms(2025, 4, day, 10, 0, 0).unwrap();
        meeting_entity::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            recurrence_id: None,
            membership_id: None,
            title: None,
            start_time: start,
            end_time: start + chrono::Duration::hours(1),
            price_per_hour: 100.0,
            price_total: 100.0,
            status,
            paid,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn client_rollup_counts_revenue_from_done_meetings_only() {
        let client_id = Uuid::new_v4();
        let meetings = vec![
            client_meeting(MeetingStatus::Done, true, 1),
            client_meeting(MeetingStatus::Done, false, 8),
            client_meeting(MeetingStatus::Upcoming, false, 15),
            client_meeting(MeetingStatus::Canceled, false, 22),
        ];

        let rollup = build_client_stats(client_id, "Alice".to_string(), meetings);

        assert_eq!(rollup.client_stats.total_meetings, 4);
        assert_eq!(rollup.client_stats.done_meetings, 2);
        assert_eq!(rollup.client_stats.canceled_meetings, 1);
        assert_eq!(rollup.client_stats.total_revenue, 200.0);
        assert_eq!(rollup.client_stats.total_hours, 2.0);
        assert_eq!(rollup.meetings.len(), 4);
    }

    #[test]
    fn client_rollup_last_meeting_is_latest_start_of_any_status() {
        let meetings = vec![
            client_meeting(MeetingStatus::Done, true, 1),
            client_meeting(MeetingStatus::Upcoming, false, 20),
        ];
        let latest = meetings[1].start_time;

        let rollup = build_client_stats(Uuid::new_v4(), "Bob".to_string(), meetings);

        assert_eq!(rollup.client_stats.last_meeting, Some(latest));
    }

    #[test]
    fn optional_range_normalizes_whole_days() {
        let (start, end) = parse_optional_range(
            &Some("2025-04-01".to_string()),
            &Some("2025-04-30".to_string()),
        )
        .unwrap();

        assert_eq!(start, Some(Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap()));
        assert_eq!(end, Some(Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn bad_range_date_is_rejected() {
        let err = parse_optional_range(&Some("04/01/2025".to_string()), &None).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
