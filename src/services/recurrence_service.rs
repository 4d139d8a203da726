use crate::entities::{
    MeetingStatus, client_entity, meeting_entity, recurrence_entity, service_entity,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateRecurrenceRequest, CreateRecurrenceResponse, LimitationInfo, MeetingResponse,
    RecurrenceResponse, RecurrenceUpdateScope, UpdateMeetingRequest, UpdateRecurrenceRequest,
};
use crate::services::{MeetingService, MembershipService};
use crate::utils::{expand_occurrences, meeting_price_total, parse_time_of_day, validate_price};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Clone)]
pub struct RecurrenceService {
    pool: DatabaseConnection,
    membership_service: MembershipService,
    meeting_service: MeetingService,
}

impl RecurrenceService {
    pub fn new(
        pool: DatabaseConnection,
        membership_service: MembershipService,
        meeting_service: MeetingService,
    ) -> Self {
        Self {
            pool,
            membership_service,
            meeting_service,
        }
    }

    pub async fn get_recurrences(&self, user_id: Uuid) -> AppResult<Vec<RecurrenceResponse>> {
        let recurrences = recurrence_entity::Entity::find()
            .filter(recurrence_entity::Column::UserId.eq(user_id))
            .order_by_desc(recurrence_entity::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        Ok(recurrences
            .into_iter()
            .map(RecurrenceResponse::from)
            .collect())
    }

    pub async fn get_recurrence(
        &self,
        user_id: Uuid,
        recurrence_id: Uuid,
    ) -> AppResult<RecurrenceResponse> {
        let recurrence = self.find_owned(user_id, recurrence_id).await?;
        Ok(recurrence.into())
    }

    pub async fn get_recurrence_meetings(
        &self,
        user_id: Uuid,
        recurrence_id: Uuid,
    ) -> AppResult<Vec<MeetingResponse>> {
        let recurrence = self.find_owned(user_id, recurrence_id).await?;
        let meetings = meeting_entity::Entity::find()
            .filter(meeting_entity::Column::RecurrenceId.eq(recurrence.id))
            .order_by_asc(meeting_entity::Column::StartTime)
            .all(&self.pool)
            .await?;

        Ok(meetings.into_iter().map(MeetingResponse::from).collect())
    }

    /// Creates the pattern row plus one meeting per occurrence. With
    /// `use_membership` the series is capped to the allowance that is
    /// still available and funded occurrences bill the per-meeting rate.
    pub async fn create_recurrence(
        &self,
        user_id: Uuid,
        req: CreateRecurrenceRequest,
    ) -> AppResult<CreateRecurrenceResponse> {
        validate_price(req.price_per_hour, "price_per_hour")?;
        let start_of_day = parse_time_of_day(&req.start_time)?;
        let end_of_day = parse_time_of_day(&req.end_time)?;
        if end_of_day <= start_of_day {
            return Err(AppError::ValidationError(
                "end_time must be after start_time".to_string(),
            ));
        }
        self.ensure_service_owned(user_id, req.service_id).await?;
        self.ensure_client_owned(user_id, req.client_id).await?;

        let txn = self.pool.begin().await?;
        let now = Utc::now();

        let recurrence = recurrence_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            service_id: Set(req.service_id),
            client_id: Set(req.client_id),
            frequency: Set(req.frequency.clone()),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            title: Set(req.title.clone()),
            start_time: Set(req.start_time.clone()),
            end_time: Set(req.end_time.clone()),
            price_per_hour: Set(req.price_per_hour),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        }
        .insert(&txn)
        .await?;

        let occurrences = expand_occurrences(
            req.frequency.clone(),
            req.start_date.date_naive(),
            req.end_date.date_naive(),
            start_of_day,
            end_of_day,
            None,
        );
        let total_possible = occurrences.len() as u64;

        let funding = if req.use_membership {
            self.membership_service
                .find_available_membership(&txn, user_id, req.client_id)
                .await?
        } else {
            None
        };
        let planned = match &funding {
            Some((_, availability)) => {
                occurrences.len().min(availability.available_meetings as usize)
            }
            None => occurrences.len(),
        };

        let mut first_funded_start = None;
        for (start, end) in occurrences.into_iter().take(planned) {
            let (price_per_hour, membership_id) = match &funding {
                Some((membership, availability)) => {
                    (availability.price_per_meeting, Some(membership.id))
                }
                None => (req.price_per_hour, None),
            };
            let price_total = meeting_price_total(price_per_hour, start, end);
            if membership_id.is_some() && first_funded_start.is_none() {
                first_funded_start = Some(start);
            }

            meeting_entity::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                service_id: Set(req.service_id),
                client_id: Set(req.client_id),
                recurrence_id: Set(Some(recurrence.id)),
                membership_id: Set(membership_id),
                title: Set(Some(req.title.clone())),
                start_time: Set(start),
                end_time: Set(end),
                price_per_hour: Set(price_per_hour),
                price_total: Set(price_total),
                status: Set(MeetingStatus::Upcoming),
                paid: Set(false),
                created_at: Set(Some(now)),
                updated_at: Set(Some(now)),
            }
            .insert(&txn)
            .await?;
        }

        if let Some((membership, _)) = &funding
            && let Some(first_start) = first_funded_start
        {
            self.membership_service
                .stamp_start_date_on(&txn, membership, first_start)
                .await?;
        }
        txn.commit().await?;

        let meetings_created = planned as u64;
        let (membership_used, limitation_info) = match &funding {
            Some((_, availability)) if total_possible > availability.available_meetings => {
                let info = LimitationInfo {
                    total_possible_meetings: total_possible,
                    meetings_created,
                    membership_name: availability.membership_name.clone(),
                    available_meetings: availability.available_meetings,
                    total_meetings: availability.total_meetings,
                    completed_meetings: availability.completed_meetings,
                    scheduled_meetings: availability.scheduled_meetings,
                    message: format!(
                        "Only {} meetings were created due to membership limit. Membership '{}' has {} meetings available (completed: {}, scheduled: {}, total: {}).",
                        meetings_created,
                        availability.membership_name,
                        availability.available_meetings,
                        availability.completed_meetings,
                        availability.scheduled_meetings,
                        availability.total_meetings
                    ),
                };
                (true, Some(info))
            }
            Some(_) => (true, None),
            None => (false, None),
        };
        let message = if req.use_membership && funding.is_none() {
            Some(
                "No available membership was found for this client; meetings were created at the regular rate."
                    .to_string(),
            )
        } else {
            None
        };

        Ok(CreateRecurrenceResponse {
            recurrence: recurrence.into(),
            meetings_created,
            membership_used,
            limitation_info,
            message,
        })
    }

    /// Edits the pattern row only. Meetings that were already generated
    /// keep their times; use the scoped meeting endpoints to touch them.
    pub async fn update_recurrence(
        &self,
        user_id: Uuid,
        recurrence_id: Uuid,
        req: UpdateRecurrenceRequest,
    ) -> AppResult<RecurrenceResponse> {
        let recurrence = self.find_owned(user_id, recurrence_id).await?;

        if let Some(service_id) = req.service_id
            && service_id != recurrence.service_id
        {
            self.ensure_service_owned(user_id, service_id).await?;
        }
        if let Some(client_id) = req.client_id
            && client_id != recurrence.client_id
        {
            self.ensure_client_owned(user_id, client_id).await?;
        }

        let start_time = req
            .start_time
            .clone()
            .unwrap_or_else(|| recurrence.start_time.clone());
        let end_time = req
            .end_time
            .clone()
            .unwrap_or_else(|| recurrence.end_time.clone());
        let start_of_day = parse_time_of_day(&start_time)?;
        let end_of_day = parse_time_of_day(&end_time)?;
        if end_of_day <= start_of_day {
            return Err(AppError::ValidationError(
                "end_time must be after start_time".to_string(),
            ));
        }
        if let Some(price) = req.price_per_hour {
            validate_price(price, "price_per_hour")?;
        }

        let mut active = recurrence.into_active_model();
        if let Some(service_id) = req.service_id {
            active.service_id = Set(service_id);
        }
        if let Some(client_id) = req.client_id {
            active.client_id = Set(client_id);
        }
        if let Some(frequency) = req.frequency {
            active.frequency = Set(frequency);
        }
        if let Some(start_date) = req.start_date {
            active.start_date = Set(start_date);
        }
        if let Some(end_date) = req.end_date {
            active.end_date = Set(end_date);
        }
        if let Some(title) = req.title {
            active.title = Set(title);
        }
        active.start_time = Set(start_time);
        active.end_time = Set(end_time);
        if let Some(price) = req.price_per_hour {
            active.price_per_hour = Set(price);
        }
        active.updated_at = Set(Some(Utc::now()));

        let recurrence = active.update(&self.pool).await?;
        Ok(recurrence.into())
    }

    /// Removes the pattern and every meeting generated from it. Returns
    /// how many meetings went with it.
    pub async fn delete_recurrence(&self, user_id: Uuid, recurrence_id: Uuid) -> AppResult<u64> {
        let recurrence = self.find_owned(user_id, recurrence_id).await?;

        let txn = self.pool.begin().await?;
        let deleted = meeting_entity::Entity::delete_many()
            .filter(meeting_entity::Column::RecurrenceId.eq(recurrence.id))
            .exec(&txn)
            .await?
            .rows_affected;
        recurrence_entity::Entity::delete_by_id(recurrence.id)
            .exec(&txn)
            .await?;
        txn.commit().await?;

        Ok(deleted)
    }

    /// Applies an edit to one series meeting, or across its siblings when
    /// the scope says so. Series-wide edits are limited to title, price,
    /// status and paid.
    pub async fn update_meeting_scoped(
        &self,
        user_id: Uuid,
        meeting_id: Uuid,
        scope: RecurrenceUpdateScope,
        req: UpdateMeetingRequest,
    ) -> AppResult<Vec<MeetingResponse>> {
        if scope == RecurrenceUpdateScope::ThisMeetingOnly {
            let updated = self
                .meeting_service
                .update_meeting(user_id, meeting_id, req)
                .await?;
            return Ok(vec![updated]);
        }

        if req.start_time.is_some()
            || req.end_time.is_some()
            || req.service_id.is_some()
            || req.client_id.is_some()
        {
            return Err(AppError::ValidationError(
                "Only title, price_per_hour, status and paid can change across a series; use this_meeting_only for the rest".to_string(),
            ));
        }
        if let Some(price) = req.price_per_hour {
            validate_price(price, "price_per_hour")?;
        }

        let target = self.find_owned_meeting(user_id, meeting_id).await?;
        if target.recurrence_id.is_none() {
            return Err(AppError::ScopeMismatch(
                "Meeting is not part of a recurring series".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;
        let siblings = meeting_entity::Entity::find()
            .filter(meeting_entity::Column::RecurrenceId.eq(target.recurrence_id))
            .order_by_asc(meeting_entity::Column::StartTime)
            .all(&txn)
            .await?;
        let selected: Vec<meeting_entity::Model> = select_scope(&siblings, &target, scope)
            .into_iter()
            .cloned()
            .collect();

        // Reactivating canceled meetings takes allowance back; make sure it
        // still fits before touching any row.
        if let Some(new_status) = req.status.clone()
            && new_status != MeetingStatus::Canceled
        {
            let mut reactivating: HashMap<Uuid, u64> = HashMap::new();
            for meeting in &selected {
                if meeting.status == MeetingStatus::Canceled
                    && let Some(membership_id) = meeting.membership_id
                {
                    *reactivating.entry(membership_id).or_insert(0) += 1;
                }
            }
            for (membership_id, needed) in reactivating {
                let membership = self
                    .membership_service
                    .find_owned_on(&txn, user_id, membership_id)
                    .await?;
                let availability = self
                    .membership_service
                    .availability_for(&txn, &membership)
                    .await?;
                if availability.available_meetings < needed {
                    return Err(AppError::AllowanceExceeded(format!(
                        "Membership '{}' has {} meetings available, cannot reactivate {}",
                        availability.membership_name, availability.available_meetings, needed
                    )));
                }
            }
        }

        let now = Utc::now();
        let mut updated = Vec::with_capacity(selected.len());
        for meeting in selected {
            let (start, end) = (meeting.start_time, meeting.end_time);

            let mut active = meeting.into_active_model();
            if let Some(title) = req.title.clone() {
                active.title = Set(Some(title));
            }
            if let Some(price) = req.price_per_hour {
                active.price_per_hour = Set(price);
                active.price_total = Set(meeting_price_total(price, start, end));
            }
            if let Some(status) = req.status.clone() {
                active.status = Set(status);
            }
            if let Some(paid) = req.paid {
                active.paid = Set(paid);
            }
            active.updated_at = Set(Some(now));
            updated.push(active.update(&txn).await?);
        }
        txn.commit().await?;

        updated.sort_by_key(|m| m.start_time);
        Ok(updated.into_iter().map(MeetingResponse::from).collect())
    }

    /// Deletes one series meeting or a scoped slice of its siblings. The
    /// pattern row stays either way.
    pub async fn delete_meetings_scoped(
        &self,
        user_id: Uuid,
        meeting_id: Uuid,
        scope: RecurrenceUpdateScope,
    ) -> AppResult<u64> {
        if scope == RecurrenceUpdateScope::ThisMeetingOnly {
            self.meeting_service.delete_meeting(user_id, meeting_id).await?;
            return Ok(1);
        }

        let target = self.find_owned_meeting(user_id, meeting_id).await?;
        if target.recurrence_id.is_none() {
            return Err(AppError::ScopeMismatch(
                "Meeting is not part of a recurring series".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;
        let siblings = meeting_entity::Entity::find()
            .filter(meeting_entity::Column::RecurrenceId.eq(target.recurrence_id))
            .all(&txn)
            .await?;
        let ids: Vec<Uuid> = select_scope(&siblings, &target, scope)
            .into_iter()
            .map(|m| m.id)
            .collect();
        let deleted = meeting_entity::Entity::delete_many()
            .filter(meeting_entity::Column::Id.is_in(ids))
            .exec(&txn)
            .await?
            .rows_affected;
        txn.commit().await?;

        Ok(deleted)
    }

    async fn find_owned(
        &self,
        user_id: Uuid,
        recurrence_id: Uuid,
    ) -> AppResult<recurrence_entity::Model> {
        recurrence_entity::Entity::find()
            .filter(recurrence_entity::Column::Id.eq(recurrence_id))
            .filter(recurrence_entity::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Recurrence not found".to_string()))
    }

    async fn find_owned_meeting(
        &self,
        user_id: Uuid,
        meeting_id: Uuid,
    ) -> AppResult<meeting_entity::Model> {
        meeting_entity::Entity::find()
            .filter(meeting_entity::Column::Id.eq(meeting_id))
            .filter(meeting_entity::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Meeting not found".to_string()))
    }

    async fn ensure_service_owned(&self, user_id: Uuid, service_id: Uuid) -> AppResult<()> {
        service_entity::Entity::find()
            .filter(service_entity::Column::Id.eq(service_id))
            .filter(service_entity::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;
        Ok(())
    }

    async fn ensure_client_owned(&self, user_id: Uuid, client_id: Uuid) -> AppResult<()> {
        client_entity::Entity::find()
            .filter(client_entity::Column::Id.eq(client_id))
            .filter(client_entity::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;
        Ok(())
    }
}

/// Picks which series meetings an operation reaches. `this_and_future`
/// compares by start time, so the target itself is always included.
fn select_scope<'a>(
    siblings: &'a [meeting_entity::Model],
    target: &meeting_entity::Model,
    scope: RecurrenceUpdateScope,
) -> Vec<&'a meeting_entity::Model> {
    match scope {
        RecurrenceUpdateScope::ThisMeetingOnly => {
            siblings.iter().filter(|m| m.id == target.id).collect()
        }
        RecurrenceUpdateScope::ThisAndFuture => siblings
            .iter()
            .filter(|m| m.start_time >= target.start_time)
            .collect(),
        RecurrenceUpdateScope::AllMeetings => siblings.iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn series_meeting(recurrence_id: Uuid, day: u32) -> meeting_entity::Model {
        let start = Utc.with_ymd_and_hms(2025, 3, day, 9, 0, 0).unwrap();
        meeting_entity::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            recurrence_id: Some(recurrence_id),
            membership_id: None,
            title: Some("Weekly session".to_string()),
            start_time: start,
            end_time: start + chrono::Duration::hours(1),
            price_per_hour: 100.0,
            price_total: 100.0,
            status: MeetingStatus::Upcoming,
            paid: false,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn this_and_future_reaches_target_and_later_siblings() {
        let recurrence_id = Uuid::new_v4();
        let siblings: Vec<_> = [3, 10, 17, 24, 31]
            .into_iter()
            .map(|day| series_meeting(recurrence_id, day))
            .collect();
        let target = siblings[2].clone();

        let selected = select_scope(&siblings, &target, RecurrenceUpdateScope::ThisAndFuture);

        assert_eq!(selected.len(), 3);
        assert!(selected.iter().all(|m| m.start_time >= target.start_time));
        assert!(selected.iter().any(|m| m.id == target.id));
    }

    #[test]
    fn all_meetings_reaches_every_sibling() {
        let recurrence_id = Uuid::new_v4();
        let siblings: Vec<_> = [3, 10, 17]
            .into_iter()
            .map(|day| series_meeting(recurrence_id, day))
            .collect();
        let target = siblings[1].clone();

        let selected = select_scope(&siblings, &target, RecurrenceUpdateScope::AllMeetings);

        assert_eq!(selected.len(), 3);
    }

    #[test]
    fn this_meeting_only_reaches_just_the_target() {
        let recurrence_id = Uuid::new_v4();
        let siblings: Vec<_> = [3, 10, 17]
            .into_iter()
            .map(|day| series_meeting(recurrence_id, day))
            .collect();
        let target = siblings[0].clone();

        let selected = select_scope(&siblings, &target, RecurrenceUpdateScope::ThisMeetingOnly);

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, target.id);
    }
}
