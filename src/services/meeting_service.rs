use crate::entities::{
    MeetingStatus, MembershipStatus, client_entity, meeting_entity, service_entity,
};
use crate::error::{AppError, AppResult};
use crate::models::{CreateMeetingRequest, MeetingListQuery, MeetingResponse, UpdateMeetingRequest};
use crate::services::MembershipService;
use crate::utils::{combine_date_time, meeting_price_total, validate_price};
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct MeetingService {
    pool: DatabaseConnection,
    membership_service: MembershipService,
}

impl MeetingService {
    pub fn new(pool: DatabaseConnection, membership_service: MembershipService) -> Self {
        Self {
            pool,
            membership_service,
        }
    }

    pub async fn get_meetings(
        &self,
        user_id: Uuid,
        query: MeetingListQuery,
    ) -> AppResult<Vec<MeetingResponse>> {
        let status = match query.status.as_deref() {
            Some(value) => {
                Some(MeetingStatus::try_from_value(&value.to_string()).map_err(|_| {
                    AppError::ValidationError(format!(
                        "Invalid status '{}', expected one of: upcoming, done, canceled",
                        value
                    ))
                })?)
            }
            None => None,
        };
        let date = match query.date.as_deref() {
            Some(value) => Some(NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                AppError::ValidationError(format!("Invalid date '{}', expected YYYY-MM-DD", value))
            })?),
            None => None,
        };

        let mut find = meeting_entity::Entity::find()
            .filter(meeting_entity::Column::UserId.eq(user_id));
        if let Some(status) = status {
            find = find.filter(meeting_entity::Column::Status.eq(status));
        }
        if let Some(date) = date {
            let day_start = combine_date_time(date, NaiveTime::MIN);
            let day_end = day_start + Duration::days(1);
            find = find
                .filter(meeting_entity::Column::StartTime.gte(day_start))
                .filter(meeting_entity::Column::StartTime.lt(day_end));
        }

        let meetings = find
            .order_by_asc(meeting_entity::Column::StartTime)
            .all(&self.pool)
            .await?;

        Ok(meetings.into_iter().map(MeetingResponse::from).collect())
    }

    pub async fn get_meeting(&self, user_id: Uuid, meeting_id: Uuid) -> AppResult<MeetingResponse> {
        let meeting = self.find_owned(user_id, meeting_id).await?;
        Ok(meeting.into())
    }

    pub async fn create_meeting(
        &self,
        user_id: Uuid,
        req: CreateMeetingRequest,
    ) -> AppResult<MeetingResponse> {
        if req.end_time <= req.start_time {
            return Err(AppError::ValidationError(
                "end_time must be after start_time".to_string(),
            ));
        }
        validate_price(req.price_per_hour, "price_per_hour")?;
        self.ensure_service_owned(user_id, req.service_id).await?;
        self.ensure_client_owned(user_id, req.client_id).await?;

        let status = req.status.unwrap_or(MeetingStatus::Upcoming);
        let now = Utc::now();

        let meeting = if let Some(membership_id) = req.membership_id {
            let txn = self.pool.begin().await?;
            let membership = self
                .membership_service
                .find_owned_on(&txn, user_id, membership_id)
                .await?;
            if membership.client_id != req.client_id {
                return Err(AppError::ValidationError(
                    "Membership does not belong to this client".to_string(),
                ));
            }
            if membership.status != MembershipStatus::Active {
                return Err(AppError::ValidationError(
                    "Membership is not active".to_string(),
                ));
            }

            let availability = self
                .membership_service
                .availability_for(&txn, &membership)
                .await?;
            let consumes = status != MeetingStatus::Canceled;
            if consumes && availability.available_meetings == 0 {
                return Err(AppError::AllowanceExceeded(format!(
                    "Membership '{}' has no meetings available (completed: {}, scheduled: {}, total: {})",
                    availability.membership_name,
                    availability.completed_meetings,
                    availability.scheduled_meetings,
                    availability.total_meetings
                )));
            }

            // Funded meetings bill at the membership's per-meeting rate.
            let meeting = meeting_entity::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                service_id: Set(req.service_id),
                client_id: Set(req.client_id),
                recurrence_id: Set(None),
                membership_id: Set(Some(membership.id)),
                title: Set(req.title),
                start_time: Set(req.start_time),
                end_time: Set(req.end_time),
                price_per_hour: Set(availability.price_per_meeting),
                price_total: Set(meeting_price_total(
                    availability.price_per_meeting,
                    req.start_time,
                    req.end_time,
                )),
                status: Set(status),
                paid: Set(req.paid),
                created_at: Set(Some(now)),
                updated_at: Set(Some(now)),
            }
            .insert(&txn)
            .await?;

            if consumes {
                self.membership_service
                    .stamp_start_date_on(&txn, &membership, req.start_time)
                    .await?;
            }
            txn.commit().await?;
            meeting
        } else {
            meeting_entity::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                service_id: Set(req.service_id),
                client_id: Set(req.client_id),
                recurrence_id: Set(None),
                membership_id: Set(None),
                title: Set(req.title),
                start_time: Set(req.start_time),
                end_time: Set(req.end_time),
                price_per_hour: Set(req.price_per_hour),
                price_total: Set(meeting_price_total(
                    req.price_per_hour,
                    req.start_time,
                    req.end_time,
                )),
                status: Set(status),
                paid: Set(req.paid),
                created_at: Set(Some(now)),
                updated_at: Set(Some(now)),
            }
            .insert(&self.pool)
            .await?
        };

        Ok(meeting.into())
    }

    pub async fn update_meeting(
        &self,
        user_id: Uuid,
        meeting_id: Uuid,
        req: UpdateMeetingRequest,
    ) -> AppResult<MeetingResponse> {
        let meeting = self.find_owned(user_id, meeting_id).await?;

        if let Some(client_id) = req.client_id
            && client_id != meeting.client_id
        {
            if meeting.membership_id.is_some() {
                return Err(AppError::ValidationError(
                    "Cannot change the client of a membership-funded meeting".to_string(),
                ));
            }
            self.ensure_client_owned(user_id, client_id).await?;
        }
        if let Some(service_id) = req.service_id
            && service_id != meeting.service_id
        {
            self.ensure_service_owned(user_id, service_id).await?;
        }

        let start_time = req.start_time.unwrap_or(meeting.start_time);
        let end_time = req.end_time.unwrap_or(meeting.end_time);
        if end_time <= start_time {
            return Err(AppError::ValidationError(
                "end_time must be after start_time".to_string(),
            ));
        }
        let price_per_hour = req.price_per_hour.unwrap_or(meeting.price_per_hour);
        validate_price(price_per_hour, "price_per_hour")?;

        let old_status = meeting.status.clone();
        let new_status = req.status.clone().unwrap_or_else(|| old_status.clone());
        let membership_id = meeting.membership_id;
        let reactivates = membership_id.is_some()
            && old_status == MeetingStatus::Canceled
            && new_status != MeetingStatus::Canceled;

        let price_total = meeting_price_total(price_per_hour, start_time, end_time);

        let txn = self.pool.begin().await?;
        // A canceled meeting gave its spot back; taking it again has to fit
        // the remaining allowance.
        if reactivates && let Some(membership_id) = membership_id {
            let membership = self
                .membership_service
                .find_owned_on(&txn, user_id, membership_id)
                .await?;
            let availability = self
                .membership_service
                .availability_for(&txn, &membership)
                .await?;
            if availability.available_meetings == 0 {
                return Err(AppError::AllowanceExceeded(format!(
                    "Membership '{}' has no meetings available (completed: {}, scheduled: {}, total: {})",
                    availability.membership_name,
                    availability.completed_meetings,
                    availability.scheduled_meetings,
                    availability.total_meetings
                )));
            }
            self.membership_service
                .stamp_start_date_on(&txn, &membership, start_time)
                .await?;
        }

        let mut active = meeting.into_active_model();
        if let Some(service_id) = req.service_id {
            active.service_id = Set(service_id);
        }
        if let Some(client_id) = req.client_id {
            active.client_id = Set(client_id);
        }
        if let Some(title) = req.title {
            active.title = Set(Some(title));
        }
        active.start_time = Set(start_time);
        active.end_time = Set(end_time);
        active.price_per_hour = Set(price_per_hour);
        active.price_total = Set(price_total);
        active.status = Set(new_status);
        if let Some(paid) = req.paid {
            active.paid = Set(paid);
        }
        active.updated_at = Set(Some(Utc::now()));

        let meeting = active.update(&txn).await?;
        txn.commit().await?;

        Ok(meeting.into())
    }

    pub async fn delete_meeting(&self, user_id: Uuid, meeting_id: Uuid) -> AppResult<()> {
        let meeting = self.find_owned(user_id, meeting_id).await?;
        meeting_entity::Entity::delete_by_id(meeting.id)
            .exec(&self.pool)
            .await?;
        Ok(())
    }

    /// Rolls upcoming meetings whose end time has passed over to done.
    /// Returns how many were completed.
    pub async fn complete_elapsed_meetings(&self) -> AppResult<u64> {
        let now = Utc::now();
        let elapsed = meeting_entity::Entity::find()
            .filter(meeting_entity::Column::Status.eq(MeetingStatus::Upcoming))
            .filter(meeting_entity::Column::EndTime.lt(now))
            .all(&self.pool)
            .await?;

        let mut completed = 0u64;
        for meeting in elapsed {
            let mut active = meeting.into_active_model();
            active.status = Set(MeetingStatus::Done);
            active.updated_at = Set(Some(now));
            active.update(&self.pool).await?;
            completed += 1;
        }
        Ok(completed)
    }

    async fn find_owned(&self, user_id: Uuid, meeting_id: Uuid) -> AppResult<meeting_entity::Model> {
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
