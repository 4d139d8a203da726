use crate::entities::{
    MeetingStatus, MembershipStatus, NotificationType, client_entity, meeting_entity,
    membership_entity, service_entity,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateMembershipRequest, MeetingResponse, MembershipAvailability, MembershipProgressResponse,
    MembershipResponse, SetMembershipStartDateRequest, UpdateMembershipRequest,
    membership_price_per_meeting,
};
use crate::services::NotificationService;
use crate::utils::validate_price;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct MembershipService {
    pool: DatabaseConnection,
    notification_service: NotificationService,
}

impl MembershipService {
    pub fn new(pool: DatabaseConnection, notification_service: NotificationService) -> Self {
        Self {
            pool,
            notification_service,
        }
    }

    pub async fn get_memberships(&self, user_id: Uuid) -> AppResult<Vec<MembershipResponse>> {
        let memberships = membership_entity::Entity::find()
            .filter(membership_entity::Column::UserId.eq(user_id))
            .order_by_desc(membership_entity::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        Ok(memberships
            .into_iter()
            .map(MembershipResponse::from)
            .collect())
    }

    pub async fn get_membership(
        &self,
        user_id: Uuid,
        membership_id: Uuid,
    ) -> AppResult<MembershipResponse> {
        let membership = self.find_owned(user_id, membership_id).await?;
        Ok(membership.into())
    }

    pub async fn create_membership(
        &self,
        user_id: Uuid,
        req: CreateMembershipRequest,
    ) -> AppResult<MembershipResponse> {
        if req.name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Membership name must not be empty".to_string(),
            ));
        }
        if req.total_meetings <= 0 {
            return Err(AppError::ValidationError(
                "total_meetings must be greater than zero".to_string(),
            ));
        }
        if req.availability_days <= 0 {
            return Err(AppError::ValidationError(
                "availability_days must be greater than zero".to_string(),
            ));
        }
        validate_price(req.price_per_membership, "price_per_membership")?;

        service_entity::Entity::find()
            .filter(service_entity::Column::Id.eq(req.service_id))
            .filter(service_entity::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;
        client_entity::Entity::find()
            .filter(client_entity::Column::Id.eq(req.client_id))
            .filter(client_entity::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;

        self.ensure_no_active_membership(user_id, req.client_id, None)
            .await?;

        let now = Utc::now();
        let membership = membership_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            service_id: Set(req.service_id),
            client_id: Set(req.client_id),
            name: Set(req.name),
            total_meetings: Set(req.total_meetings),
            price_per_membership: Set(req.price_per_membership),
            availability_days: Set(req.availability_days),
            status: Set(MembershipStatus::Active),
            paid: Set(req.paid),
            start_date: Set(None),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        }
        .insert(&self.pool)
        .await?;

        Ok(membership.into())
    }

    pub async fn update_membership(
        &self,
        user_id: Uuid,
        membership_id: Uuid,
        req: UpdateMembershipRequest,
    ) -> AppResult<MembershipResponse> {
        let membership = self.find_owned(user_id, membership_id).await?;
        let was_active = membership.status == MembershipStatus::Active;
        let client_id = membership.client_id;

        let mut active = membership.into_active_model();
        if let Some(name) = req.name {
            if name.trim().is_empty() {
                return Err(AppError::ValidationError(
                    "Membership name must not be empty".to_string(),
                ));
            }
            active.name = Set(name);
        }
        if let Some(total) = req.total_meetings {
            if total <= 0 {
                return Err(AppError::ValidationError(
                    "total_meetings must be greater than zero".to_string(),
                ));
            }
            active.total_meetings = Set(total);
        }
        if let Some(price) = req.price_per_membership {
            validate_price(price, "price_per_membership")?;
            active.price_per_membership = Set(price);
        }
        if let Some(days) = req.availability_days {
            if days <= 0 {
                return Err(AppError::ValidationError(
                    "availability_days must be greater than zero".to_string(),
                ));
            }
            active.availability_days = Set(days);
        }
        if let Some(status) = req.status {
            if status == MembershipStatus::Active && !was_active {
                self.ensure_no_active_membership(user_id, client_id, Some(membership_id))
                    .await?;
            }
            active.status = Set(status);
        }
        if let Some(paid) = req.paid {
            active.paid = Set(paid);
        }
        active.updated_at = Set(Some(Utc::now()));

        let membership = active.update(&self.pool).await?;
        Ok(membership.into())
    }

    /// Delete is a soft cancel; linked meetings keep their history.
    pub async fn delete_membership(
        &self,
        user_id: Uuid,
        membership_id: Uuid,
    ) -> AppResult<MembershipResponse> {
        let membership = self.find_owned(user_id, membership_id).await?;

        let mut active = membership.into_active_model();
        active.status = Set(MembershipStatus::Canceled);
        active.updated_at = Set(Some(Utc::now()));

        let membership = active.update(&self.pool).await?;
        Ok(membership.into())
    }

    pub async fn get_active_membership(
        &self,
        user_id: Uuid,
        client_id: Uuid,
    ) -> AppResult<Option<MembershipResponse>> {
        let membership = membership_entity::Entity::find()
            .filter(membership_entity::Column::UserId.eq(user_id))
            .filter(membership_entity::Column::ClientId.eq(client_id))
            .filter(membership_entity::Column::Status.eq(MembershipStatus::Active))
            .one(&self.pool)
            .await?;

        Ok(membership.map(MembershipResponse::from))
    }

    /// The client's active membership, only when it still has spots left.
    pub async fn get_available_membership(
        &self,
        user_id: Uuid,
        client_id: Uuid,
    ) -> AppResult<Option<MembershipResponse>> {
        let found = self
            .find_available_membership(&self.pool, user_id, client_id)
            .await?;
        Ok(found.map(|(membership, _)| membership.into()))
    }

    /// Looks up an active membership for the client that still has room
    /// for at least one more meeting.
    pub async fn find_available_membership<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: Uuid,
        client_id: Uuid,
    ) -> AppResult<Option<(membership_entity::Model, MembershipAvailability)>> {
        let memberships = membership_entity::Entity::find()
            .filter(membership_entity::Column::UserId.eq(user_id))
            .filter(membership_entity::Column::ClientId.eq(client_id))
            .filter(membership_entity::Column::Status.eq(MembershipStatus::Active))
            .order_by_asc(membership_entity::Column::CreatedAt)
            .all(db)
            .await?;

        for membership in memberships {
            let availability = self.availability_for(db, &membership).await?;
            if availability.available_meetings > 0 {
                return Ok(Some((membership, availability)));
            }
        }
        Ok(None)
    }

    /// Live allowance: upcoming and done meetings both consume a spot,
    /// canceled ones give it back.
    pub async fn availability_for<C: ConnectionTrait>(
        &self,
        db: &C,
        membership: &membership_entity::Model,
    ) -> AppResult<MembershipAvailability> {
        let scheduled = meeting_entity::Entity::find()
            .filter(meeting_entity::Column::MembershipId.eq(membership.id))
            .filter(meeting_entity::Column::Status.eq(MeetingStatus::Upcoming))
            .count(db)
            .await?;
        let completed = meeting_entity::Entity::find()
            .filter(meeting_entity::Column::MembershipId.eq(membership.id))
            .filter(meeting_entity::Column::Status.eq(MeetingStatus::Done))
            .count(db)
            .await?;

        let available =
            (membership.total_meetings as i64 - completed as i64 - scheduled as i64).max(0) as u64;

        Ok(MembershipAvailability {
            membership_id: membership.id,
            membership_name: membership.name.clone(),
            price_per_meeting: membership_price_per_meeting(
                membership.price_per_membership,
                membership.total_meetings,
            ),
            total_meetings: membership.total_meetings,
            completed_meetings: completed,
            scheduled_meetings: scheduled,
            available_meetings: available,
        })
    }

    pub async fn get_progress(
        &self,
        user_id: Uuid,
        membership_id: Uuid,
    ) -> AppResult<MembershipProgressResponse> {
        let membership = self.find_owned(user_id, membership_id).await?;
        let completed = meeting_entity::Entity::find()
            .filter(meeting_entity::Column::MembershipId.eq(membership.id))
            .filter(meeting_entity::Column::Status.eq(MeetingStatus::Done))
            .count(&self.pool)
            .await?;
        let remaining = (membership.total_meetings as i64 - completed as i64).max(0) as u64;

        Ok(MembershipProgressResponse {
            membership_id: membership.id,
            total_meetings: membership.total_meetings,
            completed_meetings: completed,
            remaining_meetings: remaining,
        })
    }

    pub async fn get_membership_meetings(
        &self,
        user_id: Uuid,
        membership_id: Uuid,
    ) -> AppResult<Vec<MeetingResponse>> {
        let membership = self.find_owned(user_id, membership_id).await?;
        let meetings = meeting_entity::Entity::find()
            .filter(meeting_entity::Column::MembershipId.eq(membership.id))
            .order_by_asc(meeting_entity::Column::StartTime)
            .all(&self.pool)
            .await?;

        Ok(meetings.into_iter().map(MeetingResponse::from).collect())
    }

    /// Explicitly anchors the validity window. A membership that already
    /// started keeps its original date.
    pub async fn set_start_date(
        &self,
        user_id: Uuid,
        membership_id: Uuid,
        req: SetMembershipStartDateRequest,
    ) -> AppResult<MembershipResponse> {
        let membership = self.find_owned(user_id, membership_id).await?;
        if membership.start_date.is_some() {
            return Ok(membership.into());
        }

        let mut active = membership.into_active_model();
        active.start_date = Set(Some(req.start_date));
        active.updated_at = Set(Some(Utc::now()));

        let membership = active.update(&self.pool).await?;
        Ok(membership.into())
    }

    /// Stamps the validity window on first consumption.
    pub async fn stamp_start_date_on<C: ConnectionTrait>(
        &self,
        db: &C,
        membership: &membership_entity::Model,
        when: DateTime<Utc>,
    ) -> AppResult<()> {
        if membership.start_date.is_some() {
            return Ok(());
        }

        let mut active = membership.clone().into_active_model();
        active.start_date = Set(Some(when));
        active.updated_at = Set(Some(Utc::now()));
        active.update(db).await?;
        Ok(())
    }

    /// Expires active memberships whose validity window has run out or
    /// whose meetings are used up, notifying the owner. Returns how many
    /// were expired.
    pub async fn expire_due_memberships(&self) -> AppResult<u64> {
        let memberships = membership_entity::Entity::find()
            .filter(membership_entity::Column::Status.eq(MembershipStatus::Active))
            .all(&self.pool)
            .await?;

        let now = Utc::now();
        let mut expired = 0u64;
        for membership in memberships {
            let out_of_time = membership.start_date.is_some_and(|start| {
                start + Duration::days(membership.availability_days as i64) < now
            });
            let completed = meeting_entity::Entity::find()
                .filter(meeting_entity::Column::MembershipId.eq(membership.id))
                .filter(meeting_entity::Column::Status.eq(MeetingStatus::Done))
                .count(&self.pool)
                .await?;
            let out_of_meetings = completed as i64 >= membership.total_meetings as i64;
            if !out_of_time && !out_of_meetings {
                continue;
            }

            let membership_id = membership.id;
            let owner_id = membership.user_id;
            let client_id = membership.client_id;
            let name = membership.name.clone();

            let mut active = membership.into_active_model();
            active.status = Set(MembershipStatus::Expired);
            active.updated_at = Set(Some(now));
            active.update(&self.pool).await?;
            expired += 1;

            let client_name = client_entity::Entity::find_by_id(client_id)
                .one(&self.pool)
                .await?
                .map(|c| c.name)
                .unwrap_or_else(|| "this client".to_string());
            self.notification_service
                .create_notification(
                    owner_id,
                    NotificationType::MembershipExpired,
                    "Membership Expired".to_string(),
                    format!("'{}' for {} has expired.", name, client_name),
                    Some(membership_id),
                    Some("membership".to_string()),
                )
                .await?;
        }

        Ok(expired)
    }

    /// Distinct owners of at least one active membership. Drives the warning
    /// sweep so users without memberships are never scanned.
    pub async fn active_membership_user_ids(&self) -> AppResult<Vec<Uuid>> {
        let memberships = membership_entity::Entity::find()
            .filter(membership_entity::Column::Status.eq(MembershipStatus::Active))
            .all(&self.pool)
            .await?;

        let mut user_ids: Vec<Uuid> = memberships.into_iter().map(|m| m.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();
        Ok(user_ids)
    }

    pub async fn find_owned_on<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: Uuid,
        membership_id: Uuid,
    ) -> AppResult<membership_entity::Model> {
        membership_entity::Entity::find()
            .filter(membership_entity::Column::Id.eq(membership_id))
            .filter(membership_entity::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Membership not found".to_string()))
    }

    async fn find_owned(
        &self,
        user_id: Uuid,
        membership_id: Uuid,
    ) -> AppResult<membership_entity::Model> {
        self.find_owned_on(&self.pool, user_id, membership_id).await
    }

    async fn ensure_no_active_membership(
        &self,
        user_id: Uuid,
        client_id: Uuid,
        exclude: Option<Uuid>,
    ) -> AppResult<()> {
        let mut find = membership_entity::Entity::find()
            .filter(membership_entity::Column::UserId.eq(user_id))
            .filter(membership_entity::Column::ClientId.eq(client_id))
            .filter(membership_entity::Column::Status.eq(MembershipStatus::Active));
        if let Some(exclude_id) = exclude {
            find = find.filter(membership_entity::Column::Id.ne(exclude_id));
        }

        if find.count(&self.pool).await? > 0 {
            return Err(AppError::ValidationError(
                "Client already has an active membership".to_string(),
            ));
        }
        Ok(())
    }
}
