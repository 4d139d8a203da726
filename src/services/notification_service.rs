use crate::entities::{
    MeetingStatus, MembershipStatus, NotificationType, client_entity, meeting_entity,
    membership_entity, notification_entity,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    MarkNotificationsReadRequest, NotificationListQuery, NotificationResponse,
    UpdateNotificationRequest,
};
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct NotificationService {
    pool: DatabaseConnection,
    expiry_warning_days: i64,
}

impl NotificationService {
    pub fn new(pool: DatabaseConnection, expiry_warning_days: i64) -> Self {
        Self {
            pool,
            expiry_warning_days,
        }
    }

    pub async fn get_notifications(
        &self,
        user_id: Uuid,
        query: NotificationListQuery,
    ) -> AppResult<Vec<NotificationResponse>> {
        let mut find = notification_entity::Entity::find()
            .filter(notification_entity::Column::UserId.eq(user_id));
        if query.unread_only.unwrap_or(false) {
            find = find.filter(notification_entity::Column::Read.eq(false));
        }

        let notifications = find
            .order_by_desc(notification_entity::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        Ok(notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect())
    }

    pub async fn get_notification(
        &self,
        user_id: Uuid,
        notification_id: Uuid,
    ) -> AppResult<NotificationResponse> {
        let notification = self.find_owned(user_id, notification_id).await?;
        Ok(notification.into())
    }

    pub async fn update_notification(
        &self,
        user_id: Uuid,
        notification_id: Uuid,
        req: UpdateNotificationRequest,
    ) -> AppResult<NotificationResponse> {
        let notification = self.find_owned(user_id, notification_id).await?;

        let mut active = notification.into_active_model();
        if let Some(read) = req.read {
            active.read = Set(read);
            active.read_at = Set(if read { Some(Utc::now()) } else { None });
        }
        active.updated_at = Set(Some(Utc::now()));

        let notification = active.update(&self.pool).await?;
        Ok(notification.into())
    }

    pub async fn mark_read(
        &self,
        user_id: Uuid,
        req: MarkNotificationsReadRequest,
    ) -> AppResult<Vec<NotificationResponse>> {
        let notifications = notification_entity::Entity::find()
            .filter(notification_entity::Column::UserId.eq(user_id))
            .filter(notification_entity::Column::Id.is_in(req.notification_ids))
            .all(&self.pool)
            .await?;

        let now = Utc::now();
        let mut updated = Vec::with_capacity(notifications.len());
        for notification in notifications {
            let mut active = notification.into_active_model();
            active.read = Set(true);
            active.read_at = Set(Some(now));
            active.updated_at = Set(Some(now));
            updated.push(active.update(&self.pool).await?.into());
        }

        Ok(updated)
    }

    pub async fn delete_notification(&self, user_id: Uuid, notification_id: Uuid) -> AppResult<()> {
        let notification = self.find_owned(user_id, notification_id).await?;
        notification_entity::Entity::delete_by_id(notification.id)
            .exec(&self.pool)
            .await?;
        Ok(())
    }

    /// Creates a notification unless an unread one for the same entity and
    /// kind already exists, in which case the existing row is returned.
    pub async fn create_notification(
        &self,
        user_id: Uuid,
        notification_type: NotificationType,
        title: String,
        message: String,
        related_entity_id: Option<Uuid>,
        related_entity_type: Option<String>,
    ) -> AppResult<NotificationResponse> {
        if let Some(related_id) = related_entity_id {
            let existing = notification_entity::Entity::find()
                .filter(notification_entity::Column::UserId.eq(user_id))
                .filter(
                    notification_entity::Column::NotificationType.eq(notification_type.clone()),
                )
                .filter(notification_entity::Column::RelatedEntityId.eq(related_id))
                .filter(notification_entity::Column::Read.eq(false))
                .one(&self.pool)
                .await?;
            if let Some(existing) = existing {
                return Ok(existing.into());
            }
        }

        let now = Utc::now();
        let notification = notification_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            notification_type: Set(notification_type),
            title: Set(title),
            message: Set(message),
            related_entity_id: Set(related_entity_id),
            related_entity_type: Set(related_entity_type),
            read: Set(false),
            read_at: Set(None),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        }
        .insert(&self.pool)
        .await?;

        Ok(notification.into())
    }

    /// Scans the user's active memberships and raises an expiring warning
    /// for any that are nearly out of meetings or close to their end date.
    pub async fn check_membership_warnings(
        &self,
        user_id: Uuid,
    ) -> AppResult<Vec<NotificationResponse>> {
        let memberships = membership_entity::Entity::find()
            .filter(membership_entity::Column::UserId.eq(user_id))
            .filter(membership_entity::Column::Status.eq(MembershipStatus::Active))
            .all(&self.pool)
            .await?;

        let now = Utc::now();
        let mut created = Vec::new();
        for membership in memberships {
            let client_name = client_entity::Entity::find_by_id(membership.client_id)
                .one(&self.pool)
                .await?
                .map(|c| c.name)
                .unwrap_or_else(|| "this client".to_string());

            let completed = meeting_entity::Entity::find()
                .filter(meeting_entity::Column::MembershipId.eq(membership.id))
                .filter(meeting_entity::Column::Status.eq(MeetingStatus::Done))
                .count(&self.pool)
                .await?;
            let remaining = (membership.total_meetings as i64 - completed as i64).max(0);

            let days_until_expiry = membership.start_date.map(|start| {
                let expires_at = start + Duration::days(membership.availability_days as i64);
                (expires_at - now).num_days()
            });

            let message = if remaining == 1 {
                Some(format!(
                    "'{}' for {} has only 1 meeting remaining.",
                    membership.name, client_name
                ))
            } else if let Some(days) = days_until_expiry
                && (0..=self.expiry_warning_days).contains(&days)
            {
                Some(format!(
                    "'{}' for {} expires in {} days.",
                    membership.name, client_name, days
                ))
            } else {
                None
            };

            let Some(message) = message else { continue };
            if self
                .recently_notified(user_id, NotificationType::MembershipExpiring, membership.id)
                .await?
            {
                continue;
            }

            let notification = self
                .create_notification(
                    user_id,
                    NotificationType::MembershipExpiring,
                    "Membership Expiring Soon".to_string(),
                    message,
                    Some(membership.id),
                    Some("membership".to_string()),
                )
                .await?;
            created.push(notification);
        }

        Ok(created)
    }

    // At most one warning per membership per day, read or not.
    async fn recently_notified(
        &self,
        user_id: Uuid,
        notification_type: NotificationType,
        related_entity_id: Uuid,
    ) -> AppResult<bool> {
        let cutoff = Utc::now() - Duration::days(1);
        let count = notification_entity::Entity::find()
            .filter(notification_entity::Column::UserId.eq(user_id))
            .filter(notification_entity::Column::NotificationType.eq(notification_type))
            .filter(notification_entity::Column::RelatedEntityId.eq(related_entity_id))
            .filter(notification_entity::Column::CreatedAt.gte(cutoff))
            .count(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn find_owned(
        &self,
        user_id: Uuid,
        notification_id: Uuid,
    ) -> AppResult<notification_entity::Model> {
        notification_entity::Entity::find()
            .filter(notification_entity::Column::Id.eq(notification_id))
            .filter(notification_entity::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))
    }
}
