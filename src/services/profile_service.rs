use crate::entities::{Currency, user_entity};
use crate::error::{AppError, AppResult};
use crate::models::{ProfileResponse, UpdateProfileRequest};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};
use uuid::Uuid;

#[derive(Clone)]
pub struct ProfileService {
    pool: DatabaseConnection,
}

impl ProfileService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Returns the caller's profile, creating a default row on first sight.
    pub async fn get_profile(
        &self,
        user_id: Uuid,
        email: Option<String>,
    ) -> AppResult<ProfileResponse> {
        if let Some(user) = user_entity::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
        {
            return Ok(user.into());
        }

        let user = self.create_default_profile(user_id, email).await?;
        Ok(user.into())
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        email: Option<String>,
        req: UpdateProfileRequest,
    ) -> AppResult<ProfileResponse> {
        let user = match user_entity::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
        {
            Some(user) => user,
            None => self.create_default_profile(user_id, email.clone()).await?,
        };

        let mut active = user.into_active_model();
        if let Some(name) = req.name {
            active.name = Set(Some(name));
        }
        if let Some(url) = req.profile_picture_url {
            active.profile_picture_url = Set(Some(url));
        }
        if let Some(checked) = req.tutorial_checked {
            active.tutorial_checked = Set(checked);
        }
        if let Some(currency) = req.currency {
            active.currency = Set(currency);
        }
        // The identity provider owns the email, keep it in sync with the token.
        if let Some(email) = email {
            active.email = Set(email);
        }
        active.updated_at = Set(Some(Utc::now()));

        let user = active.update(&self.pool).await?;
        Ok(user.into())
    }

    async fn create_default_profile(
        &self,
        user_id: Uuid,
        email: Option<String>,
    ) -> AppResult<user_entity::Model> {
        let email = email.ok_or_else(|| {
            AppError::AuthError("Token does not carry an email claim".to_string())
        })?;
        let name = email.split('@').next().map(|part| part.to_string());
        let now = Utc::now();

        let user = user_entity::ActiveModel {
            id: Set(user_id),
            email: Set(email),
            name: Set(name),
            profile_picture_url: Set(None),
            tutorial_checked: Set(false),
            currency: Set(Currency::Usd),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        }
        .insert(&self.pool)
        .await?;

        Ok(user)
    }
}
