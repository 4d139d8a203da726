use crate::entities::service_entity;
use crate::error::{AppError, AppResult};
use crate::models::{CreateServiceRequest, ServiceResponse, UpdateServiceRequest};
use crate::utils::{validate_duration_minutes, validate_price};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct ServiceService {
    pool: DatabaseConnection,
}

impl ServiceService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn get_services(&self, user_id: Uuid) -> AppResult<Vec<ServiceResponse>> {
        let services = service_entity::Entity::find()
            .filter(service_entity::Column::UserId.eq(user_id))
            .order_by_asc(service_entity::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        Ok(services.into_iter().map(ServiceResponse::from).collect())
    }

    pub async fn get_service(&self, user_id: Uuid, service_id: Uuid) -> AppResult<ServiceResponse> {
        let service = self.find_owned(user_id, service_id).await?;
        Ok(service.into())
    }

    pub async fn create_service(
        &self,
        user_id: Uuid,
        req: CreateServiceRequest,
    ) -> AppResult<ServiceResponse> {
        if req.name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Service name must not be empty".to_string(),
            ));
        }
        validate_duration_minutes(req.default_duration_minutes, "default_duration_minutes")?;
        validate_price(req.default_price_per_hour, "default_price_per_hour")?;

        let now = Utc::now();
        let service = service_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(req.name),
            default_duration_minutes: Set(req.default_duration_minutes),
            default_price_per_hour: Set(req.default_price_per_hour),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        }
        .insert(&self.pool)
        .await?;

        Ok(service.into())
    }

    pub async fn update_service(
        &self,
        user_id: Uuid,
        service_id: Uuid,
        req: UpdateServiceRequest,
    ) -> AppResult<ServiceResponse> {
        let service = self.find_owned(user_id, service_id).await?;

        let mut active = service.into_active_model();
        if let Some(name) = req.name {
            if name.trim().is_empty() {
                return Err(AppError::ValidationError(
                    "Service name must not be empty".to_string(),
                ));
            }
            active.name = Set(name);
        }
        if let Some(duration) = req.default_duration_minutes {
            validate_duration_minutes(duration, "default_duration_minutes")?;
            active.default_duration_minutes = Set(duration);
        }
        if let Some(price) = req.default_price_per_hour {
            validate_price(price, "default_price_per_hour")?;
            active.default_price_per_hour = Set(price);
        }
        active.updated_at = Set(Some(Utc::now()));

        let service = active.update(&self.pool).await?;
        Ok(service.into())
    }

    pub async fn delete_service(&self, user_id: Uuid, service_id: Uuid) -> AppResult<()> {
        let service = self.find_owned(user_id, service_id).await?;
        service_entity::Entity::delete_by_id(service.id)
            .exec(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_owned(&self, user_id: Uuid, service_id: Uuid) -> AppResult<service_entity::Model> {
        service_entity::Entity::find()
            .filter(service_entity::Column::Id.eq(service_id))
            .filter(service_entity::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Service not found".to_string()))
    }
}
