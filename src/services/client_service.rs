use crate::entities::{client_entity, service_entity};
use crate::error::{AppError, AppResult};
use crate::models::{ClientListQuery, ClientResponse, CreateClientRequest, UpdateClientRequest};
use crate::utils::{validate_duration_minutes, validate_email, validate_price};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct ClientService {
    pool: DatabaseConnection,
}

impl ClientService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn get_clients(
        &self,
        user_id: Uuid,
        query: ClientListQuery,
    ) -> AppResult<Vec<ClientResponse>> {
        let mut find = client_entity::Entity::find()
            .filter(client_entity::Column::UserId.eq(user_id));
        if let Some(service_id) = query.service_id {
            find = find.filter(client_entity::Column::ServiceId.eq(service_id));
        }

        let clients = find
            .order_by_asc(client_entity::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        Ok(clients.into_iter().map(ClientResponse::from).collect())
    }

    pub async fn get_client(&self, user_id: Uuid, client_id: Uuid) -> AppResult<ClientResponse> {
        let client = self.find_owned(user_id, client_id).await?;
        Ok(client.into())
    }

    pub async fn create_client(
        &self,
        user_id: Uuid,
        req: CreateClientRequest,
    ) -> AppResult<ClientResponse> {
        if req.name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Client name must not be empty".to_string(),
            ));
        }
        if let Some(email) = req.email.as_deref()
            && !email.is_empty()
        {
            validate_email(email)?;
        }
        if let Some(duration) = req.custom_duration_minutes {
            validate_duration_minutes(duration, "custom_duration_minutes")?;
        }
        if let Some(price) = req.custom_price_per_hour {
            validate_price(price, "custom_price_per_hour")?;
        }
        self.ensure_service_owned(user_id, req.service_id).await?;

        let now = Utc::now();
        let client = client_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            service_id: Set(req.service_id),
            name: Set(req.name),
            email: Set(req.email.filter(|e| !e.is_empty())),
            phone: Set(req.phone.filter(|p| !p.is_empty())),
            custom_duration_minutes: Set(req.custom_duration_minutes),
            custom_price_per_hour: Set(req.custom_price_per_hour),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        }
        .insert(&self.pool)
        .await?;

        Ok(client.into())
    }

    pub async fn update_client(
        &self,
        user_id: Uuid,
        client_id: Uuid,
        req: UpdateClientRequest,
    ) -> AppResult<ClientResponse> {
        let client = self.find_owned(user_id, client_id).await?;

        let mut active = client.into_active_model();
        if let Some(service_id) = req.service_id {
            self.ensure_service_owned(user_id, service_id).await?;
            active.service_id = Set(service_id);
        }
        if let Some(name) = req.name {
            if name.trim().is_empty() {
                return Err(AppError::ValidationError(
                    "Client name must not be empty".to_string(),
                ));
            }
            active.name = Set(name);
        }
        // An empty string clears the optional contact fields.
        if let Some(email) = req.email {
            if email.is_empty() {
                active.email = Set(None);
            } else {
                validate_email(&email)?;
                active.email = Set(Some(email));
            }
        }
        if let Some(phone) = req.phone {
            active.phone = Set(if phone.is_empty() { None } else { Some(phone) });
        }
        if let Some(duration) = req.custom_duration_minutes {
            validate_duration_minutes(duration, "custom_duration_minutes")?;
            active.custom_duration_minutes = Set(Some(duration));
        }
        if let Some(price) = req.custom_price_per_hour {
            validate_price(price, "custom_price_per_hour")?;
            active.custom_price_per_hour = Set(Some(price));
        }
        active.updated_at = Set(Some(Utc::now()));

        let client = active.update(&self.pool).await?;
        Ok(client.into())
    }

    pub async fn delete_client(&self, user_id: Uuid, client_id: Uuid) -> AppResult<()> {
        let client = self.find_owned(user_id, client_id).await?;
        client_entity::Entity::delete_by_id(client.id)
            .exec(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_owned(&self, user_id: Uuid, client_id: Uuid) -> AppResult<client_entity::Model> {
        client_entity::Entity::find()
            .filter(client_entity::Column::Id.eq(client_id))
            .filter(client_entity::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found".to_string()))
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
}
