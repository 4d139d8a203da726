use crate::handlers::get_user_id_from_request;
use crate::models::*;
use crate::services::ClientService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/clients",
    tag = "clients",
    params(
        ("service_id" = Option<Uuid>, Query, description = "Only clients of this service")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Clients of the authenticated user", body = [ClientResponse]),
        (status = 401, description = "Unauthorized", body = ApiError)
    )
)]
pub async fn get_clients(
    client_service: web::Data<ClientService>,
    req: HttpRequest,
    query: web::Query<ClientListQuery>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match client_service.get_clients(user_id, query.into_inner()).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/clients/{id}",
    tag = "clients",
    params(
        ("id" = Uuid, Path, description = "Client id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Client detail", body = ClientResponse),
        (status = 404, description = "Client not found", body = ApiError)
    )
)]
pub async fn get_client(
    client_service: web::Data<ClientService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match client_service.get_client(user_id, path.into_inner()).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/clients",
    tag = "clients",
    request_body = CreateClientRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Created client", body = ClientResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Service not found", body = ApiError)
    )
)]
pub async fn create_client(
    client_service: web::Data<ClientService>,
    req: HttpRequest,
    request: web::Json<CreateClientRequest>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match client_service
        .create_client(user_id, request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/clients/{id}",
    tag = "clients",
    params(
        ("id" = Uuid, Path, description = "Client id")
    ),
    request_body = UpdateClientRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated client", body = ClientResponse),
        (status = 404, description = "Client not found", body = ApiError)
    )
)]
pub async fn update_client(
    client_service: web::Data<ClientService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    request: web::Json<UpdateClientRequest>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match client_service
        .update_client(user_id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/clients/{id}",
    tag = "clients",
    params(
        ("id" = Uuid, Path, description = "Client id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Client deleted"),
        (status = 404, description = "Client not found", body = ApiError)
    )
)]
pub async fn delete_client(
    client_service: web::Data<ClientService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match client_service
        .delete_client(user_id, path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({"success": true, "message": "Client deleted"}))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn client_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/clients")
            .route("", web::get().to(get_clients))
            .route("", web::post().to(create_client))
            .route("/{id}", web::get().to(get_client))
            .route("/{id}", web::put().to(update_client))
            .route("/{id}", web::delete().to(delete_client)),
    );
}
