use crate::handlers::get_user_id_from_request;
use crate::models::*;
use crate::services::ServiceService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/services",
    tag = "services",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Services of the authenticated user", body = [ServiceResponse]),
        (status = 401, description = "Unauthorized", body = ApiError)
    )
)]
pub async fn get_services(
    service_service: web::Data<ServiceService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match service_service.get_services(user_id).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/services/{id}",
    tag = "services",
    params(
        ("id" = Uuid, Path, description = "Service id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Service detail", body = ServiceResponse),
        (status = 404, description = "Service not found", body = ApiError)
    )
)]
pub async fn get_service(
    service_service: web::Data<ServiceService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match service_service
        .get_service(user_id, path.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/services",
    tag = "services",
    request_body = CreateServiceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Created service", body = ServiceResponse),
        (status = 400, description = "Invalid request", body = ApiError)
    )
)]
pub async fn create_service(
    service_service: web::Data<ServiceService>,
    req: HttpRequest,
    request: web::Json<CreateServiceRequest>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match service_service
        .create_service(user_id, request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/services/{id}",
    tag = "services",
    params(
        ("id" = Uuid, Path, description = "Service id")
    ),
    request_body = UpdateServiceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated service", body = ServiceResponse),
        (status = 404, description = "Service not found", body = ApiError)
    )
)]
pub async fn update_service(
    service_service: web::Data<ServiceService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    request: web::Json<UpdateServiceRequest>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match service_service
        .update_service(user_id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/services/{id}",
    tag = "services",
    params(
        ("id" = Uuid, Path, description = "Service id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Service deleted"),
        (status = 404, description = "Service not found", body = ApiError)
    )
)]
pub async fn delete_service(
    service_service: web::Data<ServiceService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match service_service
        .delete_service(user_id, path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({"success": true, "message": "Service deleted"}))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn service_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/services")
            .route("", web::get().to(get_services))
            .route("", web::post().to(create_service))
            .route("/{id}", web::get().to(get_service))
            .route("/{id}", web::put().to(update_service))
            .route("/{id}", web::delete().to(delete_service)),
    );
}
