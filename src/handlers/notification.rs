use crate::handlers::get_user_id_from_request;
use crate::models::*;
use crate::services::NotificationService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/notifications",
    tag = "notifications",
    params(
        ("unread_only" = Option<bool>, Query, description = "Only unread notifications")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Notifications, newest first", body = [NotificationResponse]),
        (status = 401, description = "Unauthorized", body = ApiError)
    )
)]
pub async fn get_notifications(
    notification_service: web::Data<NotificationService>,
    req: HttpRequest,
    query: web::Query<NotificationListQuery>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match notification_service
        .get_notifications(user_id, query.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/notifications/{id}",
    tag = "notifications",
    params(
        ("id" = Uuid, Path, description = "Notification id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Notification detail", body = NotificationResponse),
        (status = 404, description = "Notification not found", body = ApiError)
    )
)]
pub async fn get_notification(
    notification_service: web::Data<NotificationService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match notification_service
        .get_notification(user_id, path.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/notifications/{id}",
    tag = "notifications",
    params(
        ("id" = Uuid, Path, description = "Notification id")
    ),
    request_body = UpdateNotificationRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated notification", body = NotificationResponse),
        (status = 404, description = "Notification not found", body = ApiError)
    )
)]
pub async fn update_notification(
    notification_service: web::Data<NotificationService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    request: web::Json<UpdateNotificationRequest>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match notification_service
        .update_notification(user_id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/notifications/mark-read",
    tag = "notifications",
    request_body = MarkNotificationsReadRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Notifications marked as read", body = [NotificationResponse]),
        (status = 401, description = "Unauthorized", body = ApiError)
    )
)]
pub async fn mark_notifications_read(
    notification_service: web::Data<NotificationService>,
    req: HttpRequest,
    request: web::Json<MarkNotificationsReadRequest>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match notification_service
        .mark_read(user_id, request.into_inner())
        .await
    {
        Ok(resp) => {
            let message = format!("{} notifications marked as read", resp.len());
            Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp, "message": message})))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/notifications/check-membership-warnings",
    tag = "notifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Warnings raised by this check", body = [NotificationResponse]),
        (status = 401, description = "Unauthorized", body = ApiError)
    )
)]
pub async fn check_membership_warnings(
    notification_service: web::Data<NotificationService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match notification_service.check_membership_warnings(user_id).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/notifications/{id}",
    tag = "notifications",
    params(
        ("id" = Uuid, Path, description = "Notification id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Notification deleted"),
        (status = 404, description = "Notification not found", body = ApiError)
    )
)]
pub async fn delete_notification(
    notification_service: web::Data<NotificationService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match notification_service
        .delete_notification(user_id, path.into_inner())
        .await
    {
        Ok(()) => {
            Ok(HttpResponse::Ok().json(json!({"success": true, "message": "Notification deleted"})))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn notification_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notifications")
            .route("", web::get().to(get_notifications))
            .route("/mark-read", web::post().to(mark_notifications_read))
            .route(
                "/check-membership-warnings",
                web::post().to(check_membership_warnings),
            )
            .route("/{id}", web::get().to(get_notification))
            .route("/{id}", web::put().to(update_notification))
            .route("/{id}", web::delete().to(delete_notification)),
    );
}
