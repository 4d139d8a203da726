use crate::error::{AppError, AppResult};
use crate::handlers::get_user_id_from_request;
use crate::models::*;
use crate::services::RecurrenceService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

fn parse_scope(value: Option<&str>, param: &str) -> AppResult<RecurrenceUpdateScope> {
    match value {
        Some(value) => RecurrenceUpdateScope::parse(value),
        None => Err(AppError::ValidationError(format!("{} is required", param))),
    }
}

#[utoipa::path(
    get,
    path = "/recurrences",
    tag = "recurrences",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Recurrence patterns of the authenticated user", body = [RecurrenceResponse]),
        (status = 401, description = "Unauthorized", body = ApiError)
    )
)]
pub async fn get_recurrences(
    recurrence_service: web::Data<RecurrenceService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match recurrence_service.get_recurrences(user_id).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/recurrences/{id}",
    tag = "recurrences",
    params(
        ("id" = Uuid, Path, description = "Recurrence id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Recurrence detail", body = RecurrenceResponse),
        (status = 404, description = "Recurrence not found", body = ApiError)
    )
)]
pub async fn get_recurrence(
    recurrence_service: web::Data<RecurrenceService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match recurrence_service
        .get_recurrence(user_id, path.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/recurrences/{id}/meetings",
    tag = "recurrences",
    params(
        ("id" = Uuid, Path, description = "Recurrence id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Meetings generated from this recurrence", body = [MeetingResponse]),
        (status = 404, description = "Recurrence not found", body = ApiError)
    )
)]
pub async fn get_recurrence_meetings(
    recurrence_service: web::Data<RecurrenceService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match recurrence_service
        .get_recurrence_meetings(user_id, path.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/recurrences",
    tag = "recurrences",
    request_body = CreateRecurrenceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Created pattern and its meetings", body = CreateRecurrenceResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Service or client not found", body = ApiError)
    )
)]
pub async fn create_recurrence(
    recurrence_service: web::Data<RecurrenceService>,
    req: HttpRequest,
    request: web::Json<CreateRecurrenceRequest>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match recurrence_service
        .create_recurrence(user_id, request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/recurrences/{id}",
    tag = "recurrences",
    params(
        ("id" = Uuid, Path, description = "Recurrence id")
    ),
    request_body = UpdateRecurrenceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated pattern; existing meetings are untouched", body = RecurrenceResponse),
        (status = 404, description = "Recurrence not found", body = ApiError)
    )
)]
pub async fn update_recurrence(
    recurrence_service: web::Data<RecurrenceService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    request: web::Json<UpdateRecurrenceRequest>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match recurrence_service
        .update_recurrence(user_id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/recurrences/{id}",
    tag = "recurrences",
    params(
        ("id" = Uuid, Path, description = "Recurrence id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Pattern and its meetings deleted", body = ScopedDeleteResponse),
        (status = 404, description = "Recurrence not found", body = ApiError)
    )
)]
pub async fn delete_recurrence(
    recurrence_service: web::Data<RecurrenceService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match recurrence_service
        .delete_recurrence(user_id, path.into_inner())
        .await
    {
        Ok(deleted) => Ok(HttpResponse::Ok()
            .json(json!({"success": true, "data": ScopedDeleteResponse { deleted }}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/recurrences/meetings/{meeting_id}",
    tag = "recurrences",
    params(
        ("meeting_id" = Uuid, Path, description = "Series meeting id"),
        ("update_scope" = String, Query, description = "this_meeting_only, this_and_future or all_meetings")
    ),
    request_body = UpdateMeetingRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Meetings touched by the scoped edit", body = [MeetingResponse]),
        (status = 400, description = "Invalid scope or series-wide field", body = ApiError),
        (status = 404, description = "Meeting not found", body = ApiError),
        (status = 409, description = "Membership allowance exhausted", body = ApiError)
    )
)]
pub async fn update_meeting_scoped(
    recurrence_service: web::Data<RecurrenceService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    query: web::Query<ScopedUpdateQuery>,
    request: web::Json<UpdateMeetingRequest>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    let scope = match parse_scope(query.update_scope.as_deref(), "update_scope") {
        Ok(scope) => scope,
        Err(e) => return Ok(e.error_response()),
    };
    match recurrence_service
        .update_meeting_scoped(user_id, path.into_inner(), scope, request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/recurrences/meetings/{meeting_id}",
    tag = "recurrences",
    params(
        ("meeting_id" = Uuid, Path, description = "Series meeting id"),
        ("delete_scope" = String, Query, description = "this_meeting_only, this_and_future or all_meetings")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Number of meetings removed", body = ScopedDeleteResponse),
        (status = 400, description = "Invalid scope", body = ApiError),
        (status = 404, description = "Meeting not found", body = ApiError)
    )
)]
pub async fn delete_meetings_scoped(
    recurrence_service: web::Data<RecurrenceService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    query: web::Query<ScopedDeleteQuery>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    let scope = match parse_scope(query.delete_scope.as_deref(), "delete_scope") {
        Ok(scope) => scope,
        Err(e) => return Ok(e.error_response()),
    };
    match recurrence_service
        .delete_meetings_scoped(user_id, path.into_inner(), scope)
        .await
    {
        Ok(deleted) => Ok(HttpResponse::Ok()
            .json(json!({"success": true, "data": ScopedDeleteResponse { deleted }}))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn recurrence_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/recurrences")
            .route("", web::get().to(get_recurrences))
            .route("", web::post().to(create_recurrence))
            .route("/meetings/{meeting_id}", web::put().to(update_meeting_scoped))
            .route(
                "/meetings/{meeting_id}",
                web::delete().to(delete_meetings_scoped),
            )
            .route("/{id}", web::get().to(get_recurrence))
            .route("/{id}", web::put().to(update_recurrence))
            .route("/{id}", web::delete().to(delete_recurrence))
            .route("/{id}/meetings", web::get().to(get_recurrence_meetings)),
    );
}
