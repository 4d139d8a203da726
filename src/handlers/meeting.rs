use crate::handlers::get_user_id_from_request;
use crate::models::*;
use crate::services::MeetingService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/meetings",
    tag = "meetings",
    params(
        ("status" = Option<String>, Query, description = "Filter by status: upcoming, done or canceled"),
        ("date" = Option<String>, Query, description = "Only meetings starting on this UTC day, YYYY-MM-DD")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Meetings of the authenticated user", body = [MeetingResponse]),
        (status = 400, description = "Invalid filter", body = ApiError)
    )
)]
pub async fn get_meetings(
    meeting_service: web::Data<MeetingService>,
    req: HttpRequest,
    query: web::Query<MeetingListQuery>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match meeting_service
        .get_meetings(user_id, query.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/meetings/{id}",
    tag = "meetings",
    params(
        ("id" = Uuid, Path, description = "Meeting id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Meeting detail", body = MeetingResponse),
        (status = 404, description = "Meeting not found", body = ApiError)
    )
)]
pub async fn get_meeting(
    meeting_service: web::Data<MeetingService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match meeting_service.get_meeting(user_id, path.into_inner()).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/meetings",
    tag = "meetings",
    request_body = CreateMeetingRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Created meeting", body = MeetingResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 409, description = "Membership allowance exhausted", body = ApiError)
    )
)]
pub async fn create_meeting(
    meeting_service: web::Data<MeetingService>,
    req: HttpRequest,
    request: web::Json<CreateMeetingRequest>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match meeting_service
        .create_meeting(user_id, request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/meetings/{id}",
    tag = "meetings",
    params(
        ("id" = Uuid, Path, description = "Meeting id")
    ),
    request_body = UpdateMeetingRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated meeting", body = MeetingResponse),
        (status = 404, description = "Meeting not found", body = ApiError),
        (status = 409, description = "Membership allowance exhausted", body = ApiError)
    )
)]
pub async fn update_meeting(
    meeting_service: web::Data<MeetingService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    request: web::Json<UpdateMeetingRequest>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match meeting_service
        .update_meeting(user_id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/meetings/{id}",
    tag = "meetings",
    params(
        ("id" = Uuid, Path, description = "Meeting id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Meeting deleted"),
        (status = 404, description = "Meeting not found", body = ApiError)
    )
)]
pub async fn delete_meeting(
    meeting_service: web::Data<MeetingService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match meeting_service
        .delete_meeting(user_id, path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({"success": true, "message": "Meeting deleted"}))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn meeting_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/meetings")
            .route("", web::get().to(get_meetings))
            .route("", web::post().to(create_meeting))
            .route("/{id}", web::get().to(get_meeting))
            .route("/{id}", web::put().to(update_meeting))
            .route("/{id}", web::delete().to(delete_meeting)),
    );
}
