use crate::handlers::get_user_id_from_request;
use crate::models::*;
use crate::services::MembershipService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/memberships",
    tag = "memberships",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Memberships of the authenticated user", body = [MembershipResponse]),
        (status = 401, description = "Unauthorized", body = ApiError)
    )
)]
pub async fn get_memberships(
    membership_service: web::Data<MembershipService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match membership_service.get_memberships(user_id).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/memberships/{id}",
    tag = "memberships",
    params(
        ("id" = Uuid, Path, description = "Membership id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Membership detail", body = MembershipResponse),
        (status = 404, description = "Membership not found", body = ApiError)
    )
)]
pub async fn get_membership(
    membership_service: web::Data<MembershipService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match membership_service
        .get_membership(user_id, path.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/memberships",
    tag = "memberships",
    request_body = CreateMembershipRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Created membership", body = MembershipResponse),
        (status = 400, description = "Invalid request or client already has an active membership", body = ApiError),
        (status = 404, description = "Service or client not found", body = ApiError)
    )
)]
pub async fn create_membership(
    membership_service: web::Data<MembershipService>,
    req: HttpRequest,
    request: web::Json<CreateMembershipRequest>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match membership_service
        .create_membership(user_id, request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/memberships/{id}",
    tag = "memberships",
    params(
        ("id" = Uuid, Path, description = "Membership id")
    ),
    request_body = UpdateMembershipRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated membership", body = MembershipResponse),
        (status = 404, description = "Membership not found", body = ApiError)
    )
)]
pub async fn update_membership(
    membership_service: web::Data<MembershipService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    request: web::Json<UpdateMembershipRequest>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match membership_service
        .update_membership(user_id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/memberships/{id}",
    tag = "memberships",
    params(
        ("id" = Uuid, Path, description = "Membership id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Membership canceled; its meetings keep their history", body = MembershipResponse),
        (status = 404, description = "Membership not found", body = ApiError)
    )
)]
pub async fn delete_membership(
    membership_service: web::Data<MembershipService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match membership_service
        .delete_membership(user_id, path.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok()
            .json(json!({"success": true, "data": resp, "message": "Membership canceled"}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/memberships/active/{client_id}",
    tag = "memberships",
    params(
        ("client_id" = Uuid, Path, description = "Client id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The client's active membership, or null", body = MembershipResponse),
        (status = 401, description = "Unauthorized", body = ApiError)
    )
)]
pub async fn get_active_membership(
    membership_service: web::Data<MembershipService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match membership_service
        .get_active_membership(user_id, path.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/memberships/available/{client_id}",
    tag = "memberships",
    params(
        ("client_id" = Uuid, Path, description = "Client id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The client's active membership when it still has spots, or null", body = MembershipResponse),
        (status = 401, description = "Unauthorized", body = ApiError)
    )
)]
pub async fn get_available_membership(
    membership_service: web::Data<MembershipService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match membership_service
        .get_available_membership(user_id, path.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/memberships/{id}/progress",
    tag = "memberships",
    params(
        ("id" = Uuid, Path, description = "Membership id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Completed versus remaining meetings", body = MembershipProgressResponse),
        (status = 404, description = "Membership not found", body = ApiError)
    )
)]
pub async fn get_membership_progress(
    membership_service: web::Data<MembershipService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match membership_service
        .get_progress(user_id, path.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/memberships/{id}/meetings",
    tag = "memberships",
    params(
        ("id" = Uuid, Path, description = "Membership id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Meetings funded by this membership", body = [MeetingResponse]),
        (status = 404, description = "Membership not found", body = ApiError)
    )
)]
pub async fn get_membership_meetings(
    membership_service: web::Data<MembershipService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match membership_service
        .get_membership_meetings(user_id, path.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/memberships/{id}/set-start-date",
    tag = "memberships",
    params(
        ("id" = Uuid, Path, description = "Membership id")
    ),
    request_body = SetMembershipStartDateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Membership with its start date anchored", body = MembershipResponse),
        (status = 404, description = "Membership not found", body = ApiError)
    )
)]
pub async fn set_membership_start_date(
    membership_service: web::Data<MembershipService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    request: web::Json<SetMembershipStartDateRequest>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };
    match membership_service
        .set_start_date(user_id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn membership_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/memberships")
            .route("", web::get().to(get_memberships))
            .route("", web::post().to(create_membership))
            .route("/active/{client_id}", web::get().to(get_active_membership))
            .route(
                "/available/{client_id}",
                web::get().to(get_available_membership),
            )
            .route("/{id}", web::get().to(get_membership))
            .route("/{id}", web::put().to(update_membership))
            .route("/{id}", web::delete().to(delete_membership))
            .route("/{id}/progress", web::get().to(get_membership_progress))
            .route("/{id}/meetings", web::get().to(get_membership_meetings))
            .route(
                "/{id}/set-start-date",
                web::post().to(set_membership_start_date),
            ),
    );
}
