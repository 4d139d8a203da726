use crate::handlers::get_user_id_from_request;
use crate::models::*;
use crate::services::StatsService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

/// Aggregate totals across meetings, clients and memberships
#[utoipa::path(
    get,
    path = "/stats/overview",
    tag = "stats",
    params(
        ("start_date" = Option<String>, Query, description = "Inclusive range start (YYYY-MM-DD)"),
        ("end_date" = Option<String>, Query, description = "Inclusive range end (YYYY-MM-DD)"),
        ("service_id" = Option<Uuid>, Query, description = "Restrict the report to one service")
    ),
    responses(
        (status = 200, description = "Overview statistics", body = StatsOverview),
        (status = 400, description = "Invalid date", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_stats_overview(
    req: HttpRequest,
    stats_service: web::Data<StatsService>,
    query: web::Query<StatsQuery>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };

    match stats_service
        .get_overview(user_id, query.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

/// Per-client rollups for clients with meetings in the range
#[utoipa::path(
    get,
    path = "/stats/clients",
    tag = "stats",
    params(
        ("start_date" = Option<String>, Query, description = "Inclusive range start (YYYY-MM-DD)"),
        ("end_date" = Option<String>, Query, description = "Inclusive range end (YYYY-MM-DD)"),
        ("service_id" = Option<Uuid>, Query, description = "Restrict the report to one service")
    ),
    responses(
        (status = 200, description = "Client statistics", body = [ClientStats]),
        (status = 400, description = "Invalid date", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_client_stats(
    req: HttpRequest,
    stats_service: web::Data<StatsService>,
    query: web::Query<StatsQuery>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };

    match stats_service
        .get_client_stats(user_id, query.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

/// Rollup plus the meeting list for a single client
#[utoipa::path(
    get,
    path = "/stats/client/{client_id}",
    tag = "stats",
    params(
        ("client_id" = Uuid, Path, description = "Client ID"),
        ("start_date" = Option<String>, Query, description = "Inclusive range start (YYYY-MM-DD)"),
        ("end_date" = Option<String>, Query, description = "Inclusive range end (YYYY-MM-DD)"),
        ("service_id" = Option<Uuid>, Query, description = "Restrict the report to one service")
    ),
    responses(
        (status = 200, description = "Single client statistics", body = ClientStatsResponse),
        (status = 400, description = "Invalid date", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 404, description = "Client not found", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_single_client_stats(
    req: HttpRequest,
    stats_service: web::Data<StatsService>,
    path: web::Path<Uuid>,
    query: web::Query<StatsQuery>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };

    match stats_service
        .get_single_client_stats(user_id, path.into_inner(), query.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

/// Day-by-day revenue and meeting counts over a required range
#[utoipa::path(
    get,
    path = "/stats/daily",
    tag = "stats",
    params(
        ("start_date" = String, Query, description = "Inclusive range start (YYYY-MM-DD)"),
        ("end_date" = String, Query, description = "Inclusive range end (YYYY-MM-DD)"),
        ("service_id" = Option<Uuid>, Query, description = "Restrict the report to one service")
    ),
    responses(
        (status = 200, description = "Daily breakdown", body = [DailyBreakdownItem]),
        (status = 400, description = "Invalid date", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_daily_stats(
    req: HttpRequest,
    stats_service: web::Data<StatsService>,
    query: web::Query<DailyStatsQuery>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };

    match stats_service
        .get_daily_breakdown(user_id, query.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({"success": true, "data": resp}))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn stats_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/stats")
            .route("/overview", web::get().to(get_stats_overview))
            .route("/clients", web::get().to(get_client_stats))
            .route("/client/{client_id}", web::get().to(get_single_client_stats))
            .route("/daily", web::get().to(get_daily_stats)),
    );
}
