use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{Currency, Frequency, MeetingStatus, MembershipStatus, NotificationType};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::profile::get_profile,
        handlers::profile::update_profile,
        handlers::service::get_services,
        handlers::service::create_service,
        handlers::service::get_service,
        handlers::service::update_service,
        handlers::service::delete_service,
        handlers::client::get_clients,
        handlers::client::create_client,
        handlers::client::get_client,
        handlers::client::update_client,
        handlers::client::delete_client,
        handlers::meeting::get_meetings,
        handlers::meeting::create_meeting,
        handlers::meeting::get_meeting,
        handlers::meeting::update_meeting,
        handlers::meeting::delete_meeting,
        handlers::recurrence::get_recurrences,
        handlers::recurrence::create_recurrence,
        handlers::recurrence::get_recurrence,
        handlers::recurrence::update_recurrence,
        handlers::recurrence::delete_recurrence,
        handlers::recurrence::get_recurrence_meetings,
        handlers::recurrence::update_meeting_scoped,
        handlers::recurrence::delete_meetings_scoped,
        handlers::membership::get_memberships,
        handlers::membership::create_membership,
        handlers::membership::get_membership,
        handlers::membership::update_membership,
        handlers::membership::delete_membership,
        handlers::membership::get_active_membership,
        handlers::membership::get_available_membership,
        handlers::membership::get_membership_progress,
        handlers::membership::get_membership_meetings,
        handlers::membership::set_membership_start_date,
        handlers::notification::get_notifications,
        handlers::notification::get_notification,
        handlers::notification::update_notification,
        handlers::notification::delete_notification,
        handlers::notification::mark_notifications_read,
        handlers::notification::check_membership_warnings,
        handlers::stats::get_stats_overview,
        handlers::stats::get_client_stats,
        handlers::stats::get_single_client_stats,
        handlers::stats::get_daily_stats,
    ),
    components(
        schemas(
            ApiError,
            Currency,
            Frequency,
            MeetingStatus,
            MembershipStatus,
            NotificationType,
            RecurrenceUpdateScope,
            ProfileResponse,
            UpdateProfileRequest,
            ServiceResponse,
            CreateServiceRequest,
            UpdateServiceRequest,
            ClientResponse,
            CreateClientRequest,
            UpdateClientRequest,
            ClientListQuery,
            MeetingResponse,
            CreateMeetingRequest,
            UpdateMeetingRequest,
            MeetingListQuery,
            RecurrenceResponse,
            CreateRecurrenceRequest,
            UpdateRecurrenceRequest,
            CreateRecurrenceResponse,
            LimitationInfo,
            ScopedUpdateQuery,
            ScopedDeleteQuery,
            ScopedDeleteResponse,
            MembershipResponse,
            CreateMembershipRequest,
            UpdateMembershipRequest,
            MembershipAvailability,
            MembershipProgressResponse,
            SetMembershipStartDateRequest,
            NotificationResponse,
            UpdateNotificationRequest,
            MarkNotificationsReadRequest,
            NotificationListQuery,
            StatsOverview,
            ClientStats,
            ClientStatsResponse,
            DailyBreakdownItem,
            StatsQuery,
            DailyStatsQuery,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Service health"),
        (name = "profile", description = "Freelancer profile API"),
        (name = "services", description = "Service catalog API"),
        (name = "clients", description = "Client management API"),
        (name = "meetings", description = "Meeting scheduling API"),
        (name = "recurrences", description = "Recurring meeting series API"),
        (name = "memberships", description = "Membership package API"),
        (name = "notifications", description = "Notification API"),
        (name = "stats", description = "Revenue and activity statistics API"),
    ),
    info(
        title = "Freelancer Backend API",
        version = "1.0.0",
        description = "REST API for managing services, clients, meetings, memberships and revenue statistics",
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
