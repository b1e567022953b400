use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Landr API",
        version = "1.0.0",
        description = "Backend for Landr interview preparation.\n\n**Authentication:** routes under `/app`, `/onboarding` and `/forum` require an identity provider session, sent as a Bearer token or the `__session` cookie."
    ),
    paths(
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
        crate::api::onboarding::onboarding_page,
        crate::api::onboarding::sync_user,
        crate::api::dashboard::get_dashboard,
        crate::api::dashboard::create_job_info,
        crate::api::permissions::check_permission,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::api::onboarding::OnboardingStatusResponse,
            crate::api::dashboard::DashboardResponse,
            crate::api::dashboard::JobInfoResponse,
            crate::api::permissions::PermissionResponse,
            crate::models::SyncUserRequest,
            crate::models::CreateJobInfoRequest,
            crate::models::JobInfo,
            crate::models::JobInfoListItem,
            crate::models::ExperienceLevel,
            crate::services::permissions::Permission,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and request counters."),
        (name = "Onboarding", description = "First sign-in: decide whether the user row exists and sync it."),
        (name = "Dashboard", description = "Job descriptions the user prepares interviews for."),
        (name = "Permissions", description = "Plan entitlements of the signed-in user."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Identity provider session token"))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("__session"))),
            );
        }
    }
}
