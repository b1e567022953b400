use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::services::identity::Session;
use crate::services::permissions::{has_permission, Permission};
use crate::state::AppState;
use crate::utils::AppError;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct PermissionResponse {
    pub success: bool,
    pub permission: Permission,
    pub granted: bool,
}

/// GET /app/permissions/{permission} - Plan entitlement of the signed-in user
#[utoipa::path(
    get,
    path = "/app/permissions/{permission}",
    tag = "Permissions",
    params(
        ("permission" = String, Path, description = "unlimited_resume_analysis | unlimited_interviews | unlimited_questions | 1_interview | 5_questions")
    ),
    responses(
        (status = 200, description = "Entitlement result", body = PermissionResponse),
        (status = 400, description = "Unknown permission")
    ),
    security(
        ("session" = [])
    )
)]
pub async fn check_permission(
    state: web::Data<AppState>,
    session: Option<web::ReqData<Session>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let permission: Permission = path.parse().map_err(AppError::InvalidRequest)?;

    let granted = has_permission(
        state.config.environment,
        session.as_deref(),
        permission,
    );

    log::debug!("🎫 Permission {} -> {}", permission, granted);

    Ok(HttpResponse::Ok().json(PermissionResponse {
        success: true,
        permission,
        granted,
    }))
}
