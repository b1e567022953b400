use actix_web::{http::header, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::models::SyncUserRequest;
use crate::onboarding::APP_HOME;
use crate::services::identity::Session;
use crate::state::AppState;
use crate::utils::AppError;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct OnboardingStatusResponse {
    pub success: bool,
    pub status: String,
    pub user_id: String,
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// GET /onboarding - Decides whether the caller still needs to be synced
#[utoipa::path(
    get,
    path = "/onboarding",
    tag = "Onboarding",
    responses(
        (status = 200, description = "User row missing, client should run the sync", body = OnboardingStatusResponse),
        (status = 303, description = "Already onboarded (to /app) or signed out (to /)")
    ),
    security(
        ("session" = [])
    )
)]
pub async fn onboarding_page(
    state: web::Data<AppState>,
    session: Option<web::ReqData<Session>>,
) -> Result<HttpResponse, AppError> {
    let Some(session) = session else {
        return Ok(see_other("/"));
    };
    let user_id = &session.user_id;

    log::info!("👋 GET /onboarding - user {}", user_id);

    if state.users.get_user(user_id).await?.is_some() {
        log::info!("✅ User {} already onboarded", user_id);
        return Ok(see_other(APP_HOME));
    }

    Ok(HttpResponse::Ok().json(OnboardingStatusResponse {
        success: true,
        status: "pending".to_string(),
        user_id: user_id.clone(),
    }))
}

/// POST /onboarding/sync - Upserts the signed-in identity into `users`
#[utoipa::path(
    post,
    path = "/onboarding/sync",
    tag = "Onboarding",
    request_body = SyncUserRequest,
    responses(
        (status = 204, description = "User synced"),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Payload id does not match the session")
    ),
    security(
        ("session" = [])
    )
)]
pub async fn sync_user(
    state: web::Data<AppState>,
    session: web::ReqData<Session>,
    request: web::Json<SyncUserRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();

    log::info!("🔄 POST /onboarding/sync - user {}", request.id);

    if request.id != session.user_id {
        log::warn!(
            "❌ Sync rejected: payload id {} does not match session {}",
            request.id,
            session.user_id
        );
        return Err(AppError::Forbidden(
            "User id does not match the current session".to_string(),
        ));
    }

    if let Err(e) = state.users.sync_user(&request).await {
        log::error!("❌ Sync failed for {}: {}", request.id, e);
        return Err(e);
    }

    Ok(HttpResponse::NoContent().finish())
}
