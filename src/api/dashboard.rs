use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::models::{CreateJobInfoRequest, JobInfo, JobInfoListItem};
use crate::services::identity::Session;
use crate::state::AppState;
use crate::utils::AppError;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct DashboardResponse {
    pub success: bool,
    /// No job descriptions yet; the client shows the welcome form
    pub welcome: bool,
    pub job_infos: Vec<JobInfoListItem>,
    pub total: usize,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct JobInfoResponse {
    pub success: bool,
    pub job_info: JobInfo,
}

/// GET /app - Job descriptions of the signed-in user, newest first
#[utoipa::path(
    get,
    path = "/app",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Job descriptions", body = DashboardResponse),
        (status = 401, description = "No session")
    ),
    security(
        ("session" = [])
    )
)]
pub async fn get_dashboard(
    state: web::Data<AppState>,
    session: web::ReqData<Session>,
) -> Result<HttpResponse, AppError> {
    let user_id = &session.user_id;
    log::info!("📋 GET /app - user {}", user_id);

    let job_infos = state.job_infos.list_for_user(user_id).await?;

    Ok(HttpResponse::Ok().json(DashboardResponse {
        success: true,
        welcome: job_infos.is_empty(),
        total: job_infos.len(),
        job_infos,
    }))
}

/// POST /app/job-infos - Creates a job description
#[utoipa::path(
    post,
    path = "/app/job-infos",
    tag = "Dashboard",
    request_body = CreateJobInfoRequest,
    responses(
        (status = 201, description = "Created", body = JobInfoResponse),
        (status = 400, description = "Missing name or description")
    ),
    security(
        ("session" = [])
    )
)]
pub async fn create_job_info(
    state: web::Data<AppState>,
    session: web::ReqData<Session>,
    request: web::Json<CreateJobInfoRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = &session.user_id;
    log::info!("📝 POST /app/job-infos - user {}", user_id);

    let job_info = state.job_infos.create(user_id, request.into_inner()).await?;

    Ok(HttpResponse::Created().json(JobInfoResponse {
        success: true,
        job_info,
    }))
}
