pub mod dashboard;
pub mod health;
pub mod metrics;
pub mod onboarding;
pub mod permissions;
pub mod swagger;

use actix_web::web;

/// Registers every route. The route guard is applied by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Health check
        .route("/health", web::get().to(health::health_check))
        // Metrics
        .route("/metrics", web::get().to(metrics::get_metrics))
        // Onboarding: user row sync after first sign-in
        .service(
            web::scope("/onboarding")
                .route("", web::get().to(onboarding::onboarding_page))
                .route("/sync", web::post().to(onboarding::sync_user)),
        )
        // Main application
        .service(
            web::scope("/app")
                .route("", web::get().to(dashboard::get_dashboard))
                .route("/job-infos", web::post().to(dashboard::create_job_info))
                .route("/permissions/{permission}", web::get().to(permissions::check_permission)),
        );
}
