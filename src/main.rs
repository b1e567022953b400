use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use landr_service::{
    api,
    config::Config,
    database::{self, JobInfoRepository, UserRepository},
    middleware::{RouteGuard, SecurityHeaders},
    state::AppState,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Fail fast on missing or invalid configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    log::info!("🚀 Starting Landr service ({})...", config.environment);
    if config.environment.is_development() {
        log::warn!("⚠️  Development mode: plan entitlement checks are bypassed");
    }

    let db = database::MongoDB::new(&config.database_url)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    log::info!("✅ MongoDB connected successfully");

    let db = Arc::new(db);
    let users: Arc<dyn UserRepository> = db.clone();
    let job_infos: Arc<dyn JobInfoRepository> = db;

    let bind_address = (config.host.clone(), config.port);
    let state = web::Data::new(AppState::new(config, users, job_infos));

    log::info!("🌐 Server starting on {}:{}", bind_address.0, bind_address.1);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(state.clone())
            .wrap(RouteGuard::new(
                state.sessions.clone(),
                &state.config.auth.sign_in_url,
            ))
            .wrap(SecurityHeaders)
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi),
            )
            .configure(api::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
