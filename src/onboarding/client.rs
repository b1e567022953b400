use async_trait::async_trait;

use super::controller::SyncAction;
use crate::models::SyncUserRequest;
use crate::utils::AppError;

/// Calls the sync action of a remote service over HTTP, authenticated with the
/// caller's session token.
pub struct HttpSyncAction {
    http: reqwest::Client,
    endpoint: String,
    session_token: String,
}

impl HttpSyncAction {
    pub fn new(base_url: &str, session_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: sync_endpoint(base_url),
            session_token: session_token.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn sync_endpoint(base_url: &str) -> String {
    format!("{}/onboarding/sync", base_url.trim_end_matches('/'))
}

#[async_trait]
impl SyncAction for HttpSyncAction {
    async fn sync_user(&self, request: &SyncUserRequest) -> Result<(), AppError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.session_token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "sync rejected with status {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};

    fn request() -> SyncUserRequest {
        SyncUserRequest {
            id: "user_1".to_string(),
            name: "Ada".to_string(),
            email: String::new(),
            image_url: None,
        }
    }

    async fn fake_sync(req: HttpRequest) -> HttpResponse {
        let auth = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if auth == "Bearer good-token" {
            HttpResponse::NoContent().finish()
        } else {
            HttpResponse::InternalServerError().body("database down")
        }
    }

    #[test]
    fn test_endpoint_is_built_from_base_url() {
        assert_eq!(
            HttpSyncAction::new("https://landr.dev/", "tok").endpoint(),
            "https://landr.dev/onboarding/sync"
        );
        assert_eq!(sync_endpoint("http://localhost:3000"), "http://localhost:3000/onboarding/sync");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_an_upstream_error() {
        let action = HttpSyncAction::new("http://127.0.0.1:1", "tok");

        let result = action.sync_user(&request()).await;
        assert!(matches!(result, Err(AppError::Upstream(_))));
    }

    #[actix_web::test]
    async fn test_error_status_is_an_upstream_error() {
        let server = HttpServer::new(|| App::new().route("/onboarding/sync", web::post().to(fake_sync)))
            .workers(1)
            .disable_signals()
            .bind(("127.0.0.1", 0))
            .unwrap();
        let base_url = format!("http://{}", server.addrs()[0]);
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        let ok = HttpSyncAction::new(&base_url, "good-token").sync_user(&request()).await;
        assert!(ok.is_ok());

        let rejected = HttpSyncAction::new(&base_url, "stale-token").sync_user(&request()).await;
        match rejected {
            Err(AppError::Upstream(message)) => {
                assert!(message.contains("500"), "{}", message);
                assert!(message.contains("database down"), "{}", message);
            }
            other => panic!("expected upstream error, got {:?}", other),
        }

        handle.stop(false).await;
    }
}
