use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage, ResponseError,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use crate::services::identity::SessionVerifier;
use crate::utils::AppError;

/// Path prefixes that require a signed-in user. Plain prefix match, so
/// `/app`, `/app/settings` and `/apple` are all covered.
pub const PROTECTED_PREFIXES: [&str; 3] = ["/app", "/onboarding", "/forum"];

/// Extensions of static files skipped by the guard. Matched as a prefix of the
/// text after any dot, so `htm` also covers `html`; `js` never covers `json`.
const STATIC_EXTENSIONS: &[&str] = &[
    "htm", "css", "js", "jpg", "jpeg", "webp", "png", "gif", "svg", "ttf", "woff", "ico", "csv",
    "doc", "xls", "zip", "webmanifest",
];

pub fn is_protected(path: &str) -> bool {
    PROTECTED_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

fn is_api_path(path: &str) -> bool {
    path.starts_with("/api") || path.starts_with("/trpc")
}

fn has_static_extension(path: &str) -> bool {
    path.match_indices('.').any(|(i, _)| {
        let rest = &path[i + 1..];
        STATIC_EXTENSIONS.iter().any(|ext| {
            rest.starts_with(ext) && !(*ext == "js" && rest[ext.len()..].starts_with("on"))
        })
    })
}

/// Whether the guard looks at `path` at all. Build internals and static files
/// are skipped; API and RPC paths are always looked at.
pub fn should_evaluate(path: &str) -> bool {
    if is_api_path(path) {
        return true;
    }

    let rest = path.strip_prefix('/').unwrap_or(path);
    !(rest.starts_with("_next") || has_static_extension(path))
}

fn wants_document(req: &ServiceRequest) -> bool {
    req.headers()
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("text/html"))
        .unwrap_or(false)
}

fn sign_in_location(sign_in_url: &str, req: &ServiceRequest) -> String {
    let target = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| req.path());
    let separator = if sign_in_url.contains('?') { '&' } else { '?' };

    format!(
        "{}{}redirect_url={}",
        sign_in_url,
        separator,
        urlencoding::encode(target)
    )
}

/// Gates [`PROTECTED_PREFIXES`] behind a valid session and attaches the
/// caller's [`Session`](crate::services::identity::Session) to every evaluated
/// request that carries one.
pub struct RouteGuard {
    sessions: Arc<SessionVerifier>,
    sign_in_url: Rc<str>,
}

impl RouteGuard {
    pub fn new(sessions: Arc<SessionVerifier>, sign_in_url: &str) -> Self {
        Self {
            sessions,
            sign_in_url: Rc::from(sign_in_url),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RouteGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RouteGuardService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RouteGuardService {
            service,
            sessions: self.sessions.clone(),
            sign_in_url: self.sign_in_url.clone(),
        }))
    }
}

pub struct RouteGuardService<S> {
    service: S,
    sessions: Arc<SessionVerifier>,
    sign_in_url: Rc<str>,
}

impl<S, B> Service<ServiceRequest> for RouteGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let path = req.path().to_string();

        if !should_evaluate(&path) {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        let session = self.sessions.session_from(req.request());

        if is_protected(&path) && session.is_none() {
            let error = if wants_document(&req) {
                AppError::SignInRequired {
                    location: sign_in_location(&self.sign_in_url, &req),
                }
            } else {
                AppError::Unauthorized("Missing or invalid session".to_string())
            };

            log::warn!("🔒 Blocked unauthenticated request to {}", path);
            // Answered here so outer middleware still decorates the rejection
            let res = req.into_response(error.error_response()).map_into_right_body();
            return Box::pin(async move { Ok(res) });
        }

        if let Some(session) = session {
            req.extensions_mut().insert(session);
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::identity::testing::{auth_config, token_for};
    use crate::services::identity::Session;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    #[::core::prelude::v1::test]
    fn test_protected_prefixes() {
        assert!(is_protected("/app"));
        assert!(is_protected("/app/settings"));
        assert!(is_protected("/onboarding"));
        assert!(is_protected("/forum/threads/1"));
        assert!(!is_protected("/"));
        assert!(!is_protected("/pricing"));
        assert!(!is_protected("/api/webhooks"));
    }

    #[::core::prelude::v1::test]
    fn test_static_files_and_internals_are_not_evaluated() {
        assert!(!should_evaluate("/public/page.html"));
        assert!(!should_evaluate("/styles/site.css"));
        assert!(!should_evaluate("/app/logo.png"));
        assert!(!should_evaluate("/fonts/inter.woff2"));
        assert!(!should_evaluate("/_next/static/chunk"));
        assert!(!should_evaluate("/site.webmanifest"));

        assert!(should_evaluate("/"));
        assert!(should_evaluate("/app/settings"));
        assert!(should_evaluate("/data/export.json"));
        assert!(should_evaluate("/api/uploads/resume.pdf.png"));
        assert!(should_evaluate("/trpc/user.get"));
    }

    async fn whoami(session: Option<web::ReqData<Session>>) -> HttpResponse {
        match session {
            Some(s) => HttpResponse::Ok().body(s.user_id.clone()),
            None => HttpResponse::Ok().body("anonymous"),
        }
    }

    macro_rules! guarded_app {
        () => {
            test::init_service(
                App::new()
                    .wrap(RouteGuard::new(
                        Arc::new(SessionVerifier::new(&auth_config())),
                        "/sign-in",
                    ))
                    .route("/app/settings", web::get().to(whoami))
                    .route("/app/logo.png", web::get().to(whoami))
                    .route("/public/page.html", web::get().to(whoami))
                    .route("/pricing", web::get().to(whoami)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_protected_path_without_session_is_rejected() {
        let app = guarded_app!();

        let req = test::TestRequest::get().uri("/app/settings").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/app/settings")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_document_request_is_sent_to_sign_in() {
        let app = guarded_app!();

        let req = test::TestRequest::get()
            .uri("/app/settings?tab=billing")
            .insert_header(("Accept", "text/html,application/xhtml+xml"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            res.headers().get(header::LOCATION).unwrap(),
            "/sign-in?redirect_url=%2Fapp%2Fsettings%3Ftab%3Dbilling"
        );
    }

    #[actix_web::test]
    async fn test_rejections_carry_security_headers() {
        let app = test::init_service(
            App::new()
                .wrap(RouteGuard::new(
                    Arc::new(SessionVerifier::new(&auth_config())),
                    "/sign-in",
                ))
                .wrap(crate::middleware::SecurityHeaders)
                .route("/app/settings", web::get().to(whoami)),
        )
        .await;

        for accept in ["application/json", "text/html"] {
            let req = test::TestRequest::get()
                .uri("/app/settings")
                .insert_header(("Accept", accept))
                .to_request();
            let res = test::call_service(&app, req).await;

            assert!(res.status().is_client_error() || res.status().is_redirection());
            assert_eq!(res.headers().get("x-content-type-options").unwrap(), "nosniff");
            assert_eq!(res.headers().get("x-frame-options").unwrap(), "DENY");
        }
    }

    #[actix_web::test]
    async fn test_valid_session_reaches_handler() {
        let app = guarded_app!();

        let req = test::TestRequest::get()
            .uri("/app/settings")
            .insert_header(("Authorization", format!("Bearer {}", token_for("user_2abc"))))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;

        assert_eq!(body, "user_2abc");
    }

    #[actix_web::test]
    async fn test_unprotected_and_static_paths_pass() {
        let app = guarded_app!();

        for uri in ["/public/page.html", "/app/logo.png", "/pricing"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let body = test::call_and_read_body(&app, req).await;
            assert_eq!(body, "anonymous", "{}", uri);
        }

        // sessions are still attached on evaluated public paths
        let req = test::TestRequest::get()
            .uri("/pricing")
            .cookie(actix_web::cookie::Cookie::new("__session", token_for("user_9")))
            .to_request();
        assert_eq!(test::call_and_read_body(&app, req).await, "user_9");
    }
}
