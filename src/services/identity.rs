//! Session tokens issued by the identity provider.
//!
//! The provider signs a short-lived JWT with the instance secret key and hands
//! it to the browser, either as the `__session` cookie or as a bearer token.
//! Verification here is purely local: signature, expiry and (optionally) issuer.

use actix_web::HttpRequest;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::utils::AppError;

pub const SESSION_COOKIE: &str = "__session";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    pub sub: String,           // identity id
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,   // provider session id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Plan features, comma separated, optionally scoped (`u:` / `o:`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fea: Option<String>,
}

/// An authenticated caller, stored in request extensions by the route guard.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub claims: SessionClaims,
}

impl Session {
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.claims
            .fea
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(|f| match f.split_once(':') {
                Some((_scope, name)) => name,
                None => f,
            })
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.features().any(|f| f == feature)
    }
}

pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            key: DecodingKey::from_secret(config.secret_key.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Session, AppError> {
        let claims = decode::<SessionClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid session token: {}", e)))?;

        if claims.sub.is_empty() {
            return Err(AppError::Unauthorized("Session token has no subject".to_string()));
        }

        Ok(Session {
            user_id: claims.sub.clone(),
            claims,
        })
    }

    /// Verifies the token carried by `req`, if any. Invalid tokens yield `None`.
    pub fn session_from(&self, req: &HttpRequest) -> Option<Session> {
        let token = session_token(req)?;
        match self.verify(&token) {
            Ok(session) => Some(session),
            Err(e) => {
                log::debug!("🔒 Rejected session token: {}", e);
                None
            }
        }
    }
}

/// Bearer token first, then the session cookie.
pub fn session_token(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    bearer.or_else(|| {
        req.cookie(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|token| !token.is_empty())
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    pub const TEST_SECRET: &str = "sk_test_landr";

    pub fn claims_for(user_id: &str) -> SessionClaims {
        let now = chrono::Utc::now().timestamp() as usize;
        SessionClaims {
            sub: user_id.to_string(),
            exp: now + 3600,
            iat: now,
            sid: Some("sess_test".to_string()),
            iss: None,
            email: Some(format!("{}@example.com", user_id)),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            image_url: None,
            fea: None,
        }
    }

    pub fn sign(claims: &SessionClaims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("test token")
    }

    pub fn token_for(user_id: &str) -> String {
        sign(&claims_for(user_id), TEST_SECRET)
    }

    pub fn auth_config() -> AuthConfig {
        AuthConfig {
            secret_key: TEST_SECRET.to_string(),
            issuer: None,
            sign_in_url: "/sign-in".to_string(),
        }
    }
}
