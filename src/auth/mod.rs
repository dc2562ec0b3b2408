//! Authentication: HS256 token issue/validation, the bearer-token middleware
//! that guards every protected route, and the `CurrentUser` extractor that
//! hands the verified identity to handlers. The identity used for
//! authorization decisions always comes from the token, never from request
//! bodies.

use axum::{
    extract::{Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::entities::user;
use crate::AppState;

mod password;

pub use password::{hash_password, verify_password};

/// Claim structure for access tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,         // Subject (user id)
    pub username: String, // Login name, for display without a lookup
    pub iat: i64,         // Issued at time
    pub exp: i64,         // Expiration time
}

/// Verified identity threaded through the request.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub user_id: i32,
    pub username: String,
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiration: Duration,
}

/// Issues and validates access tokens. Pure verification, no side effects.
#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Generate a signed access token for a user.
    pub fn issue_token(&self, user: &user::Model) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now
            + ChronoDuration::from_std(self.config.token_expiration)
                .map_err(|_| AuthError::TokenCreation("invalid token duration".to_string()))?;

        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Validate a token and extract its claims, distinguishing expiry from
    /// every other failure.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
    }
}

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No authentication token provided")]
    MissingToken,

    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code): (StatusCode, &str) = match &self {
            Self::MissingToken => (StatusCode::UNAUTHORIZED, "AUTH_MISSING_TOKEN"),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "AUTH_INVALID_TOKEN"),
            Self::TokenExpired => (StatusCode::UNAUTHORIZED, "AUTH_TOKEN_EXPIRED"),
            Self::TokenCreation(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_TOKEN_CREATION_FAILED",
            ),
        };

        let body = Json(serde_json::json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Middleware guarding protected routes: parses the bearer header, validates
/// the token and inserts a `CurrentUser` into the request extensions.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let claims = state.auth.validate_token(token)?;

    request.extensions_mut().insert(CurrentUser {
        user_id: claims.sub,
        username: claims.username,
    });

    Ok(next.run(request).await)
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_service() -> AuthService {
        AuthService::new(AuthConfig {
            jwt_secret: "unit-test-secret-key-of-sufficient-length".to_string(),
            token_expiration: Duration::from_secs(24 * 60 * 60),
        })
    }

    fn test_user() -> user::Model {
        user::Model {
            id: 7,
            username: "alice".to_string(),
            password_hash: String::new(),
            role: "user".to_string(),
            last_login: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn token_round_trip() {
        let service = test_service();
        let token = service.issue_token(&test_user()).expect("issue");
        let claims = service.validate_token(&token).expect("validate");
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_rejected_with_expiry_error() {
        let service = test_service();
        // Two hours in the past clears the default decode leeway.
        let now = Utc::now();
        let claims = Claims {
            sub: 7,
            username: "alice".to_string(),
            iat: (now - ChronoDuration::hours(3)).timestamp(),
            exp: (now - ChronoDuration::hours(2)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret("unit-test-secret-key-of-sufficient-length".as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn token_signed_with_other_secret_rejected() {
        let service = test_service();
        let other = AuthService::new(AuthConfig {
            jwt_secret: "a-completely-different-secret-also-long-enough".to_string(),
            token_expiration: Duration::from_secs(3600),
        });
        let token = other.issue_token(&test_user()).expect("issue");
        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_token_rejected() {
        let service = test_service();
        assert!(matches!(
            service.validate_token("not.a.jwt"),
            Err(AuthError::InvalidToken)
        ));
    }
}
