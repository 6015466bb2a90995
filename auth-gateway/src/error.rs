//! Wire-level error taxonomy and the translation from identity failures.
//!
//! Legacy routes answer with a plain-text body; the OAuth sign-in route wraps
//! the same error in [`JsonError`] and answers `{"error": true, "message": ..}`.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::IdentityError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    RateLimited(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    pub fn unauthorized() -> Self {
        GatewayError::Unauthorized("Unauthorized".to_string())
    }

    pub fn internal() -> Self {
        GatewayError::Internal("Internal server error".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Conflict(_) => StatusCode::CONFLICT,
            GatewayError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            [
                (
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("text/plain; charset=utf-8"),
                ),
                (
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ),
            ],
            format!("{}\n", self),
        )
            .into_response()
    }
}

/// JSON envelope rendering of a [`GatewayError`].
#[derive(Debug)]
pub struct JsonError(pub GatewayError);

impl From<GatewayError> for JsonError {
    fn from(err: GatewayError) -> Self {
        JsonError(err)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: bool,
    pub message: String,
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            error: true,
            message: self.0.to_string(),
        };
        (self.0.status(), Json(body)).into_response()
    }
}

pub fn sign_in_failure(err: IdentityError) -> GatewayError {
    match err {
        IdentityError::UserNotFound => {
            tracing::info!("Sign-in for unknown user");
            GatewayError::NotFound("User not found".to_string())
        }
        IdentityError::InvalidCredential => {
            tracing::info!("Sign-in with invalid credentials");
            GatewayError::Unauthorized("Invalid credentials".to_string())
        }
        other => {
            tracing::error!(error = %other.detail(), "Sign-in error");
            GatewayError::internal()
        }
    }
}

pub fn sign_up_failure(err: IdentityError) -> GatewayError {
    match err {
        IdentityError::UserExists => {
            tracing::info!("Sign-up for an existing user");
            GatewayError::Conflict("User already exists".to_string())
        }
        other => {
            tracing::error!(error = %other.detail(), "Sign-up error");
            GatewayError::internal()
        }
    }
}

pub fn oauth_failure(provider: &str, err: IdentityError) -> GatewayError {
    let detail = err.detail();
    tracing::error!(provider = %provider, error = %detail, "OAuth error");

    if is_rate_limited(&err) {
        return GatewayError::RateLimited(format!(
            "You've reached {}'s rate limit. Please try again later.",
            provider_display_name(provider)
        ));
    }

    GatewayError::Internal(format!("OAuth authentication failed: {}", detail))
}

pub fn oauth_url_failure(provider: &str, err: IdentityError) -> GatewayError {
    let detail = err.detail();
    tracing::error!(provider = %provider, error = %detail, "Error getting OAuth URL");
    GatewayError::Internal(format!("Failed to get OAuth URL: {}", detail))
}

pub fn token_failure(err: IdentityError) -> GatewayError {
    tracing::warn!(error = %err.detail(), "Token verification failed");
    GatewayError::unauthorized()
}

pub fn profile_failure(err: IdentityError) -> GatewayError {
    tracing::error!(error = %err.detail(), "Error getting user profile");
    GatewayError::internal()
}

/// Rate-limit detection: the tagged kind first, then a text match on the
/// error chain for opaque provider errors.
pub fn is_rate_limited(err: &IdentityError) -> bool {
    match err {
        IdentityError::RateLimited(_) => true,
        IdentityError::Unknown(_) => {
            let text = err.detail().to_lowercase();
            text.contains("429") || text.contains("rate limit")
        }
        _ => false,
    }
}

pub fn provider_display_name(provider: &str) -> String {
    match provider.to_lowercase().as_str() {
        "github" => "GitHub".to_string(),
        "gitlab" => "GitLab".to_string(),
        "google" => "Google".to_string(),
        "linkedin" => "LinkedIn".to_string(),
        _ => {
            let mut chars = provider.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}
