use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::{
    dtos::{Credentials, OAuthExchange},
    error::GatewayError,
};

/// Sentinel some clients send when they could not work out the provider.
pub const UNKNOWN_PROVIDER: &str = "unknown";

/// JSON request body with a fixed message for the validation failure.
pub trait JsonBody: DeserializeOwned + Validate {
    const INVALID: &'static str;
}

impl JsonBody for Credentials {
    const INVALID: &'static str = "Email and password are required";
}

impl JsonBody for OAuthExchange {
    const INVALID: &'static str = "Code is required";
}

/// Decode then validate. Content-Type is not enforced.
pub fn parse_body<T: JsonBody>(bytes: &[u8]) -> Result<T, GatewayError> {
    let value: T = serde_json::from_slice(bytes).map_err(|e| {
        tracing::warn!(error = %e, "Error parsing request body");
        GatewayError::Validation("Invalid request format".to_string())
    })?;

    value.validate().map_err(|e| {
        tracing::debug!(error = %e, "Request body failed validation");
        GatewayError::Validation(T::INVALID.to_string())
    })?;

    Ok(value)
}

/// Body extractor for the plain-text routes.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: JsonBody + 'static,
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::warn!(error = %e, "Error reading request body");
            GatewayError::Validation("Invalid request format".to_string())
        })?;

        parse_body(&bytes).map(ValidatedJson)
    }
}

/// The path segment right after the first `oauth` segment.
pub fn provider_from_path(path: &str) -> Option<&str> {
    let mut segments = path.split('/');
    segments.by_ref().find(|segment| *segment == "oauth")?;
    segments.next().filter(|segment| !segment.is_empty())
}

pub fn validate_provider(path: &str) -> Result<&str, GatewayError> {
    match provider_from_path(path) {
        Some(provider) if provider != UNKNOWN_PROVIDER => Ok(provider),
        _ => Err(GatewayError::Validation(
            "Provider not specified".to_string(),
        )),
    }
}

pub fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, GatewayError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| GatewayError::Validation(message.to_string()))
}

/// Token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}
