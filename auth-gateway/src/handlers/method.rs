//! Preflight and unsupported-method responses shared by every route.

use service_core::axum::http::StatusCode;

use crate::error::{GatewayError, JsonError};

/// `OPTIONS`: 200 with no body. CORS headers are left to the edge.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> GatewayError {
    GatewayError::MethodNotAllowed
}

pub async fn method_not_allowed_json() -> JsonError {
    JsonError(GatewayError::MethodNotAllowed)
}
