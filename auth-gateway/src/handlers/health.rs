use service_core::{
    axum::{extract::State, Json},
    error::AppError,
};

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    state.identity.health_check().await.map_err(|e| {
        tracing::error!(error = %e.detail(), "Identity service health check failed");
        AppError::ServiceUnavailable("identity service".to_string())
    })?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
        "checks": {
            "identity": "up"
        }
    })))
}
