use axum_extra::extract::cookie::CookieJar;
use service_core::axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    Json,
};

use crate::{
    dtos::{AuthResult, Credentials},
    error::{self, GatewayError},
    utils::ValidatedJson,
    AppState,
};

/// `POST /api/auth/signup`. Answers 201 on success.
pub async fn sign_up(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    jar: CookieJar,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> Result<(StatusCode, CookieJar, Json<AuthResult>), GatewayError> {
    let result = state
        .identity
        .sign_up(&credentials)
        .await
        .map_err(error::sign_up_failure)?;

    let secure = state.cookies.is_secure_transport(&uri, &headers);
    let jar = state
        .cookies
        .write(jar, state.cookies.issue(&result.access_token, secure));

    Ok((StatusCode::CREATED, jar, Json(result)))
}
