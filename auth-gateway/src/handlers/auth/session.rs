use axum_extra::extract::cookie::CookieJar;
use service_core::axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    Json,
};

use crate::{
    dtos::{AuthResult, Credentials, SignOutResponse},
    error::{self, GatewayError},
    middleware::AuthzContext,
    utils::ValidatedJson,
    AppState,
};

/// `POST /api/auth/signin`
pub async fn sign_in(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    jar: CookieJar,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> Result<(StatusCode, CookieJar, Json<AuthResult>), GatewayError> {
    let result = state
        .identity
        .sign_in(&credentials)
        .await
        .map_err(error::sign_in_failure)?;

    let secure = state.cookies.is_secure_transport(&uri, &headers);
    let jar = state
        .cookies
        .write(jar, state.cookies.issue(&result.access_token, secure));

    Ok((StatusCode::OK, jar, Json(result)))
}

/// `POST /api/auth/signout`. Always succeeds, with or without a session.
pub async fn sign_out(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    jar: CookieJar,
) -> (StatusCode, CookieJar, Json<SignOutResponse>) {
    let secure = state.cookies.is_secure_transport(&uri, &headers);
    let jar = state.cookies.write(jar, state.cookies.clear(secure));

    (StatusCode::OK, jar, Json(SignOutResponse { success: true }))
}

/// `GET /api/auth/session`, behind the auth middleware.
pub async fn current_session(ctx: AuthzContext) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "userId": ctx.user_id }))
}
