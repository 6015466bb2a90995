use axum_extra::extract::cookie::CookieJar;
use service_core::axum::{extract::State, http::HeaderMap, Json};

use crate::{
    dtos::UserSummary,
    error::{self, GatewayError},
    middleware::authorize,
    AppState,
};

/// `GET /api/auth/me`
///
/// No identity call is made when the request carries no token at all.
pub async fn get_user(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Json<UserSummary>, GatewayError> {
    let ctx = authorize(state.identity.as_ref(), &state.cookies, &jar, &headers)?;

    let user = state
        .identity
        .user_by_id(&ctx.user_id)
        .await
        .map_err(error::profile_failure)?;

    Ok(Json(user))
}
