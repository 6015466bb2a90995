use axum_extra::extract::cookie::CookieJar;
use service_core::axum::{
    body::Bytes,
    extract::{OriginalUri, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::{
    dtos::{AuthResult, OAuthExchange, OAuthUrlQuery, OAuthUrlResponse},
    error::{self, GatewayError, JsonError},
    utils::{parse_body, validation::required, validate_provider},
    AppState,
};

/// `POST /api/auth/oauth/{provider}`
///
/// Checks run in a fixed order: provider, then body syntax, then `code`.
/// The body is taken raw so a bad provider wins over a bad body.
pub async fn oauth_sign_in(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    jar: CookieJar,
    body: Bytes,
) -> Result<(StatusCode, CookieJar, Json<AuthResult>), JsonError> {
    let provider = validate_provider(uri.path())?;
    tracing::info!(provider = %provider, "OAuth sign-in");

    let exchange: OAuthExchange = parse_body(&body)?;

    let result = state
        .identity
        .oauth_sign_in(provider, &exchange.code, &exchange.redirect_uri)
        .await
        .map_err(|e| error::oauth_failure(provider, e))?;

    let secure = state.cookies.is_secure_transport(&uri, &headers);
    let jar = state
        .cookies
        .write(jar, state.cookies.issue(&result.access_token, secure));

    Ok((StatusCode::OK, jar, Json(result)))
}

/// `GET /api/auth/oauth/url/{provider}?redirect_uri=...`
pub async fn oauth_url(
    State(state): State<AppState>,
    provider: Option<Path<String>>,
    Query(query): Query<OAuthUrlQuery>,
) -> Result<Json<OAuthUrlResponse>, GatewayError> {
    let provider = provider.map(|Path(p)| p);
    let provider = required(provider.as_deref(), "Provider not specified")?;
    let redirect_uri = required(query.redirect_uri.as_deref(), "Redirect URI is required")?;

    let url = state
        .identity
        .oauth_url(provider, redirect_uri)
        .map_err(|e| error::oauth_url_failure(provider, e))?;

    Ok(Json(OAuthUrlResponse { url }))
}
