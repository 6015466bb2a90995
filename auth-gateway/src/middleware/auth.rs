use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    error::{self, GatewayError},
    services::IdentityService,
    utils::{bearer_token, SessionCookieManager},
    AppState,
};

/// Identity attached to a request that passed the gate. Lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthzContext {
    pub user_id: String,
}

/// Session token from the `auth_token` cookie, else the bearer header.
pub fn session_token(
    cookies: &SessionCookieManager,
    jar: &CookieJar,
    headers: &HeaderMap,
) -> Option<String> {
    cookies
        .read(jar)
        .or_else(|| bearer_token(headers))
        .map(str::to_string)
}

/// Stages of the protected-route gate.
///
/// `Rejected` is reachable from `Unauthenticated` (no token) and from
/// `TokenExtracted` (verification failed). Verification is never retried.
#[derive(Debug)]
pub enum GateState {
    Unauthenticated,
    TokenExtracted(String),
    Verified(String),
    Authorized(AuthzContext),
    Rejected(GatewayError),
}

impl GateState {
    pub fn advance(
        self,
        identity: &dyn IdentityService,
        cookies: &SessionCookieManager,
        jar: &CookieJar,
        headers: &HeaderMap,
    ) -> Self {
        match self {
            GateState::Unauthenticated => match session_token(cookies, jar, headers) {
                Some(token) => GateState::TokenExtracted(token),
                None => GateState::Rejected(GatewayError::unauthorized()),
            },
            GateState::TokenExtracted(token) => match identity.verify_token(&token) {
                Ok(user_id) => GateState::Verified(user_id),
                Err(e) => GateState::Rejected(error::token_failure(e)),
            },
            GateState::Verified(user_id) => GateState::Authorized(AuthzContext { user_id }),
            terminal => terminal,
        }
    }
}

/// Run the gate to a terminal state.
pub fn authorize(
    identity: &dyn IdentityService,
    cookies: &SessionCookieManager,
    jar: &CookieJar,
    headers: &HeaderMap,
) -> Result<AuthzContext, GatewayError> {
    let mut gate = GateState::Unauthenticated;
    loop {
        gate = match gate.advance(identity, cookies, jar, headers) {
            GateState::Authorized(ctx) => return Ok(ctx),
            GateState::Rejected(err) => return Err(err),
            next => next,
        };
    }
}

/// Middleware to require authentication
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    let ctx = authorize(
        state.identity.as_ref(),
        &state.cookies,
        &jar,
        req.headers(),
    )?;

    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthzContext
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthzContext>().cloned().ok_or_else(|| {
            tracing::error!("Auth context missing from request extensions");
            GatewayError::internal()
        })
    }
}
