pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod utils;

use service_core::axum::{
    http::{header, HeaderValue},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, MethodRouter},
    Router,
};
use service_core::middleware::{security_headers_middleware, request_id_middleware};
use std::{sync::Arc, time::Duration};
use tower_http::{set_header::SetResponseHeaderLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::handlers::method::{method_not_allowed, method_not_allowed_json, preflight};
use crate::services::IdentityService;
use crate::utils::SessionCookieManager;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub identity: Arc<dyn IdentityService>,
    pub cookies: SessionCookieManager,
}

impl AppState {
    pub fn new(config: GatewayConfig, identity: Arc<dyn IdentityService>) -> Self {
        let cookies = SessionCookieManager::new(&config.session);
        Self {
            config: Arc::new(config),
            identity,
            cookies,
        }
    }
}

/// Gate every route of `router` behind the session check. Unmatched paths
/// still fall through to 404.
pub fn protect(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router.route_layer(from_fn_with_state(
        state.clone(),
        middleware::auth_middleware,
    ))
}

/// `OPTIONS` answers 200, anything else unsupported answers a plain-text 405.
/// `HEAD` is rejected too instead of falling through to a `GET` handler.
fn legacy(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route
        .head(method_not_allowed)
        .options(preflight)
        .fallback(method_not_allowed)
}

pub fn build_router(state: AppState) -> Router {
    // Every response on this route is JSON, the preflight and 405 included.
    // The provider is the segment after `oauth`; an empty one still reaches
    // the handler so it can answer 400, and trailing segments are ignored.
    let oauth_sign_in = post(handlers::oauth_sign_in)
        .options(preflight)
        .fallback(method_not_allowed_json);
    let oauth_sign_in_route = Router::new()
        .route("/api/auth/oauth/", oauth_sign_in.clone())
        .route("/api/auth/oauth/:provider", oauth_sign_in.clone())
        .route("/api/auth/oauth/:provider/*rest", oauth_sign_in)
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ));

    // Session introspection: auth applies to GET only so preflight stays open.
    let session_route = Router::new().route(
        "/api/auth/session",
        legacy(
            get(handlers::current_session).route_layer(from_fn_with_state(
                state.clone(),
                middleware::auth_middleware,
            )),
        ),
    );

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/auth/signin", legacy(post(handlers::sign_in)))
        .route("/api/auth/signup", legacy(post(handlers::sign_up)))
        .route("/api/auth/signout", legacy(post(handlers::sign_out)))
        .route("/api/auth/me", legacy(get(handlers::get_user)))
        .route("/api/auth/oauth/url/", legacy(get(handlers::oauth_url)))
        .route(
            "/api/auth/oauth/url/:provider",
            legacy(get(handlers::oauth_url)),
        )
        .merge(oauth_sign_in_route)
        .merge(session_route)
        .with_state(state.clone())
        // Client disconnects drop the handler future; this bounds the rest.
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.request_timeout_seconds,
        )))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &service_core::axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
}
