//! Test helpers for auth-gateway integration tests.
//!
//! `ScriptedIdentity` stands in for the identity backend: every method
//! answers a scripted outcome and records the call it received.

#![allow(dead_code)]

use async_trait::async_trait;
use auth_gateway::{
    build_router,
    config::{Environment, GatewayConfig, SessionConfig, TokenConfig},
    dtos::{AuthResult, Credentials, UserSummary},
    services::{IdentityError, IdentityService},
    AppState,
};
use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use secrecy::SecretString;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const TEST_TOKEN: &str = "token-123";
pub const TEST_USER_ID: &str = "user-1";

/// What a scripted method answers.
#[derive(Debug, Clone)]
pub enum Outcome {
    Ok,
    UserNotFound,
    InvalidCredential,
    UserExists,
    RateLimited,
    InvalidToken,
    Unknown(String),
}

impl Outcome {
    fn into_error(self) -> Option<IdentityError> {
        match self {
            Outcome::Ok => None,
            Outcome::UserNotFound => Some(IdentityError::UserNotFound),
            Outcome::InvalidCredential => Some(IdentityError::InvalidCredential),
            Outcome::UserExists => Some(IdentityError::UserExists),
            Outcome::RateLimited => Some(IdentityError::RateLimited("provider".to_string())),
            Outcome::InvalidToken => Some(IdentityError::InvalidToken),
            Outcome::Unknown(msg) => Some(IdentityError::Unknown(anyhow::anyhow!(msg))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SignIn(String),
    SignUp(String),
    OAuthSignIn {
        provider: String,
        code: String,
        redirect_uri: String,
    },
    OAuthUrl {
        provider: String,
        redirect_uri: String,
    },
    VerifyToken(String),
    UserById(String),
}

pub struct ScriptedIdentity {
    pub sign_in: Outcome,
    pub sign_up: Outcome,
    pub oauth_sign_in: Outcome,
    pub oauth_url: Outcome,
    pub verify_token: Outcome,
    pub user_by_id: Outcome,
    pub calls: Mutex<Vec<Call>>,
}

impl Default for ScriptedIdentity {
    fn default() -> Self {
        Self {
            sign_in: Outcome::Ok,
            sign_up: Outcome::Ok,
            oauth_sign_in: Outcome::Ok,
            oauth_url: Outcome::Ok,
            verify_token: Outcome::Ok,
            user_by_id: Outcome::Ok,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedIdentity {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn answer<T>(outcome: &Outcome, value: impl FnOnce() -> T) -> Result<T, IdentityError> {
        match outcome.clone().into_error() {
            Some(err) => Err(err),
            None => Ok(value()),
        }
    }
}

pub fn test_user() -> UserSummary {
    UserSummary::new(serde_json::json!({
        "id": TEST_USER_ID,
        "email": "test@example.com",
        "name": "Test User",
    }))
}

fn auth_result() -> AuthResult {
    AuthResult {
        access_token: TEST_TOKEN.to_string(),
        user: test_user(),
    }
}

#[async_trait]
impl IdentityService for ScriptedIdentity {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthResult, IdentityError> {
        self.record(Call::SignIn(credentials.email.clone()));
        Self::answer(&self.sign_in, auth_result)
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<AuthResult, IdentityError> {
        self.record(Call::SignUp(credentials.email.clone()));
        Self::answer(&self.sign_up, auth_result)
    }

    async fn oauth_sign_in(
        &self,
        provider: &str,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AuthResult, IdentityError> {
        self.record(Call::OAuthSignIn {
            provider: provider.to_string(),
            code: code.to_string(),
            redirect_uri: redirect_uri.to_string(),
        });
        Self::answer(&self.oauth_sign_in, auth_result)
    }

    fn oauth_url(&self, provider: &str, redirect_uri: &str) -> Result<String, IdentityError> {
        self.record(Call::OAuthUrl {
            provider: provider.to_string(),
            redirect_uri: redirect_uri.to_string(),
        });
        Self::answer(&self.oauth_url, || {
            format!(
                "https://{}.example.com/authorize?redirect_uri={}",
                provider, redirect_uri
            )
        })
    }

    fn verify_token(&self, token: &str) -> Result<String, IdentityError> {
        self.record(Call::VerifyToken(token.to_string()));
        Self::answer(&self.verify_token, || TEST_USER_ID.to_string())
    }

    async fn user_by_id(&self, id: &str) -> Result<UserSummary, IdentityError> {
        self.record(Call::UserById(id.to_string()));
        Self::answer(&self.user_by_id, test_user)
    }
}

pub fn test_config() -> GatewayConfig {
    GatewayConfig {
        common: service_core::config::Config::default(),
        environment: Environment::Dev,
        service_name: "auth-gateway-test".to_string(),
        service_version: "0.0.0-test".to_string(),
        log_level: "error".to_string(),
        session: SessionConfig::default(),
        token: TokenConfig {
            secret: SecretString::new("integration-test-secret".to_string()),
            expiry_days: 7,
        },
        request_timeout_seconds: 5,
    }
}

pub fn test_state(identity: Arc<dyn IdentityService>) -> AppState {
    AppState::new(test_config(), identity)
}

pub fn app(identity: Arc<ScriptedIdentity>) -> Router {
    build_router(test_state(identity))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let text = body_text(response).await;
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("body is not JSON ({}): {}", e, text))
}

/// The `Set-Cookie` value for the session cookie, if one was written.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("auth_token="))
        .map(str::to_string)
}

pub fn content_type(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
