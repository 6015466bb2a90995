use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Email/password pair for sign-in and sign-up. Presence is the only check.
#[derive(Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct Credentials {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body of `POST /api/auth/oauth/{provider}`. The provider itself comes from
/// the path.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct OAuthExchange {
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,

    #[serde(rename = "redirectUri", alias = "redirect_uri", alias = "redirectURI")]
    pub redirect_uri: String,
}

/// Query of `GET /api/auth/oauth/url/{provider}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OAuthUrlQuery {
    pub redirect_uri: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OAuthUrlResponse {
    pub url: String,
}

/// Opaque identity record. The gateway forwards it without looking inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserSummary(pub serde_json::Value);

impl UserSummary {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Outcome of every successful sign-in, sign-up or OAuth exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    pub access_token: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct SignOutResponse {
    pub success: bool,
}
