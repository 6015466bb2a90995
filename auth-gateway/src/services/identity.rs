use async_trait::async_trait;

use super::IdentityError;
use crate::dtos::{AuthResult, Credentials, UserSummary};

/// Capability the gateway needs from the credential & identity backend.
///
/// Async calls are cancelled by dropping their future, which axum does when
/// the client disconnects or the request deadline elapses.
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthResult, IdentityError>;

    async fn sign_up(&self, credentials: &Credentials) -> Result<AuthResult, IdentityError>;

    async fn oauth_sign_in(
        &self,
        provider: &str,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AuthResult, IdentityError>;

    fn oauth_url(&self, provider: &str, redirect_uri: &str) -> Result<String, IdentityError>;

    /// Returns the user id the token was issued for.
    fn verify_token(&self, token: &str) -> Result<String, IdentityError>;

    async fn user_by_id(&self, id: &str) -> Result<UserSummary, IdentityError>;

    async fn health_check(&self) -> Result<(), IdentityError> {
        Ok(())
    }
}
