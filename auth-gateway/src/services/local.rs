use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use uuid::Uuid;

use super::{IdentityError, IdentityService, TokenService};
use crate::dtos::{AuthResult, Credentials, UserSummary};
use crate::utils::{Password, PasswordHashString};

#[derive(Debug, Clone)]
struct UserRecord {
    id: String,
    email: String,
    password_hash: PasswordHashString,
    created_at: DateTime<Utc>,
}

impl UserRecord {
    fn summary(&self) -> UserSummary {
        UserSummary::new(serde_json::json!({
            "id": self.id,
            "email": self.email,
            "createdAt": self.created_at,
        }))
    }
}

/// In-process identity backend: users live in memory, passwords are
/// argon2-hashed and sessions are HS256 tokens. No OAuth providers are
/// configured.
pub struct LocalIdentityService {
    users_by_email: DashMap<String, UserRecord>,
    emails_by_id: DashMap<String, String>,
    tokens: TokenService,
}

impl LocalIdentityService {
    pub fn new(tokens: TokenService) -> Self {
        Self {
            users_by_email: DashMap::new(),
            emails_by_id: DashMap::new(),
            tokens,
        }
    }

    fn auth_result(&self, user: &UserRecord) -> Result<AuthResult, IdentityError> {
        let access_token = self.tokens.issue(&user.id, &user.email)?;
        Ok(AuthResult {
            access_token,
            user: user.summary(),
        })
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl IdentityService for LocalIdentityService {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthResult, IdentityError> {
        let user = self
            .users_by_email
            .get(&email_key(&credentials.email))
            .map(|entry| entry.value().clone())
            .ok_or(IdentityError::UserNotFound)?;

        if !Password::new(credentials.password.as_str()).matches(&user.password_hash)? {
            return Err(IdentityError::InvalidCredential);
        }

        tracing::info!(user_id = %user.id, "User signed in");
        self.auth_result(&user)
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<AuthResult, IdentityError> {
        let key = email_key(&credentials.email);
        if self.users_by_email.contains_key(&key) {
            return Err(IdentityError::UserExists);
        }

        // Hash outside the map entry so no shard lock is held while hashing.
        let password_hash = Password::new(credentials.password.as_str()).hash()?;
        let user = UserRecord {
            id: Uuid::new_v4().to_string(),
            email: key.clone(),
            password_hash,
            created_at: Utc::now(),
        };

        match self.users_by_email.entry(key) {
            Entry::Occupied(_) => return Err(IdentityError::UserExists),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
            }
        }
        self.emails_by_id.insert(user.id.clone(), user.email.clone());

        tracing::info!(user_id = %user.id, "User registered");
        self.auth_result(&user)
    }

    async fn oauth_sign_in(
        &self,
        provider: &str,
        _code: &str,
        _redirect_uri: &str,
    ) -> Result<AuthResult, IdentityError> {
        Err(IdentityError::Unknown(anyhow::anyhow!(
            "oauth provider '{}' is not configured",
            provider
        )))
    }

    fn oauth_url(&self, provider: &str, _redirect_uri: &str) -> Result<String, IdentityError> {
        Err(IdentityError::Unknown(anyhow::anyhow!(
            "oauth provider '{}' is not configured",
            provider
        )))
    }

    fn verify_token(&self, token: &str) -> Result<String, IdentityError> {
        let claims = self.tokens.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            IdentityError::InvalidToken
        })?;
        Ok(claims.sub)
    }

    async fn user_by_id(&self, id: &str) -> Result<UserSummary, IdentityError> {
        let email = self
            .emails_by_id
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or(IdentityError::UserNotFound)?;

        self.users_by_email
            .get(&email)
            .map(|entry| entry.summary())
            .ok_or(IdentityError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenConfig;
    use secrecy::SecretString;

    fn service() -> LocalIdentityService {
        LocalIdentityService::new(TokenService::new(&TokenConfig {
            secret: SecretString::new("local-test-secret".to_string()),
            expiry_days: 7,
        }))
    }

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let identity = service();
        let creds = Credentials::new("Alice@Example.com", "correct horse");

        let registered = identity.sign_up(&creds).await.unwrap();
        let user_id = identity.verify_token(&registered.access_token).unwrap();
        assert_eq!(registered.user.0["id"], user_id.as_str());
        assert_eq!(registered.user.0["email"], "alice@example.com");

        let signed_in = identity
            .sign_in(&Credentials::new("alice@example.com", "correct horse"))
            .await
            .unwrap();
        assert_eq!(identity.verify_token(&signed_in.access_token).unwrap(), user_id);

        let profile = identity.user_by_id(&user_id).await.unwrap();
        assert_eq!(profile, registered.user);
    }

    #[tokio::test]
    async fn duplicate_sign_up_is_user_exists() {
        let identity = service();
        let creds = Credentials::new("bob@example.com", "pw");
        identity.sign_up(&creds).await.unwrap();
        assert!(matches!(
            identity.sign_up(&creds).await,
            Err(IdentityError::UserExists)
        ));
    }

    #[tokio::test]
    async fn sign_in_failures_are_tagged() {
        let identity = service();
        assert!(matches!(
            identity
                .sign_in(&Credentials::new("nobody@example.com", "pw"))
                .await,
            Err(IdentityError::UserNotFound)
        ));

        identity
            .sign_up(&Credentials::new("carol@example.com", "right"))
            .await
            .unwrap();
        assert!(matches!(
            identity
                .sign_in(&Credentials::new("carol@example.com", "wrong"))
                .await,
            Err(IdentityError::InvalidCredential)
        ));
    }

    #[test]
    fn garbage_token_is_invalid() {
        assert!(matches!(
            service().verify_token("not.a.jwt"),
            Err(IdentityError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn oauth_is_not_configured() {
        let err = service()
            .oauth_sign_in("github", "code", "https://app/cb")
            .await
            .unwrap_err();
        assert!(err.detail().contains("not configured"));
    }
}
