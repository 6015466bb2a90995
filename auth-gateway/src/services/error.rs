use thiserror::Error;

/// Failure kinds reported by an identity service.
///
/// Known outcomes are tagged variants. `Unknown` carries whatever opaque
/// error the backend or OAuth provider produced.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("user not found")]
    UserNotFound,

    #[error("invalid credential")]
    InvalidCredential,

    #[error("user already exists")]
    UserExists,

    #[error("provider rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("invalid or expired token")]
    InvalidToken,

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl IdentityError {
    /// Full error text including the source chain.
    pub fn detail(&self) -> String {
        match self {
            IdentityError::Unknown(err) => format!("{:#}", err),
            other => other.to_string(),
        }
    }
}
