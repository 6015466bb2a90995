use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use std::fmt;

/// Clear-text password. `Debug` never prints the value.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// Argon2id PHC string with a fresh random salt.
    pub fn hash(&self) -> Result<PasswordHashString, anyhow::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(self.0.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();
        Ok(PasswordHashString(hash))
    }

    /// Constant-time comparison against a stored hash.
    pub fn matches(&self, stored: &PasswordHashString) -> Result<bool, anyhow::Error> {
        let parsed = PasswordHash::new(&stored.0)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;

        Ok(Argon2::default()
            .verify_password(self.0.as_bytes(), &parsed)
            .is_ok())
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

#[derive(Debug, Clone)]
pub struct PasswordHashString(String);

impl PasswordHashString {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
