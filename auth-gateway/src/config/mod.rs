use secrecy::{ExposeSecret, SecretString};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Minimum token secret length accepted in production.
const MIN_PROD_SECRET_LEN: usize = 32;

#[derive(Debug)]
pub struct GatewayConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub session: SessionConfig,
    pub token: TokenConfig,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Always mark the session cookie `Secure`, even over plain HTTP.
    pub force_secure: bool,
    pub max_age_days: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            force_secure: false,
            max_age_days: 7,
        }
    }
}

#[derive(Debug)]
pub struct TokenConfig {
    pub secret: SecretString,
    pub expiry_days: i64,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let config = GatewayConfig {
            common: common_config,
            environment,
            service_name: get_env("SERVICE_NAME", Some("auth-gateway"), is_prod)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            session: SessionConfig {
                force_secure: parse_bool(&get_env("SESSION_COOKIE_SECURE", Some("false"), false)?)?,
                max_age_days: parse_num(
                    "SESSION_MAX_AGE_DAYS",
                    get_env("SESSION_MAX_AGE_DAYS", Some("7"), false)?,
                )?,
            },
            token: TokenConfig {
                secret: SecretString::new(get_env(
                    "TOKEN_SECRET",
                    Some("dev-only-token-secret-change-me"),
                    is_prod,
                )?),
                expiry_days: parse_num(
                    "TOKEN_EXPIRY_DAYS",
                    get_env("TOKEN_EXPIRY_DAYS", Some("7"), false)?,
                )?,
            },
            request_timeout_seconds: parse_num(
                "REQUEST_TIMEOUT_SECONDS",
                get_env("REQUEST_TIMEOUT_SECONDS", Some("30"), false)?,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.common.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }

        if self.session.max_age_days <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "SESSION_MAX_AGE_DAYS must be positive"
            )));
        }

        if self.token.expiry_days <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "TOKEN_EXPIRY_DAYS must be positive"
            )));
        }

        if self.request_timeout_seconds == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "REQUEST_TIMEOUT_SECONDS must be positive"
            )));
        }

        if self.environment == Environment::Prod {
            if self.token.secret.expose_secret().len() < MIN_PROD_SECRET_LEN {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "TOKEN_SECRET must be at least {} bytes in production",
                    MIN_PROD_SECRET_LEN
                )));
            }

            if !self.session.force_secure {
                tracing::warn!("SESSION_COOKIE_SECURE is off in production; Secure is decided per request");
            }
        }

        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_num<T>(key: &str, raw: String) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| AppError::ConfigError(anyhow::anyhow!("{}: {}", key, e)))
}

fn parse_bool(raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(AppError::ConfigError(anyhow::anyhow!(
            "Invalid boolean: {}",
            other
        ))),
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}
