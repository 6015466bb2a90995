//! HTTP handlers for auth-gateway.

pub mod auth;
pub mod health;
pub mod method;

pub use auth::*;
pub use health::health_check;
