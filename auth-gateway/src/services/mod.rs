//! Identity backends for the gateway.
//!
//! The gateway only depends on [`IdentityService`]; [`LocalIdentityService`]
//! is the in-process backend used by the binary in development.

pub mod error;
mod identity;
mod local;
mod token;

pub use error::IdentityError;
pub use identity::IdentityService;
pub use local::LocalIdentityService;
pub use token::{AccessTokenClaims, TokenService};
