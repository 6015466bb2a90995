pub mod auth;

pub use auth::{auth_middleware, authorize, session_token, AuthzContext, GateState};
