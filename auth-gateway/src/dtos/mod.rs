pub mod auth;

pub use auth::{AuthResult, Credentials, OAuthExchange, OAuthUrlQuery, OAuthUrlResponse, SignOutResponse, UserSummary};
