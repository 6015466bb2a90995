pub mod password;
pub mod session_cookie;
pub mod validation;

pub use password::{Password, PasswordHashString};
pub use session_cookie::{SessionCookie, SessionCookieManager, SESSION_COOKIE_NAME};
pub use validation::{bearer_token, parse_body, validate_provider, ValidatedJson};
