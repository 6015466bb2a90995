use axum::http::{HeaderMap, Uri};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::config::SessionConfig;

pub const SESSION_COOKIE_NAME: &str = "auth_token";

/// `max_age` value that deletes the cookie.
pub const DELETE_MAX_AGE: i64 = -1;

/// Browser session artifact carrying the access token.
///
/// Name, path, HttpOnly and SameSite=Lax are fixed. `max_age` is in seconds,
/// with [`DELETE_MAX_AGE`] meaning "remove now".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub value: String,
    pub secure: bool,
    pub max_age: i64,
}

impl SessionCookie {
    pub fn is_removal(&self) -> bool {
        self.max_age < 0
    }
}

impl From<SessionCookie> for Cookie<'static> {
    fn from(session: SessionCookie) -> Self {
        let mut cookie = Cookie::build((SESSION_COOKIE_NAME, session.value.clone()))
            .path("/")
            .http_only(true)
            .secure(session.secure)
            .same_site(SameSite::Lax)
            .build();

        if session.is_removal() {
            // Empty value, Max-Age=0 and an expiry in the past.
            cookie.make_removal();
        } else {
            cookie.set_max_age(time::Duration::seconds(session.max_age));
        }

        cookie
    }
}

#[derive(Debug, Clone)]
pub struct SessionCookieManager {
    force_secure: bool,
    max_age_seconds: i64,
}

impl SessionCookieManager {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            force_secure: config.force_secure,
            max_age_seconds: config.max_age_days * 24 * 60 * 60,
        }
    }

    pub fn max_age_seconds(&self) -> i64 {
        self.max_age_seconds
    }

    /// Whether the request reached us over TLS, directly or via a proxy.
    pub fn is_secure_transport(&self, uri: &Uri, headers: &HeaderMap) -> bool {
        if self.force_secure {
            return true;
        }
        if uri.scheme_str() == Some("https") {
            return true;
        }
        headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|proto| proto.trim().eq_ignore_ascii_case("https"))
            .unwrap_or(false)
    }

    pub fn issue(&self, access_token: &str, secure: bool) -> SessionCookie {
        SessionCookie {
            value: access_token.to_string(),
            secure,
            max_age: self.max_age_seconds,
        }
    }

    pub fn clear(&self, secure: bool) -> SessionCookie {
        SessionCookie {
            value: String::new(),
            secure,
            max_age: DELETE_MAX_AGE,
        }
    }

    /// Adds the cookie to the outgoing jar. Always emits a `Set-Cookie`,
    /// even when the request carried no session.
    pub fn write(&self, jar: CookieJar, session: SessionCookie) -> CookieJar {
        jar.add(Cookie::from(session))
    }

    /// Non-empty session token from the request cookies.
    pub fn read<'a>(&self, jar: &'a CookieJar) -> Option<&'a str> {
        jar.get(SESSION_COOKIE_NAME)
            .map(|c| c.value())
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn manager() -> SessionCookieManager {
        SessionCookieManager::new(&SessionConfig::default())
    }

    #[test]
    fn issued_cookie_lasts_seven_days() {
        let manager = manager();
        assert_eq!(manager.max_age_seconds(), 604_800);

        let session = manager.issue("tok", false);
        assert_eq!(session.max_age, 604_800);

        let cookie = Cookie::from(session);
        assert_eq!(cookie.name(), "auth_token");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604_800)));
    }

    #[test]
    fn cleared_cookie_is_a_removal() {
        let session = manager().clear(false);
        assert_eq!(session.max_age, DELETE_MAX_AGE);
        assert!(session.value.is_empty());

        let rendered = Cookie::from(session).to_string();
        assert!(rendered.starts_with("auth_token=;"));
        assert!(rendered.contains("Max-Age=0"));
        assert!(rendered.contains("Expires="));
    }

    #[test]
    fn secure_follows_transport() {
        let m = manager();
        let uri: Uri = "/api/auth/signin".parse().unwrap();
        let mut headers = HeaderMap::new();
        assert!(!m.is_secure_transport(&uri, &headers));

        headers.insert("x-forwarded-proto", HeaderValue::from_static("https, http"));
        assert!(m.is_secure_transport(&uri, &headers));

        let forced = SessionCookieManager::new(&SessionConfig {
            force_secure: true,
            max_age_days: 7,
        });
        assert!(forced.is_secure_transport(&uri, &HeaderMap::new()));
    }

    #[test]
    fn max_age_follows_configured_days() {
        let manager = SessionCookieManager::new(&SessionConfig {
            force_secure: false,
            max_age_days: 1,
        });
        assert_eq!(manager.max_age_seconds(), 86_400);
        assert_eq!(manager.issue("tok", true).max_age, manager.max_age_seconds());
    }

    #[test]
    fn empty_cookie_is_not_a_token() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE_NAME, ""));
        assert_eq!(manager().read(&jar), None);

        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE_NAME, "tok"));
        assert_eq!(manager().read(&jar), Some("tok"));
    }
}
