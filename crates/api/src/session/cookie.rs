use axum::http::header::{HeaderMap, COOKIE};
use axum::http::HeaderValue;
use chrono::Duration;
use studysync_domain::constants::SESSION_COOKIE_NAME;
use studysync_domain::{Result, StudySyncError};

/// Value of the session cookie from the request's `Cookie` headers.
pub fn read_session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value carrying a signed session token.
pub fn session_cookie_header(token: &str, ttl: Duration, secure: bool) -> Result<HeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        ttl.num_seconds()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|e| StudySyncError::Internal(format!("unencodable session cookie: {e}")))
}
