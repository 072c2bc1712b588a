//! Session cookie encoding.

use axum::http::{header, HeaderMap};
use uuid::Uuid;

/// Session id carried by the request's `Cookie` headers, if well formed.
pub fn session_id(headers: &HeaderMap, cookie_name: &str) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| Uuid::parse_str(value.trim_matches('"')).ok())
}

/// `Set-Cookie` value establishing a session.
pub fn session_cookie(cookie_name: &str, id: &Uuid, max_age_secs: u64, secure: bool) -> String {
    build(cookie_name, &id.to_string(), max_age_secs, secure)
}

/// `Set-Cookie` value that deletes the session cookie.
pub fn clear_cookie(cookie_name: &str, secure: bool) -> String {
    build(cookie_name, "", 0, secure)
}

fn build(name: &str, value: &str, max_age_secs: u64, secure: bool) -> String {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
