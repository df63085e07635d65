//! Session cookie transport.
//!
//! The session is a single httpOnly, SameSite=Lax cookie carrying the
//! signed token. The `Secure` flag follows the configured base URL so local
//! http development still works.

use axum::http::{HeaderMap, header};

use crate::session::SESSION_TTL_SECONDS;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "stockroom_session";

/// Build the `Set-Cookie` value installing a session token.
#[must_use]
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; Max-Age={SESSION_TTL_SECONDS}; HttpOnly; SameSite=Lax"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the `Set-Cookie` value clearing the session.
///
/// Sets an empty, immediately-expired replacement; sending it without an
/// existing session is harmless.
#[must_use]
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE_NAME}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Extract the session token from the request's `Cookie` header, if any.
#[must_use]
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        pair.trim()
            .strip_prefix(SESSION_COOKIE_NAME)?
            .strip_prefix('=')
    })
}
