// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers for the `/api/v1` routes.

pub mod reset_password;
pub mod session_auth;
pub mod status;
pub mod users;

use axum::http::HeaderValue;

use crate::error::AppError;

/// `Set-Cookie` value carrying a session id
pub(crate) fn session_cookie(name: &str, session_id: &str, ttl_secs: i64) -> Result<HeaderValue, AppError> {
    let mut cookie = format!("{name}={session_id}; Path=/; HttpOnly; SameSite=Lax");
    if ttl_secs > 0 {
        cookie.push_str(&format!("; Max-Age={ttl_secs}"));
    }
    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::Internal(format!("invalid session cookie: {e}")))
}

/// `Set-Cookie` value that removes the session cookie
pub(crate) fn clear_session_cookie(name: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(&format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"))
        .map_err(|e| AppError::Internal(format!("invalid session cookie: {e}")))
}
