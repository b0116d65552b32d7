// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! shared between the `sessiongate` server and its clients.
//! This module defines the persisted session format and the HTTP API bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque user identifier (a UUID v4 rendered as a string)
pub type UserId = String;

/// Session token carried in the session cookie
pub type SessionId = String;

/// A session as it is written to the persisted session file.
///
/// The file holds a JSON array of these objects; lookups scan the whole
/// array for an exact `session_id` match.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PersistedSession {
    /// Owner of the session
    pub user_id: UserId,
    /// Token handed to the client
    pub session_id: SessionId,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// When the session stops authenticating; `null` means never
    pub expiration_time: Option<DateTime<Utc>>,
}

/// The user shape that is allowed to leave the server
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicUser {
    pub id: UserId,
    pub email: String,
}

/// Form body for `POST /users` and `POST /auth_session/login`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CredentialsForm {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Form body for `POST /reset_password`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ResetRequestForm {
    #[serde(default)]
    pub email: Option<String>,
}

/// Form body for `PUT /reset_password`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ResetPasswordForm {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub reset_token: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

/// Response to `GET /status`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}

/// Generic acknowledgement carrying the affected email
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub email: String,
    pub message: String,
}

/// Response to `POST /reset_password`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResetTokenResponse {
    pub email: String,
    pub reset_token: String,
}

/// Error payload rendered for every failed request
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Stable code plus a sanitized, user-facing message
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
