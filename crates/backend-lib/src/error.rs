// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sessiongate_common::{ErrorBody, ErrorDetail};
use thiserror::Error;

use crate::validation::ValidationError;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    /// The gate required authentication and the request carried neither an
    /// Authorization header nor a session cookie.
    #[error("Missing credentials")]
    MissingCredentials,

    /// Credentials were present but did not resolve to a user.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Email/password login failed. Unknown email and wrong password are
    /// deliberately the same variant.
    #[error("Login failed")]
    LoginFailed,

    #[error("Email already registered: {0}")]
    DuplicateRegistration(String),

    #[error("No user for email: {0}")]
    UnknownEmail(String),

    #[error("Invalid reset token")]
    InvalidResetToken,

    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingCredentials | AppError::LoginFailed => StatusCode::UNAUTHORIZED,
            AppError::InvalidCredentials
            | AppError::InvalidResetToken
            | AppError::UnknownEmail(_) => StatusCode::FORBIDDEN,
            AppError::DuplicateRegistration(_) | AppError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            },
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingCredentials => "AUTH_001",
            AppError::InvalidCredentials => "AUTH_002",
            AppError::LoginFailed => "AUTH_003",
            AppError::InvalidResetToken => "AUTH_004",
            AppError::DuplicateRegistration(_) => "USER_001",
            AppError::UnknownEmail(_) => "USER_002",
            AppError::StoreUnavailable(_) => "STORE_001",
            AppError::NotFound(_) => "NF_001",
            AppError::InvalidInput(_) => "VAL_001",
            AppError::Internal(_) => "INT_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
        }
    }

    /// Get a sanitized message suitable for the response body
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::MissingCredentials => "Unauthorized".to_string(),
            AppError::InvalidCredentials => "Forbidden".to_string(),
            AppError::LoginFailed => "Authentication failed".to_string(),
            AppError::InvalidResetToken | AppError::UnknownEmail(_) => "Forbidden".to_string(),
            AppError::DuplicateRegistration(_) => "email already registered".to_string(),
            AppError::StoreUnavailable(_) => {
                "Service temporarily unavailable, please try again later".to_string()
            },
            AppError::NotFound(_) => "Not found".to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Internal(_) | AppError::Io(_) | AppError::Json(_) => {
                "An internal server error occurred".to_string()
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(error = %self, code = self.error_code(), "request failed");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.sanitized_message(),
            },
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("background task failed: {err}"))
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}
