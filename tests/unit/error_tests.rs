// =========================
// tests/unit/error_tests.rs
// =========================
//! Unit tests for the error module
use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
use sessiongate_backend::error::AppError;
use sessiongate_common::ErrorBody;
use std::io::{Error as IoError, ErrorKind};

#[test]
fn test_app_error_display() {
    assert_eq!(AppError::MissingCredentials.to_string(), "Missing credentials");
    assert_eq!(
        AppError::DuplicateRegistration("a@x.com".to_string()).to_string(),
        "Email already registered: a@x.com"
    );

    let io_error = AppError::Io(IoError::new(ErrorKind::NotFound, "File not found"));
    assert!(io_error.to_string().contains("IO error"));
}

#[test]
fn test_gate_outcomes_map_to_distinct_statuses() {
    assert_eq!(AppError::MissingCredentials.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::FORBIDDEN);
    assert_ne!(
        AppError::MissingCredentials.error_code(),
        AppError::InvalidCredentials.error_code()
    );
}

#[tokio::test]
async fn test_internal_detail_never_reaches_the_body() {
    for error in [
        AppError::Internal("panicked at src/lib.rs:42".to_string()),
        AppError::Io(IoError::new(ErrorKind::Other, "/data/users.json: EIO")),
        AppError::StoreUnavailable("/data/user_sessions.json: ENOSPC".to_string()),
    ] {
        let status = error.status_code();
        let response = error.into_response();
        assert_eq!(response.status(), status);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert!(!body.error.message.contains("/data"));
        assert!(!body.error.message.contains("src/lib.rs"));
    }
}
