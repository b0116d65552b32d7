//! Liveness and fixed-error routes.
use axum::Json;
use sessiongate_common::StatusResponse;

use crate::error::AppError;

/// `GET /api/v1/status`
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "OK".to_string(),
    })
}

/// `GET /api/v1/unauthorized`: always 401
pub async fn unauthorized() -> Result<Json<StatusResponse>, AppError> {
    Err(AppError::MissingCredentials)
}

/// `GET /api/v1/forbidden`: always 403
pub async fn forbidden() -> Result<Json<StatusResponse>, AppError> {
    Err(AppError::InvalidCredentials)
}

pub async fn not_found() -> AppError {
    AppError::NotFound("route".to_string())
}
