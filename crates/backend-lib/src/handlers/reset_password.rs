//! Password reset: issue a token, then trade it for a new password.
use std::sync::Arc;

use axum::{extract::State, Form, Json};
use sessiongate_common::{MessageResponse, ResetPasswordForm, ResetRequestForm, ResetTokenResponse};

use crate::{error::AppError, validation, AppState};

/// `POST /api/v1/reset_password`
pub async fn request_token(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ResetRequestForm>,
) -> Result<Json<ResetTokenResponse>, AppError> {
    let email = validation::require_email(form.email.as_deref())?;
    let reset_token = state.auth.get_reset_password_token(email).await?;
    Ok(Json(ResetTokenResponse {
        email: email.to_string(),
        reset_token,
    }))
}

/// `PUT /api/v1/reset_password`
pub async fn update_password(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ResetPasswordForm>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = validation::require_email(form.email.as_deref())?;
    let reset_token = validation::require_reset_token(form.reset_token.as_deref())?;
    let password = validation::require_password(form.new_password.as_deref())?;
    validation::validate_password(password)?;

    state.auth.update_password(reset_token, password).await?;
    Ok(Json(MessageResponse {
        email: email.to_string(),
        message: "Password updated".to_string(),
    }))
}
