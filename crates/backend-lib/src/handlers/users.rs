//! Registration and the current-user route.
use std::sync::Arc;

use axum::{extract::State, Extension, Form, Json};
use sessiongate_common::{CredentialsForm, MessageResponse, PublicUser};

use crate::{error::AppError, middleware::CurrentUser, validation, AppState};

/// `POST /api/v1/users`
pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CredentialsForm>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = validation::require_email(form.email.as_deref())?;
    let password = validation::require_password(form.password.as_deref())?;
    validation::validate_email(email)?;
    validation::validate_password(password)?;

    let user = state.auth.register_user(email, password).await?;
    Ok(Json(MessageResponse {
        email: user.email,
        message: "user created".to_string(),
    }))
}

/// `GET /api/v1/users/me`. 404 when the gate attached no user.
pub async fn me(current: Option<Extension<CurrentUser>>) -> Result<Json<PublicUser>, AppError> {
    match current {
        Some(Extension(CurrentUser(user))) => Ok(Json(user.to_public())),
        None => Err(AppError::NotFound("current user".to_string())),
    }
}
