//! Email/password login and logout for the session schemes.
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, Uri},
    response::{IntoResponse, Response},
    Form, Json,
};
use sessiongate_common::CredentialsForm;

use super::{clear_session_cookie, session_cookie};
use crate::{auth::AuthRequest, error::AppError, validation, AppState};

/// `POST /api/v1/auth_session/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let email = validation::require_email(form.email.as_deref())?;
    let password = validation::require_password(form.password.as_deref())?;

    if !state.strategy.uses_sessions() {
        return Err(AppError::NotFound("session login".to_string()));
    }

    let user = state.auth.authenticate(email, password).await?;
    let Some(session_id) = state.auth.create_session(&user.email).await? else {
        return Err(AppError::NotFound("session login".to_string()));
    };

    let strategy = &state.strategy;
    let cookie = session_cookie(strategy.session_name(), &session_id, strategy.session_ttl_secs())?;
    tracing::info!(user_id = %user.id, "session login");
    Ok(([(SET_COOKIE, cookie)], Json(user.to_public())).into_response())
}

/// `DELETE /api/v1/auth_session/logout`
pub async fn logout(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let request = AuthRequest::new(uri.path(), &headers);
    if !state.strategy.destroy_session(&request).await? {
        return Err(AppError::NotFound("session".to_string()));
    }

    let cookie = clear_session_cookie(state.strategy.session_name())?;
    Ok(([(SET_COOKIE, cookie)], Json(serde_json::json!({}))).into_response())
}
