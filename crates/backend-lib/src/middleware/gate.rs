//! The request gate: allow, 401 or 403 for every inbound request.
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics::counter;

use crate::{
    auth::{AuthRequest, AuthStrategy, ExcludedPaths},
    error::AppError,
    metrics as keys,
    storage::UserRecord,
    AppState,
};

/// Why the gate turned a request away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Neither an Authorization header nor a session cookie (401)
    MissingCredentials,
    /// Credentials were present but did not resolve to a user (403)
    InvalidCredentials,
}

impl From<Rejection> for AppError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::MissingCredentials => AppError::MissingCredentials,
            Rejection::InvalidCredentials => AppError::InvalidCredentials,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Let the request through, with the resolved user when auth was required
    Allow(Option<UserRecord>),
    Reject(Rejection),
}

/// The authenticated user, inserted into request extensions by [`auth_gate`]
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

/// Decide what happens to `request`. Only store failures are errors; every
/// credential problem becomes a [`Rejection`].
pub async fn evaluate(
    strategy: &AuthStrategy,
    excluded: &ExcludedPaths,
    request: &AuthRequest<'_>,
) -> Result<GateDecision, AppError> {
    if !strategy.require_auth(request.path(), excluded) {
        return Ok(GateDecision::Allow(None));
    }

    // presence decides 401; unreadable values fall through to 403
    if !request.has_authorization() && strategy.session_cookie(request).is_none() {
        counter!(keys::GATE_MISSING_CREDENTIALS).increment(1);
        return Ok(GateDecision::Reject(Rejection::MissingCredentials));
    }

    match strategy.current_user(request).await? {
        Some(user) => Ok(GateDecision::Allow(Some(user))),
        None => {
            counter!(keys::GATE_INVALID_CREDENTIALS).increment(1);
            Ok(GateDecision::Reject(Rejection::InvalidCredentials))
        },
    }
}

/// Axum middleware running [`evaluate`] in front of every route
pub async fn auth_gate(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();

    let decision = {
        let auth_request = AuthRequest::from_parts(&parts);
        evaluate(&state.strategy, &state.excluded, &auth_request).await?
    };

    match decision {
        GateDecision::Allow(user) => {
            if let Some(user) = user {
                parts.extensions.insert(CurrentUser(user));
            }
            Ok(next.run(Request::from_parts(parts, body)).await)
        },
        GateDecision::Reject(rejection) => {
            tracing::debug!(path = %parts.uri.path(), ?rejection, "request rejected");
            Err(rejection.into())
        },
    }
}
