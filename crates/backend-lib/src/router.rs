// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router.
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{reset_password, session_auth, status, users},
    middleware::auth_gate,
    AppState,
};

/// Build the `/api/v1` router with the auth gate in front of every route,
/// including unknown ones. CORS sits outside the gate so preflight requests
/// are answered without credentials.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/status", get(status::status))
        .route("/unauthorized", get(status::unauthorized))
        .route("/forbidden", get(status::forbidden))
        .route("/users", post(users::register))
        .route("/users/me", get(users::me))
        .route("/auth_session/login", post(session_auth::login))
        .route("/auth_session/logout", delete(session_auth::logout))
        .route(
            "/reset_password",
            post(reset_password::request_token).put(reset_password::update_password),
        );

    Router::new()
        .nest("/api/v1", api)
        .fallback(status::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), auth_gate))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
