// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the `sessiongate` server.

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::auth::{AuthService, AuthStrategy, DefaultAuth, ExcludedPaths, PasswordHasher};
use crate::clock::{Clock, SystemClock};
use crate::config::Settings;
use crate::error::AppError;
use crate::storage::{FlatFileUserStore, UserStore};

pub use router::create_router;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// The scheme chosen at startup
    pub strategy: Arc<AuthStrategy>,
    /// Paths the gate lets through unauthenticated
    pub excluded: Arc<ExcludedPaths>,
    /// User storage backend
    pub users: Arc<dyn UserStore>,
    /// Settings resolved at startup
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state over `users`
    pub async fn new(
        settings: Settings,
        users: Arc<dyn UserStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        let hasher = PasswordHasher::from_settings(&settings.password)?;
        let strategy =
            Arc::new(AuthStrategy::from_settings(&settings, users.clone(), hasher, clock).await?);
        let auth = Arc::new(DefaultAuth::new(users.clone(), strategy.clone(), hasher)?);
        let excluded = Arc::new(ExcludedPaths::new(&settings.auth.excluded_paths));

        Ok(Self {
            auth,
            strategy,
            excluded,
            users,
            settings: Arc::new(settings),
        })
    }

    /// Application state backed by `users.json` under the storage directory
    pub async fn from_settings(settings: Settings) -> Result<Self, AppError> {
        let users = Arc::new(FlatFileUserStore::open(&settings.storage.path).await?);
        Self::new(settings, users, Arc::new(SystemClock)).await
    }
}
