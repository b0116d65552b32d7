// ============================
// crates/backend-lib/src/auth/strategy.rs
// ============================
//! The configured authentication scheme.
//!
//! Exactly one [`AuthStrategy`] is built at startup from [`AuthSettings`] and
//! shared by the gate and the session handlers.
use std::sync::Arc;

use super::{
    basic::{credential_from_header, BasicAuth},
    excluded::{self, ExcludedPaths},
    password::PasswordHasher,
    persistent_session::FileSessionStore,
    request::AuthRequest,
    session::{MemorySessionStore, SessionRecord, SessionStore},
};
use crate::{
    clock::Clock,
    config::{AuthType, Settings},
    error::AppError,
    storage::{UserRecord, UserStore},
};

/// Session-cookie authentication over some [`SessionStore`]
#[derive(Debug, Clone)]
pub struct SessionAuth {
    store: Arc<dyn SessionStore>,
    users: Arc<dyn UserStore>,
    /// Session lifetime in seconds; zero or less never expires
    ttl_secs: i64,
}

impl SessionAuth {
    pub fn new(store: Arc<dyn SessionStore>, users: Arc<dyn UserStore>, ttl_secs: i64) -> Self {
        Self {
            store,
            users,
            ttl_secs,
        }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    pub async fn create_session(&self, user_id: &str) -> Result<SessionRecord, AppError> {
        self.store.create(user_id, self.ttl_secs).await
    }

    /// The user behind a live session. A session whose user no longer
    /// exists resolves to nobody.
    pub async fn user_for_session_id(
        &self,
        session_id: &str,
    ) -> Result<Option<UserRecord>, AppError> {
        let Some(record) = self.store.resolve(session_id).await? else {
            return Ok(None);
        };
        self.users.find_by_id(&record.user_id).await
    }
}

/// The closed set of supported schemes
#[derive(Debug, Clone)]
pub enum Scheme {
    NoAuth,
    Basic(BasicAuth),
    /// In-memory sessions that never expire
    Session(SessionAuth),
    /// In-memory sessions with a lifetime
    SessionWithExpiry(SessionAuth),
    /// File-backed sessions with a lifetime
    SessionWithStore(SessionAuth),
}

/// The active scheme plus the name of the session cookie
#[derive(Debug, Clone)]
pub struct AuthStrategy {
    scheme: Scheme,
    session_name: String,
}

impl AuthStrategy {
    pub fn new(scheme: Scheme, session_name: impl Into<String>) -> Self {
        Self {
            scheme,
            session_name: session_name.into(),
        }
    }

    /// Build the strategy named by `settings.auth.auth_type`.
    ///
    /// The file-backed variant opens `user_sessions.json` under the storage
    /// directory; a session lifetime only applies to the expiring variants.
    pub async fn from_settings(
        settings: &Settings,
        users: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        let auth = &settings.auth;
        let ttl = auth.session_duration_secs;

        let scheme = match auth.auth_type {
            AuthType::NoAuth => Scheme::NoAuth,
            AuthType::BasicAuth => Scheme::Basic(BasicAuth::new(users, hasher)?),
            AuthType::SessionAuth => {
                let store = Arc::new(MemorySessionStore::new(clock));
                Scheme::Session(SessionAuth::new(store, users, 0))
            },
            AuthType::SessionExpAuth => {
                let store = Arc::new(MemorySessionStore::new(clock));
                Scheme::SessionWithExpiry(SessionAuth::new(store, users, ttl))
            },
            AuthType::SessionDbAuth => {
                let store = Arc::new(FileSessionStore::open(&settings.storage.path, clock).await?);
                Scheme::SessionWithStore(SessionAuth::new(store, users, ttl))
            },
        };

        tracing::info!(
            auth_type = auth.auth_type.as_str(),
            session_name = %auth.session_name,
            session_duration_secs = ttl,
            "authentication strategy selected"
        );
        Ok(Self::new(scheme, auth.session_name.clone()))
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn kind(&self) -> AuthType {
        match self.scheme {
            Scheme::NoAuth => AuthType::NoAuth,
            Scheme::Basic(_) => AuthType::BasicAuth,
            Scheme::Session(_) => AuthType::SessionAuth,
            Scheme::SessionWithExpiry(_) => AuthType::SessionExpAuth,
            Scheme::SessionWithStore(_) => AuthType::SessionDbAuth,
        }
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    fn sessions(&self) -> Option<&SessionAuth> {
        match &self.scheme {
            Scheme::Session(s) | Scheme::SessionWithExpiry(s) | Scheme::SessionWithStore(s) => {
                Some(s)
            },
            Scheme::NoAuth | Scheme::Basic(_) => None,
        }
    }

    /// Whether this scheme issues session cookies
    pub fn uses_sessions(&self) -> bool {
        self.sessions().is_some()
    }

    /// Lifetime of newly created sessions; zero when they never expire
    pub fn session_ttl_secs(&self) -> i64 {
        self.sessions().map_or(0, |s| s.ttl_secs().max(0))
    }

    /// Whether `path` must be authenticated. Never true without a scheme.
    pub fn require_auth(&self, path: Option<&str>, excluded: &ExcludedPaths) -> bool {
        match self.scheme {
            Scheme::NoAuth => false,
            _ => excluded::require_auth(path, excluded),
        }
    }

    pub fn authorization_header<'a>(&self, request: &AuthRequest<'a>) -> Option<&'a str> {
        request.authorization()
    }

    /// The session id from the configured cookie
    pub fn session_cookie<'a>(&self, request: &AuthRequest<'a>) -> Option<&'a str> {
        request.cookie(&self.session_name)
    }

    /// The user the request authenticates as, if any
    pub async fn current_user(
        &self,
        request: &AuthRequest<'_>,
    ) -> Result<Option<UserRecord>, AppError> {
        match &self.scheme {
            Scheme::NoAuth => Ok(None),
            Scheme::Basic(basic) => {
                let Some(credential) = credential_from_header(self.authorization_header(request))
                else {
                    return Ok(None);
                };
                basic.user_object_from_credentials(&credential).await
            },
            Scheme::Session(s) | Scheme::SessionWithExpiry(s) | Scheme::SessionWithStore(s) => {
                match self.session_cookie(request) {
                    Some(session_id) => s.user_for_session_id(session_id).await,
                    None => Ok(None),
                }
            },
        }
    }

    /// Mint a session for `user_id`; `None` when the scheme has no sessions
    pub async fn create_session(&self, user_id: &str) -> Result<Option<String>, AppError> {
        match self.sessions() {
            Some(s) => Ok(Some(s.create_session(user_id).await?.session_id)),
            None => Ok(None),
        }
    }

    pub async fn user_for_session_id(
        &self,
        session_id: &str,
    ) -> Result<Option<UserRecord>, AppError> {
        match self.sessions() {
            Some(s) => s.user_for_session_id(session_id).await,
            None => Ok(None),
        }
    }

    /// Destroy the session named by the request's cookie.
    /// `false` when there is no cookie or no live session behind it.
    pub async fn destroy_session(&self, request: &AuthRequest<'_>) -> Result<bool, AppError> {
        match self.session_cookie(request) {
            Some(session_id) => self.destroy_session_id(session_id).await,
            None => Ok(false),
        }
    }

    pub async fn destroy_session_id(&self, session_id: &str) -> Result<bool, AppError> {
        match self.sessions() {
            Some(s) => s.store().destroy(session_id).await,
            None => Ok(false),
        }
    }

    /// Drop expired sessions; a no-op for schemes without sessions
    pub async fn sweep_expired_sessions(&self) -> Result<usize, AppError> {
        match self.sessions() {
            Some(s) => s.store().sweep_expired().await,
            None => Ok(0),
        }
    }
}
