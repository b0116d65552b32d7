// ============================
// crates/backend-lib/src/auth/session.rs
// ============================
//! Session records and the in-memory session store.
use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use metrics::{counter, gauge};
use parking_lot::Mutex;
use sessiongate_common::{PersistedSession, SessionId, UserId};

use super::token_generator::generate_session_id;
use crate::{clock::Clock, error::AppError, metrics as keys};

/// A session id bound to a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    /// `None` means the session never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// Create a record for `user_id` starting at `now`.
    /// A `ttl_secs` of zero or less means no expiry.
    pub fn new(session_id: SessionId, user_id: &str, ttl_secs: i64, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            user_id: user_id.to_string(),
            created_at: now,
            expires_at: (ttl_secs > 0).then(|| now + Duration::seconds(ttl_secs)),
        }
    }

    /// Expired once `now` is strictly past the expiry instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }
}

impl From<PersistedSession> for SessionRecord {
    fn from(p: PersistedSession) -> Self {
        Self {
            session_id: p.session_id,
            user_id: p.user_id,
            created_at: p.created_at,
            expires_at: p.expiration_time,
        }
    }
}

impl From<&SessionRecord> for PersistedSession {
    fn from(r: &SessionRecord) -> Self {
        Self {
            user_id: r.user_id.clone(),
            session_id: r.session_id.clone(),
            created_at: r.created_at,
            expiration_time: r.expires_at,
        }
    }
}

/// Storage for session-id to user-id associations.
///
/// Expired sessions are treated as absent by every operation, whether or not
/// they have been physically removed yet.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Mint a fresh session id for `user_id`
    async fn create(&self, user_id: &str, ttl_secs: i64) -> Result<SessionRecord, AppError>;

    /// The live session for `session_id`, if any
    async fn resolve(&self, session_id: &str) -> Result<Option<SessionRecord>, AppError>;

    /// Remove a session. Returns `true` iff a live session was removed.
    async fn destroy(&self, session_id: &str) -> Result<bool, AppError>;

    /// Drop every expired session, returning how many were removed
    async fn sweep_expired(&self) -> Result<usize, AppError>;

    /// Number of stored sessions, including expired ones not yet swept
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

pub(crate) fn ensure_user_id(user_id: &str) -> Result<(), AppError> {
    if user_id.trim().is_empty() {
        return Err(AppError::InvalidInput("user id must not be empty".to_string()));
    }
    Ok(())
}

/// Process-lifetime session store. Sessions do not survive a restart.
#[derive(Debug)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<SessionId, SessionRecord>>,
    clock: Arc<dyn Clock>,
}

impl MemorySessionStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: &str, ttl_secs: i64) -> Result<SessionRecord, AppError> {
        ensure_user_id(user_id)?;

        let now = self.clock.now();
        let mut sessions = self.sessions.lock();
        let session_id = loop {
            let candidate = generate_session_id();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };

        let record = SessionRecord::new(session_id, user_id, ttl_secs, now);
        sessions.insert(record.session_id.clone(), record.clone());

        counter!(keys::SESSION_CREATED).increment(1);
        gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);
        tracing::debug!(user_id, expires_at = ?record.expires_at, "session created");
        Ok(record)
    }

    async fn resolve(&self, session_id: &str) -> Result<Option<SessionRecord>, AppError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock();

        let expired = match sessions.get(session_id) {
            None => return Ok(None),
            Some(record) => record.is_expired_at(now),
        };

        if expired {
            sessions.remove(session_id);
            counter!(keys::SESSION_EXPIRED).increment(1);
            gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);
            return Ok(None);
        }

        Ok(sessions.get(session_id).cloned())
    }

    async fn destroy(&self, session_id: &str) -> Result<bool, AppError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock();

        let Some(record) = sessions.remove(session_id) else {
            return Ok(false);
        };
        gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);

        if record.is_expired_at(now) {
            counter!(keys::SESSION_EXPIRED).increment(1);
            return Ok(false);
        }

        counter!(keys::SESSION_DESTROYED).increment(1);
        tracing::debug!(user_id = %record.user_id, "session destroyed");
        Ok(true)
    }

    async fn sweep_expired(&self) -> Result<usize, AppError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, record| !record.is_expired_at(now));
        let removed = before - sessions.len();

        if removed > 0 {
            counter!(keys::SESSION_EXPIRED).increment(removed as u64);
            gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);
        }
        Ok(removed)
    }

    async fn len(&self) -> usize {
        self.sessions.lock().len()
    }
}
