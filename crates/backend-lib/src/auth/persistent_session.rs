// ============================
// crates/backend-lib/src/auth/persistent_session.rs
// ============================
//! Session store backed by a JSON file.
//!
//! Every mutation rewrites `user_sessions.json` durably (temp file, fsync,
//! rename) while holding the store lock, and only then updates the in-memory
//! view and returns. A caller that got `Ok` from `create` can rely on the
//! session surviving a restart. On I/O failure the store is left unchanged
//! and the error is [`AppError::StoreUnavailable`].
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use metrics::{counter, gauge};
use sessiongate_common::PersistedSession;
use tokio::{fs as tokio_fs, sync::Mutex};

use super::{
    session::{ensure_user_id, SessionRecord, SessionStore},
    token_generator::generate_session_id,
};
use crate::{
    clock::Clock,
    error::AppError,
    metrics as keys,
    storage::{read_json_list, write_json_atomic},
};

/// File-backed [`SessionStore`]
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    sessions: Mutex<Vec<SessionRecord>>,
    clock: Arc<dyn Clock>,
}

impl FileSessionStore {
    pub const FILE_NAME: &'static str = "user_sessions.json";

    /// Open the session file under `root`, creating the directory if needed.
    /// Sessions written by a previous run are loaded as-is, expired or not.
    pub async fn open<P: AsRef<Path>>(root: P, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        let root = root.as_ref();
        tokio_fs::create_dir_all(root).await.map_err(unavailable)?;
        let path = root.join(Self::FILE_NAME);

        let persisted: Vec<PersistedSession> = read_json_list(&path).await.map_err(unavailable)?;
        let sessions: Vec<SessionRecord> = persisted.into_iter().map(SessionRecord::from).collect();
        tracing::info!(path = %path.display(), count = sessions.len(), "loaded sessions");
        gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);

        Ok(Self {
            path,
            sessions: Mutex::new(sessions),
            clock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, sessions: &[SessionRecord]) -> Result<(), AppError> {
        let persisted: Vec<PersistedSession> = sessions.iter().map(PersistedSession::from).collect();
        write_json_atomic(&self.path, &persisted).await.map_err(|err| {
            tracing::error!(path = %self.path.display(), error = %err, "failed to persist sessions");
            unavailable(err)
        })
    }
}

fn unavailable(err: std::io::Error) -> AppError {
    AppError::StoreUnavailable(err.to_string())
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn create(&self, user_id: &str, ttl_secs: i64) -> Result<SessionRecord, AppError> {
        ensure_user_id(user_id)?;

        let mut sessions = self.sessions.lock().await;
        let session_id = loop {
            let candidate = generate_session_id();
            if !sessions.iter().any(|s| s.session_id == candidate) {
                break candidate;
            }
        };

        let record = SessionRecord::new(session_id, user_id, ttl_secs, self.clock.now());
        sessions.push(record.clone());
        if let Err(err) = self.persist(&sessions).await {
            sessions.pop();
            return Err(err);
        }

        counter!(keys::SESSION_CREATED).increment(1);
        gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);
        tracing::debug!(user_id, expires_at = ?record.expires_at, "session persisted");
        Ok(record)
    }

    async fn resolve(&self, session_id: &str) -> Result<Option<SessionRecord>, AppError> {
        let now = self.clock.now();
        let sessions = self.sessions.lock().await;
        Ok(sessions
            .iter()
            .find(|s| s.session_id == session_id)
            .filter(|s| !s.is_expired_at(now))
            .cloned())
    }

    async fn destroy(&self, session_id: &str) -> Result<bool, AppError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().await;
        let Some(idx) = sessions.iter().position(|s| s.session_id == session_id) else {
            return Ok(false);
        };

        let record = sessions.remove(idx);
        if let Err(err) = self.persist(&sessions).await {
            sessions.insert(idx, record);
            return Err(err);
        }
        gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);

        if record.is_expired_at(now) {
            counter!(keys::SESSION_EXPIRED).increment(1);
            return Ok(false);
        }
        counter!(keys::SESSION_DESTROYED).increment(1);
        Ok(true)
    }

    async fn sweep_expired(&self) -> Result<usize, AppError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().await;

        let live: Vec<SessionRecord> = sessions
            .iter()
            .filter(|s| !s.is_expired_at(now))
            .cloned()
            .collect();
        let removed = sessions.len() - live.len();
        if removed == 0 {
            return Ok(0);
        }

        self.persist(&live).await?;
        *sessions = live;

        counter!(keys::SESSION_EXPIRED).increment(removed as u64);
        gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);
        tracing::info!(removed, "swept expired sessions");
        Ok(removed)
    }

    async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
