// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! User storage abstraction with in-memory and flat-file implementations.
use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use serde::{Deserialize, Serialize};
use sessiongate_common::{PublicUser, UserId};
use tokio::{fs as tokio_fs, io::AsyncWriteExt, sync::Mutex};
use uuid::Uuid;

use crate::error::AppError;

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    /// PHC-format scrypt digest
    pub password_digest: String,
}

impl UserRecord {
    pub fn new(email: &str, password_digest: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_digest,
        }
    }

    /// The user without its digest
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            email: self.email.clone(),
        }
    }
}

/// Trait for user storage backends
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    /// Look a user up by email (exact match)
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;

    /// Look a user up by id
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, AppError>;

    /// Insert a new user. Fails with `DuplicateRegistration` if the email is taken.
    async fn insert(&self, email: &str, password_digest: String) -> Result<UserRecord, AppError>;

    /// Replace a user's password digest
    async fn update_password_digest(&self, id: &str, password_digest: String)
        -> Result<(), AppError>;
}

/// Process-lifetime user store
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: DashMap<UserId, UserRecord>,
    by_email: DashMap<String, UserId>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let Some(id) = self.by_email.get(email).map(|id| id.clone()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, AppError> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn insert(&self, email: &str, password_digest: String) -> Result<UserRecord, AppError> {
        // the email entry is the uniqueness lock
        match self.by_email.entry(email.to_string()) {
            Entry::Occupied(_) => Err(AppError::DuplicateRegistration(email.to_string())),
            Entry::Vacant(slot) => {
                let user = UserRecord::new(email, password_digest);
                self.users.insert(user.id.clone(), user.clone());
                slot.insert(user.id.clone());
                Ok(user)
            },
        }
    }

    async fn update_password_digest(
        &self,
        id: &str,
        password_digest: String,
    ) -> Result<(), AppError> {
        match self.users.get_mut(id) {
            Some(mut user) => {
                user.password_digest = password_digest;
                Ok(())
            },
            None => Err(AppError::NotFound(format!("user {id}"))),
        }
    }
}

/// Flat-file implementation of the `UserStore` trait.
///
/// All users live in one JSON array (`users.json`). The file is rewritten
/// atomically on every mutation before the in-memory view changes.
#[derive(Debug)]
pub struct FlatFileUserStore {
    path: PathBuf,
    users: Mutex<Vec<UserRecord>>,
}

impl FlatFileUserStore {
    pub const FILE_NAME: &'static str = "users.json";

    /// Open (or create) the user file under `root`
    pub async fn open<P: AsRef<Path>>(root: P) -> Result<Self, AppError> {
        let root = root.as_ref();
        tokio_fs::create_dir_all(root).await?;
        let path = root.join(Self::FILE_NAME);
        let users: Vec<UserRecord> = read_json_list(&path).await?;
        tracing::info!(path = %path.display(), count = users.len(), "loaded users");
        Ok(Self {
            path,
            users: Mutex::new(users),
        })
    }
}

#[async_trait]
impl UserStore for FlatFileUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, AppError> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, email: &str, password_digest: String) -> Result<UserRecord, AppError> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.email == email) {
            return Err(AppError::DuplicateRegistration(email.to_string()));
        }

        let user = UserRecord::new(email, password_digest);
        users.push(user.clone());
        if let Err(err) = write_json_atomic(&self.path, &*users).await {
            users.pop();
            return Err(AppError::Io(err));
        }
        Ok(user)
    }

    async fn update_password_digest(
        &self,
        id: &str,
        password_digest: String,
    ) -> Result<(), AppError> {
        let mut users = self.users.lock().await;
        let Some(idx) = users.iter().position(|u| u.id == id) else {
            return Err(AppError::NotFound(format!("user {id}")));
        };

        let previous = std::mem::replace(&mut users[idx].password_digest, password_digest);
        if let Err(err) = write_json_atomic(&self.path, &*users).await {
            users[idx].password_digest = previous;
            return Err(AppError::Io(err));
        }
        Ok(())
    }
}

/// Read a JSON array file; a missing or empty file is an empty list.
pub(crate) async fn read_json_list<T>(path: &Path) -> io::Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    let content = match tokio_fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err),
    };

    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    serde_json::from_slice(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Write `value` as JSON to `path` via a synced temp file and a rename, so the
/// file is either the old contents or the new contents, never a mix.
pub(crate) async fn write_json_atomic<T>(path: &Path, value: &T) -> io::Result<()>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_vec_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let tmp = path.with_extension("json.tmp");
    let mut file = tokio_fs::File::create(&tmp).await?;
    file.write_all(&json).await?;
    file.sync_all().await?;
    drop(file);

    tokio_fs::rename(&tmp, path).await
}
