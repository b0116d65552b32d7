// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use rand::rngs::OsRng;
use scrypt::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Params, Scrypt,
};

use crate::config::PasswordSettings;
use crate::error::AppError;

/// Salted scrypt hasher producing PHC-format digests.
///
/// Every call to [`PasswordHasher::hash`] draws a fresh salt, so two digests
/// of the same password never compare equal; use [`PasswordHasher::verify`].
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    params: Params,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::recommended(),
        }
    }
}

impl PasswordHasher {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn from_settings(settings: &PasswordSettings) -> Result<Self, AppError> {
        let params = Params::new(settings.log_n, settings.r, settings.p, Params::RECOMMENDED_LEN)
            .map_err(|e| AppError::Internal(format!("invalid scrypt parameters: {e}")))?;
        Ok(Self { params })
    }

    /// Hash a password using scrypt
    pub fn hash(&self, plain: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Scrypt
            .hash_password_customized(plain.as_bytes(), None, None, self.params, &salt)
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?
            .to_string();
        Ok(hash)
    }

    /// Verify a password against a digest. A malformed digest verifies as false.
    pub fn verify(&self, digest: &str, plain: &str) -> bool {
        let parsed_hash = match PasswordHash::new(digest) {
            Ok(h) => h,
            Err(_) => return false,
        };
        Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
    }

    /// [`PasswordHasher::hash`] on the blocking pool
    pub async fn hash_async(&self, plain: String) -> Result<String, AppError> {
        let hasher = *self;
        let plain = zeroize::Zeroizing::new(plain);
        tokio::task::spawn_blocking(move || hasher.hash(&plain)).await?
    }

    /// [`PasswordHasher::verify`] on the blocking pool
    pub async fn verify_async(&self, digest: String, plain: String) -> bool {
        let hasher = *self;
        let plain = zeroize::Zeroizing::new(plain);
        tokio::task::spawn_blocking(move || hasher.verify(&digest, &plain))
            .await
            .unwrap_or(false)
    }
}

#[cfg(test)]
pub(crate) fn fast_hasher() -> PasswordHasher {
    PasswordHasher::new(Params::new(4, 8, 1, Params::RECOMMENDED_LEN).unwrap())
}
