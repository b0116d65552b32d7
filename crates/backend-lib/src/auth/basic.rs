// ============================
// crates/backend-lib/src/auth/basic.rs
// ============================
//! HTTP Basic credential extraction and verification.
use std::{fmt, sync::Arc};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use zeroize::Zeroizing;

use super::password::PasswordHasher;
use crate::{
    error::AppError,
    storage::{UserRecord, UserStore},
};

/// Scheme prefix of a Basic `Authorization` header, including the space
pub const BASIC_PREFIX: &str = "Basic ";

/// An identifier/secret pair taken from a Basic header
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub identifier: String,
    pub secret: Zeroizing<String>,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// The token after `Basic `. The prefix is case-sensitive and must be
/// followed by exactly one space.
pub fn extract_base64_authorization_header(header: Option<&str>) -> Option<&str> {
    header?.strip_prefix(BASIC_PREFIX)
}

/// Strict standard-alphabet base64 decode. Anything that is not valid
/// base64 or does not decode to UTF-8 is `None`.
pub fn decode_base64_authorization_header(token: Option<&str>) -> Option<String> {
    let bytes = STANDARD.decode(token?).ok()?;
    String::from_utf8(bytes).ok()
}

/// Split `identifier:secret` at the first colon. The secret may itself
/// contain colons; the identifier may be empty.
pub fn extract_user_credentials(decoded: Option<&str>) -> Option<Credential> {
    let (identifier, secret) = decoded?.split_once(':')?;
    Some(Credential {
        identifier: identifier.to_string(),
        secret: Zeroizing::new(secret.to_string()),
    })
}

/// Header value to credential in one step
pub fn credential_from_header(header: Option<&str>) -> Option<Credential> {
    let token = extract_base64_authorization_header(header);
    let decoded = Zeroizing::new(decode_base64_authorization_header(token)?);
    extract_user_credentials(Some(decoded.as_str()))
}

/// Resolves Basic credentials against a [`UserStore`]
#[derive(Clone)]
pub struct BasicAuth {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    /// Verified against when the identifier is unknown, so unknown users
    /// cost the same as wrong passwords
    dummy_digest: String,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth").field("hasher", &self.hasher).finish_non_exhaustive()
    }
}

impl BasicAuth {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher) -> Result<Self, AppError> {
        let dummy_digest = hasher.hash(&super::token_generator::generate_reset_token())?;
        Ok(Self {
            users,
            hasher,
            dummy_digest,
        })
    }

    /// The user owning `identifier` if `secret` is its password
    pub async fn user_object_from_credentials(
        &self,
        credential: &Credential,
    ) -> Result<Option<UserRecord>, AppError> {
        let user = self.users.find_by_email(&credential.identifier).await?;
        let digest = user
            .as_ref()
            .map_or_else(|| self.dummy_digest.clone(), |u| u.password_digest.clone());

        let verified = self
            .hasher
            .verify_async(digest, credential.secret.to_string())
            .await;

        match user {
            Some(user) if verified => Ok(Some(user)),
            _ => {
                tracing::debug!("basic credentials rejected");
                Ok(None)
            },
        }
    }
}
