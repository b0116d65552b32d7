// ============================
// crates/backend-lib/src/auth/token_generator.rs
// ============================
//! Random identifiers for sessions and password resets.
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use uuid::Uuid;

/// Reset tokens carry 32 bytes (256 bits) of entropy
const RESET_TOKEN_BYTES: usize = 32;

/// A fresh session id: a random (v4) UUID, 122 bits of entropy.
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}

/** Generate a password-reset token.
Tokens are base64 URL-safe without padding so they survive form and query
encoding untouched. */
pub fn generate_reset_token() -> String {
    generate_secure_token_with_size(RESET_TOKEN_BYTES)
}

/// Fill `bytes` bytes from the OS RNG and encode them URL-safe
pub fn generate_secure_token_with_size(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}
