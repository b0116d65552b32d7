// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Input validation for the registration and password-reset flows.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit
const MAX_PASSWORD_LENGTH: usize = 128;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Possible validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("email missing")]
    MissingEmail,

    #[error("password missing")]
    MissingPassword,

    #[error("reset token missing")]
    MissingResetToken,

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Require a form field to be present and non-blank
pub fn require_email(email: Option<&str>) -> ValidationResult<&str> {
    match email.map(str::trim) {
        Some(e) if !e.is_empty() => Ok(e),
        _ => Err(ValidationError::MissingEmail),
    }
}

/// Passwords are taken verbatim; only emptiness is checked here
pub fn require_password(password: Option<&str>) -> ValidationResult<&str> {
    match password {
        Some(p) if !p.is_empty() => Ok(p),
        _ => Err(ValidationError::MissingPassword),
    }
}

pub fn require_reset_token(token: Option<&str>) -> ValidationResult<&str> {
    match token.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t),
        _ => Err(ValidationError::MissingResetToken),
    }
}

/// Validate the shape of an email address used for registration
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(format!(
            "Email must be at most {MAX_EMAIL_LENGTH} characters"
        )));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail(
            "Email format is invalid".to_string(),
        ));
    }

    Ok(email)
}

/// Validate a new password before it is hashed
pub fn validate_password(password: &str) -> ValidationResult<&str> {
    if password.is_empty() {
        return Err(ValidationError::MissingPassword);
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(password)
}
