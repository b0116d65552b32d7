use async_trait::async_trait;

use crate::{error::AppError, storage::UserRecord};

/// Account and session operations behind the HTTP handlers
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a user. Fails with `DuplicateRegistration` if the email is taken.
    async fn register_user(&self, email: &str, password: &str) -> Result<UserRecord, AppError>;

    /// Whether `password` is the password of the user with `email`
    async fn valid_login(&self, email: &str, password: &str) -> Result<bool, AppError>;

    /// The user for a correct email/password pair, `LoginFailed` otherwise
    async fn authenticate(&self, email: &str, password: &str) -> Result<UserRecord, AppError>;

    /// A fresh session for the user with `email`; `None` if there is no such
    /// user or the configured scheme has no sessions
    async fn create_session(&self, email: &str) -> Result<Option<String>, AppError>;

    async fn get_user_from_session_id(
        &self,
        session_id: &str,
    ) -> Result<Option<UserRecord>, AppError>;

    async fn destroy_session(&self, session_id: &str) -> Result<bool, AppError>;

    /// Issue a single-use reset token, replacing any earlier one for the user
    async fn get_reset_password_token(&self, email: &str) -> Result<String, AppError>;

    /// Consume a reset token and set a new password
    async fn update_password(&self, reset_token: &str, password: &str) -> Result<(), AppError>;
}
