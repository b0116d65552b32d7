use std::sync::Arc;

use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use metrics::counter;
use sessiongate_common::UserId;

use crate::{
    auth::{
        password::PasswordHasher, strategy::AuthStrategy, token_generator::generate_reset_token,
        AuthService,
    },
    error::AppError,
    metrics as keys,
    storage::{UserRecord, UserStore},
};

pub struct DefaultAuth {
    users: Arc<dyn UserStore>,
    strategy: Arc<AuthStrategy>,
    hasher: PasswordHasher,
    /// Verified against for unknown emails
    dummy_digest: String,
    /// reset token -> owner
    reset_tokens: DashMap<String, UserId>,
    /// owner -> its one live reset token; the entry lock serialises issuing
    reset_owners: DashMap<UserId, String>,
}

impl DefaultAuth {
    pub fn new(
        users: Arc<dyn UserStore>,
        strategy: Arc<AuthStrategy>,
        hasher: PasswordHasher,
    ) -> Result<Self, AppError> {
        let dummy_digest = hasher.hash(&generate_reset_token())?;
        Ok(Self {
            users,
            strategy,
            hasher,
            dummy_digest,
            reset_tokens: DashMap::new(),
            reset_owners: DashMap::new(),
        })
    }

    /// Put back a token taken by a failed password update, unless a newer
    /// one was issued meanwhile
    fn restore_reset_token(&self, token: &str, user_id: UserId) {
        if let Entry::Vacant(slot) = self.reset_owners.entry(user_id.clone()) {
            slot.insert(token.to_string());
            self.reset_tokens.insert(token.to_string(), user_id);
        }
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn register_user(&self, email: &str, password: &str) -> Result<UserRecord, AppError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::DuplicateRegistration(email.to_string()));
        }

        let digest = self.hasher.hash_async(password.to_string()).await?;
        let user = self.users.insert(email, digest).await?;

        counter!(keys::USER_REGISTERED).increment(1);
        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    async fn valid_login(&self, email: &str, password: &str) -> Result<bool, AppError> {
        match self.authenticate(email, password).await {
            Ok(_) => Ok(true),
            Err(AppError::LoginFailed) => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<UserRecord, AppError> {
        let user = self.users.find_by_email(email).await?;
        let digest = user
            .as_ref()
            .map_or_else(|| self.dummy_digest.clone(), |u| u.password_digest.clone());

        // one verify on every path so unknown emails cost what wrong passwords do
        let verified = self.hasher.verify_async(digest, password.to_string()).await;

        match user {
            Some(user) if verified => Ok(user),
            _ => {
                counter!(keys::LOGIN_FAILED).increment(1);
                tracing::debug!("login rejected");
                Err(AppError::LoginFailed)
            },
        }
    }

    async fn create_session(&self, email: &str) -> Result<Option<String>, AppError> {
        match self.users.find_by_email(email).await? {
            Some(user) => self.strategy.create_session(&user.id).await,
            None => Ok(None),
        }
    }

    async fn get_user_from_session_id(
        &self,
        session_id: &str,
    ) -> Result<Option<UserRecord>, AppError> {
        self.strategy.user_for_session_id(session_id).await
    }

    async fn destroy_session(&self, session_id: &str) -> Result<bool, AppError> {
        self.strategy.destroy_session_id(session_id).await
    }

    async fn get_reset_password_token(&self, email: &str) -> Result<String, AppError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Err(AppError::UnknownEmail(email.to_string()));
        };

        let token = generate_reset_token();
        // revoke and issue under the owner's entry lock
        match self.reset_owners.entry(user.id.clone()) {
            Entry::Occupied(mut slot) => {
                let revoked = slot.insert(token.clone());
                self.reset_tokens.remove(&revoked);
                self.reset_tokens.insert(token.clone(), user.id.clone());
            },
            Entry::Vacant(slot) => {
                slot.insert(token.clone());
                self.reset_tokens.insert(token.clone(), user.id.clone());
            },
        }
        tracing::info!(user_id = %user.id, "reset token issued");
        Ok(token)
    }

    async fn update_password(&self, reset_token: &str, password: &str) -> Result<(), AppError> {
        let Some((_, user_id)) = self.reset_tokens.remove(reset_token) else {
            return Err(AppError::InvalidResetToken);
        };
        self.reset_owners.remove_if(&user_id, |_, live| live == reset_token);

        let digest = match self.hasher.hash_async(password.to_string()).await {
            Ok(digest) => digest,
            Err(err) => {
                self.restore_reset_token(reset_token, user_id);
                return Err(err);
            },
        };
        if let Err(err) = self.users.update_password_digest(&user_id, digest).await {
            // give the token back so the caller can retry
            self.restore_reset_token(reset_token, user_id);
            return Err(err);
        }
        tracing::info!(user_id = %user_id, "password updated");
        Ok(())
    }
}
