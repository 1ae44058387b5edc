//! Credential store: registration, password verification, and login tracking.
//!
//! Raw passwords are hashed on the blocking thread pool and only the PHC hash
//! reaches the storage collaborator. No method returns a password hash.

use std::sync::Arc;

use messagely_core::error::CoreError;
use messagely_core::types::Timestamp;
use messagely_core::validation::{validate_input, NewIdentity};
use messagely_db::models::user::{CreateUser, UserDetail};
use messagely_db::store::{IdentityStore, StoreError};

use crate::auth::jwt::TokenIssuer;
use crate::auth::password::{hash_password, verify_password, PasswordError};
use crate::error::{AppError, AppResult};

/// Verifies and stores hashed credentials on top of an [`IdentityStore`].
pub struct CredentialStore {
    identities: Arc<dyn IdentityStore>,
    work_factor: u32,
    /// Verified against when the username is unknown, so that a miss costs the
    /// same as a wrong password.
    dummy_hash: String,
}

impl CredentialStore {
    /// Build the store, validating `work_factor` by hashing a dummy password.
    pub fn new(identities: Arc<dyn IdentityStore>, work_factor: u32) -> Result<Self, PasswordError> {
        let dummy_hash = hash_password("messagely-dummy-password", work_factor)?;
        Ok(Self {
            identities,
            work_factor,
            dummy_hash,
        })
    }

    /// Register a new identity. Fails with `DuplicateIdentity` if the username is taken.
    pub async fn register(&self, input: NewIdentity) -> AppResult<UserDetail> {
        validate_input(&input)?;

        let NewIdentity {
            username,
            password,
            first_name,
            last_name,
            phone,
        } = input;

        let work_factor = self.work_factor;
        let password_hash = run_blocking(move || hash_password(&password, work_factor)).await?;

        let create = CreateUser {
            username,
            password_hash,
            first_name,
            last_name,
            phone,
        };

        match self.identities.insert_identity(&create).await {
            Ok(user) => {
                tracing::info!(username = %user.username, "Registered new identity");
                Ok(UserDetail::from(&user))
            }
            Err(StoreError::Duplicate(_)) => {
                Err(CoreError::DuplicateIdentity(create.username).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check `password` against the stored hash for `username`.
    ///
    /// An unknown username returns `Ok(false)`, indistinguishable from a
    /// wrong password.
    pub async fn verify_password(&self, username: &str, password: &str) -> AppResult<bool> {
        let stored = self.identities.find_identity_by_username(username).await?;

        let (hash, known) = match stored {
            Some(user) => (user.password_hash, true),
            None => (self.dummy_hash.clone(), false),
        };

        let password = password.to_string();
        let matches = run_blocking(move || verify_password(&password, &hash)).await?;
        Ok(known && matches)
    }

    /// Set `last_login_at` to now. Fails with `NotFound` if the identity does not exist.
    pub async fn record_login(&self, username: &str) -> AppResult<Timestamp> {
        self.identities
            .update_last_login(username)
            .await?
            .ok_or_else(|| CoreError::not_found("User", username).into())
    }

    /// Verify credentials, record the login, and issue a token for `username`.
    ///
    /// Unknown users and wrong passwords both fail with `InvalidCredentials`.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        tokens: &TokenIssuer,
    ) -> AppResult<String> {
        if !self.verify_password(username, password).await? {
            tracing::info!(%username, "Login rejected");
            return Err(CoreError::InvalidCredentials.into());
        }

        self.record_login(username).await?;
        let token = tokens
            .issue(username)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
        tracing::info!(%username, "Login succeeded");
        Ok(token)
    }
}

/// Run a CPU-bound password operation off the async executor.
async fn run_blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> Result<T, PasswordError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::InternalError(format!("Password task failed: {e}")))?
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}
