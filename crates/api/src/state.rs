use std::sync::Arc;

use messagely_db::store::{IdentityStore, MessageStore};

use crate::auth::credentials::CredentialStore;
use crate::auth::jwt::TokenIssuer;
use crate::auth::password::PasswordError;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). Nothing in it is
/// mutated after startup apart from the records owned by the stores.
#[derive(Clone)]
pub struct AppState {
    /// Identity records (storage collaborator).
    pub identities: Arc<dyn IdentityStore>,
    /// Message records (storage collaborator).
    pub messages: Arc<dyn MessageStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Token issuer built from the signing secret.
    pub tokens: Arc<TokenIssuer>,
    /// Credential store built on `identities`.
    pub credentials: Arc<CredentialStore>,
}

impl AppState {
    /// Wire the auth components to the given stores.
    ///
    /// Fails if the configured hash work factor is rejected by Argon2.
    pub fn new(
        config: ServerConfig,
        identities: Arc<dyn IdentityStore>,
        messages: Arc<dyn MessageStore>,
    ) -> Result<Self, PasswordError> {
        let tokens = TokenIssuer::new(&config.auth.jwt);
        let credentials = CredentialStore::new(Arc::clone(&identities), config.auth.hash_work_factor)?;

        Ok(Self {
            identities,
            messages,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            credentials: Arc::new(credentials),
        })
    }
}
