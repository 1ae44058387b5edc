//! Storage collaborator traits consumed by the authentication and
//! authorization layer.
//!
//! Single-resource lookups and updates return `Option`, where `None` is the
//! not-found signal. Listings return a possibly empty `Vec`. Each write is one
//! atomic operation on one record.

mod error;
mod memory;
mod pg;

use async_trait::async_trait;
use messagely_core::types::{DbId, Timestamp};

use crate::models::message::{
    CreateMessage, Message, MessageDetail, MessageReadState, ReceivedMessage, SentMessage,
};
use crate::models::user::{CreateUser, User, UserDetail, UserSummary};

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use pg::PgStore;

/// Identity records: credentials, profile, and login tracking.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_identity_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Fails with [`StoreError::Duplicate`] if the username is taken.
    async fn insert_identity(&self, input: &CreateUser) -> StoreResult<User>;

    /// Set `last_login_at` to now and return it.
    async fn update_last_login(&self, username: &str) -> StoreResult<Option<Timestamp>>;

    async fn find_user_detail(&self, username: &str) -> StoreResult<Option<UserDetail>>;

    async fn list_identities(&self) -> StoreResult<Vec<UserSummary>>;
}

/// Message records.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert_message(&self, input: &CreateMessage) -> StoreResult<Message>;

    async fn find_message_by_id(&self, id: DbId) -> StoreResult<Option<MessageDetail>>;

    /// Stamp `read_at` if unset; an already-read message keeps its timestamp.
    async fn update_message_read_at(&self, id: DbId) -> StoreResult<Option<MessageReadState>>;

    async fn list_messages_sent_by(&self, username: &str) -> StoreResult<Vec<SentMessage>>;

    async fn list_messages_sent_to(&self, username: &str) -> StoreResult<Vec<ReceivedMessage>>;
}
