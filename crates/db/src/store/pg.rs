//! Postgres-backed store delegating to the repositories.

use async_trait::async_trait;
use messagely_core::types::{DbId, Timestamp};

use super::{IdentityStore, MessageStore, StoreResult};
use crate::models::message::{
    CreateMessage, Message, MessageDetail, MessageReadState, ReceivedMessage, SentMessage,
};
use crate::models::user::{CreateUser, User, UserDetail, UserSummary};
use crate::repositories::{MessageRepo, UserRepo};
use crate::DbPool;

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PgStore {
    async fn find_identity_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_username(&self.pool, username).await?)
    }

    async fn insert_identity(&self, input: &CreateUser) -> StoreResult<User> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn update_last_login(&self, username: &str) -> StoreResult<Option<Timestamp>> {
        Ok(UserRepo::record_login(&self.pool, username).await?)
    }

    async fn find_user_detail(&self, username: &str) -> StoreResult<Option<UserDetail>> {
        Ok(UserRepo::find_detail(&self.pool, username).await?)
    }

    async fn list_identities(&self) -> StoreResult<Vec<UserSummary>> {
        Ok(UserRepo::list(&self.pool).await?)
    }
}

#[async_trait]
impl MessageStore for PgStore {
    async fn insert_message(&self, input: &CreateMessage) -> StoreResult<Message> {
        Ok(MessageRepo::create(&self.pool, input).await?)
    }

    async fn find_message_by_id(&self, id: DbId) -> StoreResult<Option<MessageDetail>> {
        Ok(MessageRepo::find_detail(&self.pool, id).await?)
    }

    async fn update_message_read_at(&self, id: DbId) -> StoreResult<Option<MessageReadState>> {
        Ok(MessageRepo::mark_read(&self.pool, id).await?)
    }

    async fn list_messages_sent_by(&self, username: &str) -> StoreResult<Vec<SentMessage>> {
        Ok(MessageRepo::list_sent_by(&self.pool, username).await?)
    }

    async fn list_messages_sent_to(&self, username: &str) -> StoreResult<Vec<ReceivedMessage>> {
        Ok(MessageRepo::list_sent_to(&self.pool, username).await?)
    }
}
