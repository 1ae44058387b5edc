//! In-process store for tests and database-less local runs.
//!
//! Every write takes the state lock once and touches one record, matching the
//! single-statement atomicity of the Postgres backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use messagely_core::messages::resolve_read_at;
use messagely_core::types::{DbId, Timestamp};
use tokio::sync::RwLock;

use super::{IdentityStore, MessageStore, StoreError, StoreResult};
use crate::models::message::{
    CreateMessage, Message, MessageDetail, MessageReadState, ReceivedMessage, SentMessage,
};
use crate::models::user::{CreateUser, User, UserDetail, UserSummary};

#[derive(Default)]
struct State {
    users: BTreeMap<String, User>,
    messages: BTreeMap<DbId, Message>,
    last_message_id: DbId,
}

impl State {
    fn summary(&self, username: &str) -> Option<UserSummary> {
        self.users.get(username).map(UserSummary::from)
    }

    /// Messages matching `filter`, newest first.
    fn messages_where(&self, filter: impl Fn(&Message) -> bool) -> Vec<&Message> {
        let mut found: Vec<&Message> = self.messages.values().filter(|&m| filter(m)).collect();
        found.sort_by(|a, b| (b.sent_at, b.id).cmp(&(a.sent_at, a.id)));
        found
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn find_identity_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(username).cloned())
    }

    async fn insert_identity(&self, input: &CreateUser) -> StoreResult<User> {
        let mut state = self.state.write().await;
        if state.users.contains_key(&input.username) {
            tracing::debug!(username = %input.username, "Duplicate identity rejected");
            return Err(StoreError::Duplicate("users_pkey".into()));
        }
        let user = User {
            username: input.username.clone(),
            password_hash: input.password_hash.clone(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            phone: input.phone.clone(),
            joined_at: Utc::now(),
            last_login_at: None,
        };
        state.users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn update_last_login(&self, username: &str) -> StoreResult<Option<Timestamp>> {
        let mut state = self.state.write().await;
        Ok(state.users.get_mut(username).map(|user| {
            let now = Utc::now();
            user.last_login_at = Some(now);
            now
        }))
    }

    async fn find_user_detail(&self, username: &str) -> StoreResult<Option<UserDetail>> {
        Ok(self.state.read().await.users.get(username).map(UserDetail::from))
    }

    async fn list_identities(&self) -> StoreResult<Vec<UserSummary>> {
        // BTreeMap iteration is already ordered by username.
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .map(UserSummary::from)
            .collect())
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert_message(&self, input: &CreateMessage) -> StoreResult<Message> {
        let mut state = self.state.write().await;
        for party in [&input.from_username, &input.to_username] {
            if !state.users.contains_key(party) {
                tracing::debug!(%party, "Message references unknown user");
                return Err(StoreError::MissingReference(format!("users.username = {party}")));
            }
        }
        state.last_message_id += 1;
        let message = Message {
            id: state.last_message_id,
            from_username: input.from_username.clone(),
            to_username: input.to_username.clone(),
            body: input.body.clone(),
            sent_at: Utc::now(),
            read_at: None,
        };
        state.messages.insert(message.id, message.clone());
        tracing::debug!(message_id = message.id, "Message stored");
        Ok(message)
    }

    async fn find_message_by_id(&self, id: DbId) -> StoreResult<Option<MessageDetail>> {
        let state = self.state.read().await;
        let detail = state.messages.get(&id).and_then(|m| {
            Some(MessageDetail {
                id: m.id,
                body: m.body.clone(),
                sent_at: m.sent_at,
                read_at: m.read_at,
                from_user: state.summary(&m.from_username)?,
                to_user: state.summary(&m.to_username)?,
            })
        });
        Ok(detail)
    }

    async fn update_message_read_at(&self, id: DbId) -> StoreResult<Option<MessageReadState>> {
        let mut state = self.state.write().await;
        Ok(state.messages.get_mut(&id).map(|m| {
            let read_at = resolve_read_at(m.read_at, Utc::now());
            m.read_at = Some(read_at);
            MessageReadState { id, read_at }
        }))
    }

    async fn list_messages_sent_by(&self, username: &str) -> StoreResult<Vec<SentMessage>> {
        let state = self.state.read().await;
        Ok(state
            .messages_where(|m| m.from_username == username)
            .into_iter()
            .filter_map(|m| {
                Some(SentMessage {
                    id: m.id,
                    to_user: state.summary(&m.to_username)?,
                    body: m.body.clone(),
                    sent_at: m.sent_at,
                    read_at: m.read_at,
                })
            })
            .collect())
    }

    async fn list_messages_sent_to(&self, username: &str) -> StoreResult<Vec<ReceivedMessage>> {
        let state = self.state.read().await;
        Ok(state
            .messages_where(|m| m.to_username == username)
            .into_iter()
            .filter_map(|m| {
                Some(ReceivedMessage {
                    id: m.id,
                    from_user: state.summary(&m.from_username)?,
                    body: m.body.clone(),
                    sent_at: m.sent_at,
                    read_at: m.read_at,
                })
            })
            .collect())
    }
}
