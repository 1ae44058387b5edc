//! Message entity model and read projections.

use messagely_core::policy::MessageParticipants;
use messagely_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::user::UserSummary;

/// A row from the `messages` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub from_username: String,
    pub to_username: String,
    pub body: String,
    pub sent_at: Timestamp,
    pub read_at: Option<Timestamp>,
}

/// DTO for inserting a message.
#[derive(Debug, Clone)]
pub struct CreateMessage {
    pub from_username: String,
    pub to_username: String,
    pub body: String,
}

/// Message detail with both parties expanded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageDetail {
    pub id: DbId,
    pub body: String,
    pub sent_at: Timestamp,
    pub read_at: Option<Timestamp>,
    pub from_user: UserSummary,
    pub to_user: UserSummary,
}

/// An entry in a user's sent-messages listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentMessage {
    pub id: DbId,
    pub to_user: UserSummary,
    pub body: String,
    pub sent_at: Timestamp,
    pub read_at: Option<Timestamp>,
}

/// An entry in a user's received-messages listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceivedMessage {
    pub id: DbId,
    pub from_user: UserSummary,
    pub body: String,
    pub sent_at: Timestamp,
    pub read_at: Option<Timestamp>,
}

/// Result of marking a message as read.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct MessageReadState {
    pub id: DbId,
    pub read_at: Timestamp,
}

impl MessageParticipants for MessageDetail {
    fn sender(&self) -> &str {
        &self.from_user.username
    }

    fn recipient(&self) -> &str {
        &self.to_user.username
    }
}
