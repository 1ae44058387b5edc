//! Repository for the `messages` table.

use messagely_core::types::{DbId, Timestamp};
use sqlx::{FromRow, PgPool};

use crate::models::message::{
    CreateMessage, Message, MessageDetail, MessageReadState, ReceivedMessage, SentMessage,
};
use crate::models::user::UserSummary;

/// Column list for `messages` queries.
const COLUMNS: &str = "id, from_username, to_username, body, sent_at, read_at";

/// Flat join row for a message with both parties.
#[derive(FromRow)]
struct MessageDetailRow {
    id: DbId,
    body: String,
    sent_at: Timestamp,
    read_at: Option<Timestamp>,
    from_username: String,
    from_first_name: String,
    from_last_name: String,
    from_phone: String,
    to_username: String,
    to_first_name: String,
    to_last_name: String,
    to_phone: String,
}

/// Flat join row for a listing entry with the counterparty expanded.
#[derive(FromRow)]
struct ListingRow {
    id: DbId,
    body: String,
    sent_at: Timestamp,
    read_at: Option<Timestamp>,
    username: String,
    first_name: String,
    last_name: String,
    phone: String,
}

impl ListingRow {
    fn counterparty(&self) -> UserSummary {
        UserSummary {
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
        }
    }
}

impl From<MessageDetailRow> for MessageDetail {
    fn from(row: MessageDetailRow) -> Self {
        Self {
            id: row.id,
            body: row.body,
            sent_at: row.sent_at,
            read_at: row.read_at,
            from_user: UserSummary {
                username: row.from_username,
                first_name: row.from_first_name,
                last_name: row.from_last_name,
                phone: row.from_phone,
            },
            to_user: UserSummary {
                username: row.to_username,
                first_name: row.to_first_name,
                last_name: row.to_last_name,
                phone: row.to_phone,
            },
        }
    }
}

/// Provides persistence operations for messages.
pub struct MessageRepo;

impl MessageRepo {
    /// Insert a message, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMessage) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages (from_username, to_username, body)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(&input.from_username)
            .bind(&input.to_username)
            .bind(&input.body)
            .fetch_one(pool)
            .await
    }

    /// Find a message with both parties expanded.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<MessageDetail>, sqlx::Error> {
        let row = sqlx::query_as::<_, MessageDetailRow>(
            "SELECT m.id, m.body, m.sent_at, m.read_at,
                    f.username AS from_username, f.first_name AS from_first_name,
                    f.last_name AS from_last_name, f.phone AS from_phone,
                    t.username AS to_username, t.first_name AS to_first_name,
                    t.last_name AS to_last_name, t.phone AS to_phone
             FROM messages m
             JOIN users f ON f.username = m.from_username
             JOIN users t ON t.username = m.to_username
             WHERE m.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(MessageDetail::from))
    }

    /// Stamp `read_at` if it is still null and return the stored value.
    ///
    /// A single statement, so concurrent calls cannot move `read_at`.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn mark_read(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MessageReadState>, sqlx::Error> {
        sqlx::query_as::<_, MessageReadState>(
            "UPDATE messages SET read_at = COALESCE(read_at, NOW())
             WHERE id = $1
             RETURNING id, read_at",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Messages sent by `username`, newest first.
    pub async fn list_sent_by(
        pool: &PgPool,
        username: &str,
    ) -> Result<Vec<SentMessage>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ListingRow>(
            "SELECT m.id, m.body, m.sent_at, m.read_at,
                    u.username, u.first_name, u.last_name, u.phone
             FROM messages m
             JOIN users u ON u.username = m.to_username
             WHERE m.from_username = $1
             ORDER BY m.sent_at DESC, m.id DESC",
        )
        .bind(username)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| SentMessage {
                to_user: row.counterparty(),
                id: row.id,
                body: row.body,
                sent_at: row.sent_at,
                read_at: row.read_at,
            })
            .collect())
    }

    /// Messages received by `username`, newest first.
    pub async fn list_sent_to(
        pool: &PgPool,
        username: &str,
    ) -> Result<Vec<ReceivedMessage>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ListingRow>(
            "SELECT m.id, m.body, m.sent_at, m.read_at,
                    u.username, u.first_name, u.last_name, u.phone
             FROM messages m
             JOIN users u ON u.username = m.from_username
             WHERE m.to_username = $1
             ORDER BY m.sent_at DESC, m.id DESC",
        )
        .bind(username)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ReceivedMessage {
                from_user: row.counterparty(),
                id: row.id,
                body: row.body,
                sent_at: row.sent_at,
                read_at: row.read_at,
            })
            .collect())
    }
}
