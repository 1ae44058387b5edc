//! Repository for the `users` table.

use messagely_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User, UserDetail, UserSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "username, password_hash, first_name, last_name, phone, joined_at, last_login_at";

/// Public columns -- everything except `password_hash`.
const DETAIL_COLUMNS: &str = "username, first_name, last_name, phone, joined_at, last_login_at";

/// Provides persistence operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// A duplicate username fails with a unique violation on `users_pkey`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, password_hash, first_name, last_name, phone)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.phone)
            .fetch_one(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the public profile of a user.
    pub async fn find_detail(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<UserDetail>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, UserDetail>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// List basic info for all users, ordered by username.
    pub async fn list(pool: &PgPool) -> Result<Vec<UserSummary>, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>(
            "SELECT username, first_name, last_name, phone FROM users ORDER BY username",
        )
        .fetch_all(pool)
        .await
    }

    /// Set `last_login_at` to now and return it.
    ///
    /// Returns `None` if no row with the given username exists.
    pub async fn record_login(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Timestamp>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE users SET last_login_at = NOW()
             WHERE username = $1
             RETURNING last_login_at",
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }
}
