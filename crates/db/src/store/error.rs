/// Errors raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. Carries the constraint name.
    #[error("Duplicate value violates unique constraint: {0}")]
    Duplicate(String),

    /// A foreign key rejected the write because the referenced row is missing.
    #[error("Referenced record does not exist: {0}")]
    MissingReference(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// PostgreSQL SQLSTATE codes.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            let code = db_err.code();
            match code.as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    tracing::debug!(%constraint, "Unique violation");
                    return StoreError::Duplicate(constraint);
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    tracing::debug!(%constraint, "Foreign key violation");
                    return StoreError::MissingReference(constraint);
                }
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}
