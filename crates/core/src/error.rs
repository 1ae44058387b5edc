/// Domain error taxonomy shared by every layer of the service.
///
/// Each variant maps to one stable, documented outcome at the HTTP boundary.
/// Token failures never appear here directly: they are collapsed into
/// [`CoreError::Unauthenticated`] before leaving the authentication gate.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Identity already exists: {0}")]
    DuplicateIdentity(String),

    /// Wrong password and unknown username share this variant.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
