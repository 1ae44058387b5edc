//! Input validation for registration and message submission.

use std::borrow::Cow;
use std::fmt;

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;

/// Maximum username length in characters.
pub const MAX_USERNAME_LENGTH: u64 = 64;

/// Registration input: credentials plus profile fields.
///
/// The raw password lives only in this value and is never persisted.
#[derive(Clone, Deserialize, Validate)]
pub struct NewIdentity {
    #[validate(
        length(min = 1, max = MAX_USERNAME_LENGTH, message = "Username must be 1-64 characters"),
        custom(function = "validate_username_chars")
    )]
    pub username: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
    #[validate(length(max = 100))]
    pub first_name: String,
    #[validate(length(max = 100))]
    pub last_name: String,
    #[validate(length(max = 100))]
    pub phone: String,
}

impl fmt::Debug for NewIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewIdentity")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("phone", &self.phone)
            .finish()
    }
}

/// Message submission input. The sender is always the authenticated caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewMessage {
    #[validate(length(
        min = 1,
        max = MAX_USERNAME_LENGTH,
        message = "Recipient username must be 1-64 characters"
    ))]
    pub to_username: String,
    #[validate(length(min = 1, max = 10000, message = "Message body must be 1-10000 characters"))]
    pub body: String,
}

fn validate_username_chars(username: &str) -> Result<(), ValidationError> {
    if username.chars().any(char::is_whitespace) {
        return Err(ValidationError::new("username_whitespace")
            .with_message(Cow::Borrowed("Username must not contain whitespace")));
    }
    Ok(())
}

/// Run derive-based validation and collapse failures into [`CoreError::Validation`].
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input.validate().map_err(validation_error)
}

fn validation_error(errors: ValidationErrors) -> CoreError {
    CoreError::Validation(errors.to_string())
}
