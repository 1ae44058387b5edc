//! The caller identity produced by the authentication gate.

use std::fmt;

/// A caller whose bearer token has been verified.
///
/// Constructed only after signature and expiry checks pass, then threaded
/// through the request pipeline by value. Fields are private so the identity
/// cannot be altered once established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    username: String,
    issued_at: i64,
}

impl VerifiedIdentity {
    pub fn new(username: impl Into<String>, issued_at: i64) -> Self {
        Self {
            username: username.into(),
            issued_at,
        }
    }

    /// The token subject.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Token issue time (UTC Unix seconds).
    pub fn issued_at(&self) -> i64 {
        self.issued_at
    }
}

impl fmt::Display for VerifiedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}
