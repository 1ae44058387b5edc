//! HTTP handlers. Each one runs the same explicit pipeline: the [`AuthUser`]
//! extractor authenticates, a policy call authorizes, then the storage
//! collaborator does the read or write.
//!
//! [`AuthUser`]: crate::middleware::auth::AuthUser

pub mod auth;
pub mod messages;
pub mod users;
