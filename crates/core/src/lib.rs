//! Domain types and pure decision logic for the Messagely trust boundary.
//!
//! - [`policy`] -- ownership and participation checks over users and messages.
//! - [`identity`] -- the verified caller identity threaded through requests.
//! - [`messages`] -- read-state transition rule.
//! - [`validation`] -- registration and message input validation.

pub mod error;
pub mod identity;
pub mod messages;
pub mod policy;
pub mod types;
pub mod validation;
