//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- the token issuer: signed bearer token creation and verification.
//! - [`credentials`] -- the credential store built on top of the storage collaborator.

pub mod credentials;
pub mod jwt;
pub mod password;
