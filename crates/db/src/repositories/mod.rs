//! Postgres repositories. Each returns raw `sqlx` results; classification
//! into [`crate::store::StoreError`] happens one layer up.

pub mod message_repo;
pub mod user_repo;

pub use message_repo::MessageRepo;
pub use user_repo::UserRepo;
