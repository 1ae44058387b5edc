pub mod auth;
pub mod health;
pub mod messages;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                  login (public)
/// /auth/register               register (public)
///
/// /users                       list (auth required)
/// /users/{username}            detail (self only)
/// /users/{username}/to         received messages (listing policy)
/// /users/{username}/from       sent messages (listing policy)
///
/// /messages                    send (auth required)
/// /messages/{id}               detail (sender or recipient)
/// /messages/{id}/read          mark read (recipient only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/messages", messages::router())
}
