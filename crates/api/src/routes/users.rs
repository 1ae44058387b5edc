//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET /                  -> list_users
/// GET /{username}        -> get_user
/// GET /{username}/to     -> messages_to
/// GET /{username}/from   -> messages_from
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users))
        .route("/{username}", get(users::get_user))
        .route("/{username}/to", get(users::messages_to))
        .route("/{username}/from", get(users::messages_from))
}
