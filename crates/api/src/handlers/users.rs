//! Handlers for the `/users` resource.
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::State;
use axum::Json;
use messagely_core::error::CoreError;
use messagely_core::policy::ensure_self;
use messagely_db::models::message::{ReceivedMessage, SentMessage};
use messagely_db::models::user::{UserDetail, UserSummary};

use crate::error::AppResult;
use crate::extract::AppPath;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users
///
/// Basic info on all users. Any authenticated caller may list.
pub async fn list_users(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserSummary>>>> {
    let users = state.identities.list_identities().await?;
    Ok(Json(DataResponse::new(users)))
}

/// GET /api/v1/users/{username}
///
/// Profile detail. Only the user themself may read it.
pub async fn get_user(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
) -> AppResult<Json<DataResponse<UserDetail>>> {
    ensure_self(&username, &auth.identity)?;

    let user = state
        .identities
        .find_user_detail(&username)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &username))?;

    Ok(Json(DataResponse::new(user)))
}

/// GET /api/v1/users/{username}/to
///
/// Messages received by `username`, gated by the configured listing policy.
pub async fn messages_to(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
) -> AppResult<Json<DataResponse<Vec<ReceivedMessage>>>> {
    state
        .config
        .auth
        .listing_policy
        .ensure(&username, &auth.identity)?;

    let messages = state.messages.list_messages_sent_to(&username).await?;
    Ok(Json(DataResponse::new(messages)))
}

/// GET /api/v1/users/{username}/from
///
/// Messages sent by `username`, gated by the configured listing policy.
pub async fn messages_from(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
) -> AppResult<Json<DataResponse<Vec<SentMessage>>>> {
    state
        .config
        .auth
        .listing_policy
        .ensure(&username, &auth.identity)?;

    let messages = state.messages.list_messages_sent_by(&username).await?;
    Ok(Json(DataResponse::new(messages)))
}
