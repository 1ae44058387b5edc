//! Handlers for the `/messages` resource.
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use messagely_core::error::CoreError;
use messagely_core::policy::{ensure_participant, ensure_recipient};
use messagely_core::types::DbId;
use messagely_core::validation::{validate_input, NewMessage};
use messagely_db::models::message::{CreateMessage, Message, MessageDetail, MessageReadState};

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/messages/{id}
///
/// Message detail. Only the sender or recipient may read it.
pub async fn get_message(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<MessageDetail>>> {
    let message = find_message(&state, id).await?;
    ensure_participant(&message, &auth.identity)?;

    Ok(Json(DataResponse::new(message)))
}

/// POST /api/v1/messages
///
/// Send a message from the caller. Returns 201 Created, or 404 if the
/// recipient does not exist.
pub async fn create_message(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<NewMessage>,
) -> AppResult<(StatusCode, Json<DataResponse<Message>>)> {
    validate_input(&input)?;

    if state
        .identities
        .find_user_detail(&input.to_username)
        .await?
        .is_none()
    {
        return Err(CoreError::not_found("User", &input.to_username).into());
    }

    let create = CreateMessage {
        from_username: auth.username().to_string(),
        to_username: input.to_username,
        body: input.body,
    };
    let message = state.messages.insert_message(&create).await?;
    tracing::info!(
        message_id = message.id,
        from = %message.from_username,
        to = %message.to_username,
        "Message sent"
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(message))))
}

/// POST /api/v1/messages/{id}/read
///
/// Mark a message as read. Only the recipient may do this. Repeating the call
/// is a no-op that returns the original `read_at`.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<MessageReadState>>> {
    let message = find_message(&state, id).await?;
    ensure_recipient(&message, &auth.identity)?;

    let read_state = state
        .messages
        .update_message_read_at(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Message", id))?;
    tracing::info!(message_id = id, read_at = %read_state.read_at, "Message marked read");

    Ok(Json(DataResponse::new(read_state)))
}

async fn find_message(state: &AppState, id: DbId) -> AppResult<MessageDetail> {
    state
        .messages
        .find_message_by_id(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Message", id).into())
}
