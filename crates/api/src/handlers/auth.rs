//! Handlers for the `/auth` resource (login, register).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use messagely_core::validation::NewIdentity;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful authentication response returned by login and register.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    /// Token lifetime in seconds, absent when tokens do not expire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with username + password and update the last-login time.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<DataResponse<TokenResponse>>> {
    let token = state
        .credentials
        .login(&input.username, &input.password, &state.tokens)
        .await?;

    let response = TokenResponse {
        token,
        expires_in: state.tokens.expiry_secs(),
    };
    Ok(Json(DataResponse::new(response)))
}

/// POST /api/v1/auth/register
///
/// Register a new identity, log it in, and return a token. Returns 201 Created.
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<NewIdentity>,
) -> AppResult<(StatusCode, Json<DataResponse<TokenResponse>>)> {
    let user = state.credentials.register(input).await?;
    state.credentials.record_login(&user.username).await?;

    let response = issue_token(&state, &user.username)?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(response))))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn issue_token(state: &AppState, username: &str) -> AppResult<TokenResponse> {
    let token = state
        .tokens
        .issue(username)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(TokenResponse {
        token,
        expires_in: state.tokens.expiry_secs(),
    })
}
