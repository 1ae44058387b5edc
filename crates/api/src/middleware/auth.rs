//! Authentication gate: bearer token extraction and verification.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName};
use messagely_core::error::CoreError;
use messagely_core::identity::VerifiedIdentity;

use crate::auth::jwt::TokenIssuer;
use crate::error::AppError;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Resolve the caller from `headers`.
///
/// Every failure -- missing header, wrong scheme, bad signature, expired
/// token -- yields the same [`CoreError::Unauthenticated`]. The specific
/// reason is only logged.
pub fn authenticate(
    headers: &HeaderMap,
    header_name: &HeaderName,
    tokens: &TokenIssuer,
) -> Result<VerifiedIdentity, CoreError> {
    let Some(value) = headers.get(header_name) else {
        tracing::debug!(header = %header_name, "Missing auth header");
        return Err(CoreError::Unauthenticated);
    };

    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            tracing::debug!("Malformed auth header, expected `Bearer <token>`");
            CoreError::Unauthenticated
        })?;

    let claims = tokens.verify(token).map_err(|e| {
        tracing::debug!(reason = %e, "Token rejected");
        CoreError::Unauthenticated
    })?;

    let identity = VerifiedIdentity::new(claims.sub, claims.iat);
    tracing::debug!(username = %identity, issued_at = identity.issued_at(), "Caller authenticated");
    Ok(identity)
}

/// Authenticated caller extracted from the configured auth header.
///
/// Use this as an extractor parameter in any handler that requires a known
/// caller. The identity lives for the current request only.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(username = %auth.identity, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub identity: VerifiedIdentity,
}

impl AuthUser {
    pub fn username(&self) -> &str {
        self.identity.username()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = authenticate(
            &parts.headers,
            &state.config.auth.auth_header,
            &state.tokens,
        )?;
        Ok(AuthUser { identity })
    }
}
