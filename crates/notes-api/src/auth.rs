//! Auth gate for the note routes.
//!
//! Extracts the bearer credential, verifies it against the token service,
//! and attaches the resolved identity to the request. Downstream handlers
//! trust the attached identity and never re-verify.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use notes_core::AuthError;

use crate::error::ApiError;
use crate::AppState;

/// Middleware guarding every `/notes` route.
///
/// On success the verified [`notes_core::Identity`] lands in the request
/// extensions; any failure short-circuits with a 401 carrying the
/// verifier's error kind.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Ok(token) => token,
        Err(err) => {
            tracing::debug!("Rejected request: {}", err);
            return ApiError::Auth(err).into_response();
        }
    };

    match state.tokens.verify(token) {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(err) => {
            tracing::debug!("Rejected token: {}", err);
            ApiError::Auth(err).into_response()
        }
    }
}

/// Pull the bearer credential out of the Authorization header.
///
/// A missing header, a non-UTF-8 value, and a non-Bearer scheme all count
/// as an absent credential.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get("authorization")
        .ok_or(AuthError::MissingToken)?;
    let value = header.to_str().map_err(|_| AuthError::MissingToken)?;
    let token = value.strip_prefix("Bearer ").ok_or(AuthError::MissingToken)?;
    Ok(token.trim())
}
