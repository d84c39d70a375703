//! Login and token issuance.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use notes_core::{password, validation, Identity};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

/// Handler for `POST /user/login`
///
/// Unknown names and wrong passwords produce the same response, so the
/// existence of a name never leaks. No session record is created; the
/// issued token is the only proof of identity.
pub async fn handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    validation::validate_credentials(&request.name, &request.password)?;

    let account = state
        .storage
        .account_by_name(request.name.trim())
        .ok_or(ApiError::InvalidCredentials)?;

    if !password::verify(&request.password, &account.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let identity = Identity {
        user_id: account.user_id,
        name: account.name.clone(),
    };
    let token = state
        .tokens
        .issue(&identity)
        .map_err(|err| anyhow::anyhow!("Failed to issue token: {}", err))?;

    tracing::info!("Issued token for account: {}", account.name);

    Ok(Json(LoginResponse {
        message: format!("Welcome {}!", account.name),
        token,
    })
    .into_response())
}
