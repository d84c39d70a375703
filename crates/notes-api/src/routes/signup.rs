//! Account registration.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use notes_core::{password, validation, Account, AccountView};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,
    pub user: AccountView,
}

/// Handler for `POST /user/signup`
///
/// Validates the body, enforces name uniqueness (case-sensitive exact
/// match), hashes the password, and persists a fresh account. The response
/// never carries the password hash.
pub async fn handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> Result<Response, ApiError> {
    validation::validate_credentials(&request.name, &request.password)?;

    let name = request.name.trim();
    if state.storage.name_exists(name) {
        return Err(ApiError::NameTaken);
    }

    let digest = password::hash(&request.password)
        .map_err(|err| anyhow::anyhow!("Failed to hash password: {}", err))?;

    let account = Account::new(name, digest);
    state.storage.create_account(account.clone())?;

    tracing::info!("Registered new account: {}", account.name);

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: format!("New user with name {} has been registered!", account.name),
            user: AccountView::from(&account),
        }),
    )
        .into_response())
}
