//! Error taxonomy for the HTTP surface.
//!
//! Everything a handler can fail with, mapped onto a status code and a JSON
//! `{message}` body. Not-found responses stay ownership-blind: a foreign
//! note id reads the same as a missing one.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use notes_core::{AuthError, ValidationError};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input. The message enumerates every violated
    /// field constraint.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Rejected bearer credential; the reason comes from the token service.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Unknown name or wrong password; one message for both.
    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("Name already taken")]
    NameTaken,

    #[error("{0}")]
    NotFound(String),

    /// Store or hashing failure. The message is passed through to the
    /// caller, as the observed design does.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidCredentials | ApiError::NameTaken => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self);
        }
        let body = Json(serde_json::json!({ "message": self.to_string() }));
        (status, body).into_response()
    }
}
