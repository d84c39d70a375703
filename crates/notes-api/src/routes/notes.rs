//! Ownership-scoped note operations.
//!
//! Every handler reads the caller identity attached by the auth gate; the
//! identity's user id is the only ownership key, never anything from the
//! request body.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use notes_core::{validation, AccountView, Identity, Note, ValidationError};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub message: String,
    pub user: AccountView,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    #[serde(default)]
    pub note_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub message: String,
    pub note: Note,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    #[serde(default)]
    pub note_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub title: Option<String>,
}

/// Handler for `GET /notes`
///
/// Returns the caller's notes in link order as a bare array.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Response, ApiError> {
    let account = state
        .storage
        .account_by_id(identity.user_id)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(state.storage.notes_for(&account)).into_response())
}

/// Handler for `POST /notes`
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<CreateRequest>,
) -> Result<Response, ApiError> {
    validation::validate_new_note(&request.title, &request.text)?;

    let note = Note::new(request.title, request.text);
    let title = note.title.clone();

    // Insert then link: two separate writes, no rollback in between.
    state.storage.insert_note(note.clone())?;
    state.storage.link_note(identity.user_id, note.note_id)?;

    let account = state
        .storage
        .account_by_id(identity.user_id)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!("Created note {} for account {}", note.note_id, identity.name);

    Ok((
        StatusCode::CREATED,
        Json(CreateResponse {
            message: format!("The note: {} has been created and saved!", title),
            user: AccountView::from(&account),
        }),
    )
        .into_response())
}

/// Handler for `PUT /notes`
///
/// Partial update: whichever of title/text are present are applied, and the
/// modified timestamp is refreshed explicitly.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<UpdateRequest>,
) -> Result<Response, ApiError> {
    let note_id = request.note_id.as_deref().ok_or_else(|| {
        ApiError::Validation(ValidationError::single(
            "noteId",
            "noteId is required in the request body.",
        ))
    })?;

    if request.title.is_none() && request.text.is_none() {
        return Err(ApiError::Validation(ValidationError::single(
            "body",
            "At least one of title or text must be provided.",
        )));
    }

    validation::validate_note_patch(request.title.as_deref(), request.text.as_deref())?;

    let mut note = owned_note(&state, &identity, note_id).ok_or_else(|| {
        ApiError::NotFound("Note not found or does not belong to you.".to_string())
    })?;

    if let Some(title) = request.title {
        note.title = title;
    }
    if let Some(text) = request.text {
        note.text = text;
    }
    note.touch();

    state.storage.update_note(note.clone())?;

    Ok(Json(UpdateResponse {
        message: format!("Note \"{}\" has been updated.", note.title),
        note,
    })
    .into_response())
}

/// Handler for `DELETE /notes`
///
/// Ownership is checked before anything is unlinked; a foreign note id
/// reads the same as a missing one. The note record itself stays in the
/// store; only the owner link goes away.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<DeleteRequest>,
) -> Result<Response, ApiError> {
    let note_id = request.note_id.as_deref().ok_or_else(|| {
        ApiError::Validation(ValidationError::single(
            "noteId",
            "noteId is required in the request body.",
        ))
    })?;

    let note = owned_note(&state, &identity, note_id)
        .ok_or_else(|| ApiError::NotFound("Note not found.".to_string()))?;

    state.storage.unlink_note(identity.user_id, note.note_id)?;

    tracing::info!("Deleted note {} for account {}", note.note_id, identity.name);

    Ok(Json(MessageResponse {
        message: format!("The note: {} has been deleted.", note.title),
    })
    .into_response())
}

/// Handler for `GET /notes/search`
///
/// Case-insensitive exact title match within the caller's own notes.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    let title = match query.title.as_deref() {
        Some(title) if !title.is_empty() => title.to_lowercase(),
        _ => {
            return Err(ApiError::Validation(ValidationError::single(
                "title",
                "Title is required in the query string.",
            )))
        }
    };

    let account = state
        .storage
        .account_by_id(identity.user_id)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let found = state
        .storage
        .notes_for(&account)
        .into_iter()
        .find(|note| note.title.to_lowercase() == title);

    match found {
        Some(note) => Ok(Json(note).into_response()),
        None => Err(ApiError::NotFound(
            "Note with that title not found.".to_string(),
        )),
    }
}

/// Resolve a note id strictly within the caller's own collection.
///
/// Unparseable ids, unknown ids, and other accounts' ids all come back as
/// `None`; callers report them identically.
fn owned_note(state: &AppState, identity: &Identity, note_id: &str) -> Option<Note> {
    let note_id = Uuid::parse_str(note_id).ok()?;
    let account = state.storage.account_by_id(identity.user_id)?;
    if !account.notes.contains(&note_id) {
        return None;
    }
    state.storage.note(note_id)
}
