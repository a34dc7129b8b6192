//! API handlers for notes

use super::handlers::{AppError, NotesState};
use crate::auth::RequestIdentity;
use crate::notes::{CreateNoteRequest, Note};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for listing notes
#[derive(Debug, Deserialize, Default)]
pub struct ListNotesQuery {
    /// List an organization's notes instead of the caller's personal notes
    pub org_id: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a new note
pub async fn create_note(
    State(state): State<NotesState>,
    Extension(identity): Extension<RequestIdentity>,
    Json(request): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>), AppError> {
    let note = state
        .service
        .create_note(request, identity.as_ref())
        .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

/// Get a note by ID
pub async fn get_note(
    State(state): State<NotesState>,
    Extension(identity): Extension<RequestIdentity>,
    Path(note_id): Path<Uuid>,
) -> Result<Json<Note>, AppError> {
    let note = state
        .service
        .get_note(note_id, identity.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Note {} not found", note_id)))?;

    Ok(Json(note))
}

/// List notes — the caller's personal notes by default, or an organization's
/// notes when `org_id` is given
pub async fn list_notes(
    State(state): State<NotesState>,
    Extension(identity): Extension<RequestIdentity>,
    Query(query): Query<ListNotesQuery>,
) -> Result<Json<Vec<Note>>, AppError> {
    let notes = state
        .service
        .list_notes(query.org_id.as_deref(), identity.as_ref())
        .await?;

    Ok(Json(notes))
}

/// Delete a note
pub async fn delete_note(
    State(state): State<NotesState>,
    Extension(identity): Extension<RequestIdentity>,
    Path(note_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .service
        .delete_note(note_id, identity.as_ref())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
