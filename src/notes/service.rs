//! Note service facade
//!
//! Single entry point for note operations. Every call takes the caller's
//! resolved identity (or lack of one) and runs the access rules before
//! touching the store, so handlers and future transports cannot reach the
//! store around the checks.
//!
//! Reads and writes disagree about honesty on purpose. Reads collapse
//! "does not exist" and "not yours to see" into the same absent answer,
//! so nobody can probe for the existence of other people's notes. Writes
//! report exactly what went wrong.

use crate::access::{AccessError, AccessEvaluator};
use crate::auth::Identity;
use crate::embeddings::EmbeddingScheduler;
use crate::neo4j::NoteStore;
use crate::notes::models::{CreateNoteRequest, Note, OwnerScope};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The operation requires a signed-in caller.
    #[error("{reason}")]
    Unauthenticated { reason: String },
    /// The caller is signed in but not allowed to do this.
    #[error("{reason}")]
    Denied { reason: String },
    /// The note does not exist.
    #[error("Note not found")]
    NotFound,
    /// The store failed; nothing to do with the caller.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<AccessError> for ServiceError {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::Denied { reason } => ServiceError::Denied { reason },
        }
    }
}

pub struct NoteService {
    store: Arc<dyn NoteStore>,
    access: AccessEvaluator,
    scheduler: EmbeddingScheduler,
}

impl NoteService {
    pub fn new(
        store: Arc<dyn NoteStore>,
        access: AccessEvaluator,
        scheduler: EmbeddingScheduler,
    ) -> Self {
        Self {
            store,
            access,
            scheduler,
        }
    }

    /// Create a note and queue its embedding.
    ///
    /// With an `org_id` the note belongs to that organization (the caller
    /// must be a member); without one it is personal to the caller.
    /// Creation returns as soon as the note is stored — the embedding is
    /// produced in the background and its fate never affects this call.
    pub async fn create_note(
        &self,
        request: CreateNoteRequest,
        identity: Option<&Identity>,
    ) -> Result<Note, ServiceError> {
        let Some(identity) = identity else {
            return Err(ServiceError::Unauthenticated {
                reason: "You must be logged in to create a note".to_string(),
            });
        };

        let owner = match request.org_id {
            Some(org_id) => {
                if !self
                    .access
                    .can_access_organization(&org_id, Some(identity))
                    .await
                {
                    return Err(ServiceError::Denied {
                        reason: "You do not have permission to create a note in this organization"
                            .to_string(),
                    });
                }
                OwnerScope::organization(org_id)
            }
            None => OwnerScope::personal(identity.clone()),
        };

        let note = Note::new(request.text, owner);
        self.store.insert_note(&note).await?;

        self.scheduler.schedule(&note);

        Ok(note)
    }

    /// Fetch a note by id.
    ///
    /// Missing and inaccessible are the same answer here: `None`.
    pub async fn get_note(
        &self,
        id: Uuid,
        identity: Option<&Identity>,
    ) -> Result<Option<Note>, ServiceError> {
        let Some(note) = self.store.get_note(id).await? else {
            return Ok(None);
        };

        if self.access.can_access_note(&note, identity).await {
            Ok(Some(note))
        } else {
            Ok(None)
        }
    }

    /// List notes.
    ///
    /// With `org_id`, the organization's notes; otherwise the caller's
    /// personal notes, most recent first. A caller with no standing
    /// (unauthenticated, or not a member) gets an empty list,
    /// indistinguishable from an organization that has no notes.
    pub async fn list_notes(
        &self,
        org_id: Option<&str>,
        identity: Option<&Identity>,
    ) -> Result<Vec<Note>, ServiceError> {
        match org_id {
            Some(org_id) => {
                if !self.access.can_access_organization(org_id, identity).await {
                    return Ok(Vec::new());
                }
                Ok(self.store.list_notes_by_org(org_id).await?)
            }
            None => match identity {
                Some(identity) => Ok(self.store.list_notes_by_owner(identity).await?),
                None => Ok(Vec::new()),
            },
        }
    }

    /// Delete a note.
    ///
    /// Unlike reads, deletion reports honestly: a missing note is
    /// `NotFound`, an existing note the caller may not touch is `Denied`,
    /// checked in that order.
    pub async fn delete_note(
        &self,
        id: Uuid,
        identity: Option<&Identity>,
    ) -> Result<(), ServiceError> {
        if identity.is_none() {
            return Err(ServiceError::Unauthenticated {
                reason: "You must be logged in to delete a note".to_string(),
            });
        }

        let Some(note) = self.store.get_note(id).await? else {
            return Err(ServiceError::NotFound);
        };

        self.access
            .assert_note_access(
                &note,
                identity,
                "You do not have permission to delete this note",
            )
            .await?;

        if !self.store.delete_note(id).await? {
            // Lost a race with another deleter.
            return Err(ServiceError::NotFound);
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
