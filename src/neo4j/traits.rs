//! NoteStore trait definition
//!
//! Defines the abstract interface for all Neo4j note operations.
//! This trait mirrors the public async methods of `Neo4jClient`,
//! enabling testing with mock implementations and future backend swaps.

use crate::auth::Identity;
use crate::notes::models::Note;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Abstract interface for note persistence.
///
/// Every public async method of `Neo4jClient` (excluding `new`,
/// `init_schema`, and private helpers) is represented here.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Persist a new note
    async fn insert_note(&self, note: &Note) -> Result<()>;

    /// Get a note by ID
    async fn get_note(&self, id: Uuid) -> Result<Option<Note>>;

    /// List notes personally owned by `identity`, most recent first
    async fn list_notes_by_owner(&self, identity: &Identity) -> Result<Vec<Note>>;

    /// List notes owned by an organization (no ordering contract)
    async fn list_notes_by_org(&self, org_id: &str) -> Result<Vec<Note>>;

    /// Attach an embedding to a note.
    ///
    /// A missing note is a no-op rather than an error: the note may have
    /// been deleted while its vector was being computed.
    async fn set_note_embedding(&self, id: Uuid, embedding: &[f32], model: &str) -> Result<()>;

    /// Delete a note. Returns whether a note was actually removed.
    async fn delete_note(&self, id: Uuid) -> Result<bool>;

    /// List notes that have no embedding yet, oldest first. Used to pick
    /// up unfinished embedding work after a restart.
    async fn list_notes_missing_embedding(&self) -> Result<Vec<Note>>;

    /// Connectivity probe for health reporting
    async fn ping(&self) -> Result<()>;
}
