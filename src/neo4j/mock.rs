//! In-memory mock implementation of NoteStore for testing.
//!
//! Provides a complete mock of all note operations using
//! `tokio::sync::RwLock` collections.
//! Conditionally compiled with `#[cfg(test)]`.

use crate::auth::Identity;
use crate::neo4j::traits::NoteStore;
use crate::notes::models::{Note, OwnerScope};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory mock implementation of NoteStore for testing.
pub struct MockNoteStore {
    pub notes: RwLock<HashMap<Uuid, Note>>,
    // Insertion-order indices. Owner listings are served by walking the
    // index in reverse, so "most recent first" holds even when two notes
    // share a created_at timestamp.
    pub owner_index: RwLock<HashMap<String, Vec<Uuid>>>,
    pub org_index: RwLock<HashMap<String, Vec<Uuid>>>,
}

impl MockNoteStore {
    /// Create a new empty MockNoteStore.
    pub fn new() -> Self {
        Self {
            notes: RwLock::new(HashMap::new()),
            owner_index: RwLock::new(HashMap::new()),
            org_index: RwLock::new(HashMap::new()),
        }
    }

    /// Seed a note into the store.
    pub async fn with_note(self, note: Note) -> Self {
        self.put(note).await;
        self
    }

    async fn put(&self, note: Note) {
        match &note.owner {
            OwnerScope::Personal { identity } => {
                self.owner_index
                    .write()
                    .await
                    .entry(identity.as_str().to_string())
                    .or_default()
                    .push(note.id);
            }
            OwnerScope::Organization { org_id } => {
                self.org_index
                    .write()
                    .await
                    .entry(org_id.clone())
                    .or_default()
                    .push(note.id);
            }
        }
        self.notes.write().await.insert(note.id, note);
    }
}

#[async_trait]
impl NoteStore for MockNoteStore {
    async fn insert_note(&self, note: &Note) -> Result<()> {
        self.put(note.clone()).await;
        Ok(())
    }

    async fn get_note(&self, id: Uuid) -> Result<Option<Note>> {
        Ok(self.notes.read().await.get(&id).cloned())
    }

    async fn list_notes_by_owner(&self, identity: &Identity) -> Result<Vec<Note>> {
        let notes = self.notes.read().await;
        let index = self.owner_index.read().await;
        let ids = index.get(identity.as_str()).cloned().unwrap_or_default();
        Ok(ids
            .iter()
            .rev()
            .filter_map(|id| notes.get(id).cloned())
            .collect())
    }

    async fn list_notes_by_org(&self, org_id: &str) -> Result<Vec<Note>> {
        let notes = self.notes.read().await;
        let index = self.org_index.read().await;
        let ids = index.get(org_id).cloned().unwrap_or_default();
        Ok(ids.iter().filter_map(|id| notes.get(id).cloned()).collect())
    }

    async fn set_note_embedding(&self, id: Uuid, embedding: &[f32], _model: &str) -> Result<()> {
        // Silent no-op when the note is gone, like the real store.
        if let Some(note) = self.notes.write().await.get_mut(&id) {
            note.embedding = Some(embedding.to_vec());
        }
        Ok(())
    }

    async fn delete_note(&self, id: Uuid) -> Result<bool> {
        let removed = self.notes.write().await.remove(&id);
        if let Some(note) = &removed {
            match &note.owner {
                OwnerScope::Personal { identity } => {
                    if let Some(ids) = self.owner_index.write().await.get_mut(identity.as_str()) {
                        ids.retain(|x| *x != id);
                    }
                }
                OwnerScope::Organization { org_id } => {
                    if let Some(ids) = self.org_index.write().await.get_mut(org_id.as_str()) {
                        ids.retain(|x| *x != id);
                    }
                }
            }
        }
        Ok(removed.is_some())
    }

    async fn list_notes_missing_embedding(&self) -> Result<Vec<Note>> {
        let notes = self.notes.read().await;
        let mut missing: Vec<Note> = notes
            .values()
            .filter(|n| n.embedding.is_none())
            .cloned()
            .collect();
        missing.sort_by_key(|n| n.created_at);
        Ok(missing)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
