//! Background embedding scheduler
//!
//! Note creation must never wait on the embedding backend, so vectors are
//! produced off the request path: `schedule` hands the note to a worker
//! task over an unbounded channel and returns immediately. Each created
//! note is scheduled exactly once; the worker writes the vector back with
//! an idempotent patch, and a note whose embedding fails simply stays
//! unembedded (the failure is logged, never surfaced to the creator).
//!
//! Intent does not survive a crash — the channel is in-memory — so
//! `recover` re-queues every note still missing a vector at startup.

use crate::embeddings::traits::EmbeddingProvider;
use crate::neo4j::NoteStore;
use crate::notes::models::Note;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// A unit of embedding work. Carries the text itself so the worker does
/// not have to re-read the note to embed it.
#[derive(Debug, Clone)]
pub struct EmbeddingJob {
    pub note_id: Uuid,
    pub text: String,
}

/// Handle to the background embedding worker.
pub struct EmbeddingScheduler {
    store: Arc<dyn NoteStore>,
    tx: mpsc::UnboundedSender<EmbeddingJob>,
}

impl EmbeddingScheduler {
    /// Spawn the worker task and return a handle for scheduling.
    pub fn start(store: Arc<dyn NoteStore>, provider: Arc<dyn EmbeddingProvider>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<EmbeddingJob>();

        let worker_store = store.clone();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                embed_note(worker_store.as_ref(), provider.as_ref(), &job).await;
            }
        });

        Self { store, tx }
    }

    /// Queue a note for embedding. Never blocks and never fails the
    /// caller: if the worker is gone the problem is logged and the note
    /// stays unembedded until the next recovery pass.
    pub fn schedule(&self, note: &Note) {
        let job = EmbeddingJob {
            note_id: note.id,
            text: note.text.clone(),
        };
        if let Err(e) = self.tx.send(job) {
            tracing::warn!(
                note_id = %note.id,
                error = %e,
                "Embedding worker unavailable; note left without embedding"
            );
        }
    }

    /// Re-queue every note that still lacks an embedding.
    ///
    /// Called at startup: queued intent lives in memory only, so anything
    /// unfinished when the process died is picked up here. Notes already
    /// in flight are at worst embedded twice, which the idempotent patch
    /// absorbs. Returns how many notes were queued.
    pub async fn recover(&self) -> Result<usize> {
        let pending = self.store.list_notes_missing_embedding().await?;
        let count = pending.len();
        for note in &pending {
            self.schedule(note);
        }
        Ok(count)
    }
}

async fn embed_note(store: &dyn NoteStore, provider: &dyn EmbeddingProvider, job: &EmbeddingJob) {
    match provider.embed_text(&job.text).await {
        Ok(embedding) => {
            if let Err(e) = store
                .set_note_embedding(job.note_id, &embedding, provider.model_name())
                .await
            {
                tracing::warn!(
                    note_id = %job.note_id,
                    error = %e,
                    "Failed to store note embedding"
                );
            }
        }
        Err(e) => {
            tracing::warn!(
                note_id = %job.note_id,
                error = %e,
                "Failed to generate note embedding"
            );
        }
    }
}

/// Progress report for the embedding backfill operation.
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct BackfillProgress {
    /// Total number of notes that needed embedding at start
    pub total: usize,
    /// Number of notes successfully embedded
    pub processed: usize,
    /// Number of notes that failed embedding
    pub errors: usize,
}

/// Embed every note that lacks a vector, synchronously.
///
/// Unlike the background worker this runs to completion and reports what
/// happened; it backs the `backfill-embeddings` command.
pub async fn backfill_embeddings(
    store: &dyn NoteStore,
    provider: &dyn EmbeddingProvider,
) -> Result<BackfillProgress> {
    let pending = store.list_notes_missing_embedding().await?;
    let mut progress = BackfillProgress {
        total: pending.len(),
        ..Default::default()
    };

    for note in pending {
        match provider.embed_text(&note.text).await {
            Ok(embedding) => {
                if let Err(e) = store
                    .set_note_embedding(note.id, &embedding, provider.model_name())
                    .await
                {
                    tracing::warn!(
                        note_id = %note.id,
                        error = %e,
                        "Backfill: failed to store embedding"
                    );
                    progress.errors += 1;
                } else {
                    progress.processed += 1;
                }
            }
            Err(e) => {
                tracing::warn!(
                    note_id = %note.id,
                    error = %e,
                    "Backfill: failed to embed note"
                );
                progress.errors += 1;
            }
        }
    }

    Ok(progress)
}

// ============================================================================
// Tests
// ============================================================================
