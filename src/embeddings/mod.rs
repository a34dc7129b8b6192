//! Embedding generation module
//!
//! Provides vector embeddings for notes, generated off the request path.
//!
//! Architecture follows the project pattern (trait + impl + mock):
//! - `EmbeddingProvider` trait: async interface for embedding generation
//! - `HttpEmbeddingProvider`: real implementation for a feature-extraction
//!   HTTP endpoint (Hugging Face Inference API and compatible servers)
//! - `MockEmbeddingProvider`: deterministic mock for tests
//!
//! The `EmbeddingScheduler` owns the background worker that turns newly
//! created notes into vectors without blocking their creation.

pub mod mock;
pub mod provider;
pub mod scheduler;
pub mod traits;

pub use mock::MockEmbeddingProvider;
pub use provider::{ensure_vector, HttpEmbeddingProvider, MalformedEmbedding};
pub use scheduler::{backfill_embeddings, BackfillProgress, EmbeddingScheduler};
pub use traits::EmbeddingProvider;
