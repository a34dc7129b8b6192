//! Mock embedding provider for tests
//!
//! Produces deterministic embeddings from text hashes, ensuring:
//! - Same text → same embedding (reproducible tests)
//! - Different texts → different embeddings
//! - Configurable dimensions (match the real provider's config)

use super::traits::EmbeddingProvider;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};

/// Deterministic mock embedding provider for tests.
///
/// Generates embeddings by hashing the input text and spreading the hash
/// across the configured number of dimensions: no network calls, identical
/// texts always produce identical vectors.
///
/// Set `fail_all` to make every call return an error, for exercising the
/// paths that must survive a broken embedding backend.
#[derive(Debug)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
    pub fail_all: AtomicBool,
}

impl MockEmbeddingProvider {
    /// Create a new mock provider with the given embedding dimensions.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            fail_all: AtomicBool::new(false),
        }
    }

    /// Generate a deterministic embedding from text using hash spreading.
    ///
    /// Each dimension is derived by rehashing the previous hash; the
    /// resulting vector is L2-normalized (unit length) so cosine math in
    /// tests behaves like the real thing.
    fn hash_to_embedding(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut hash = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dimensions);
        for _ in 0..self.dimensions {
            // Map u64 to [-1.0, 1.0]
            let value = (hash as f64 / u64::MAX as f64) * 2.0 - 1.0;
            embedding.push(value as f32);

            // Chain hash for next dimension
            let mut h = DefaultHasher::new();
            hash.hash(&mut h);
            hash = h.finish();
        }

        // L2-normalize for cosine similarity compatibility
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }

        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        if self.fail_all.load(Ordering::SeqCst) {
            anyhow::bail!("Mock embedding provider failure");
        }
        Ok(self.hash_to_embedding(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        "mock-hash-embedding"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deterministic_embeddings() {
        let provider = MockEmbeddingProvider::new(768);
        let emb1 = provider.embed_text("hello world").await.unwrap();
        let emb2 = provider.embed_text("hello world").await.unwrap();
        assert_eq!(emb1, emb2, "Same text must produce identical embeddings");
    }

    #[tokio::test]
    async fn test_different_texts_different_embeddings() {
        let provider = MockEmbeddingProvider::new(768);
        let emb1 = provider.embed_text("hello").await.unwrap();
        let emb2 = provider.embed_text("world").await.unwrap();
        assert_ne!(emb1, emb2);
    }

    #[tokio::test]
    async fn test_correct_dimensions() {
        let provider = MockEmbeddingProvider::new(384);
        let emb = provider.embed_text("test").await.unwrap();
        assert_eq!(emb.len(), 384);
    }

    #[tokio::test]
    async fn test_l2_normalized() {
        let provider = MockEmbeddingProvider::new(768);
        let emb = provider.embed_text("normalize me").await.unwrap();
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!(
            (norm - 1.0).abs() < 1e-5,
            "Embedding should be L2-normalized, got norm = {}",
            norm
        );
    }

    #[tokio::test]
    async fn test_failure_mode() {
        let provider = MockEmbeddingProvider::new(768);
        provider.fail_all.store(true, Ordering::SeqCst);
        assert!(provider.embed_text("doomed").await.is_err());
    }
}
