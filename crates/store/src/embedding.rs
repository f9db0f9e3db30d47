//! The external embedding collaborator.
//!
//! Vector generation is an opaque external service; the engine only ever
//! hands it text and stores whatever fixed-length vector comes back. The
//! mock implementation is deterministic per input so tests and local
//! development get stable similarity rankings without any external
//! dependency.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use quill_core::similarity::EMBEDDING_DIMENSION;

/// Error type for embedding generation.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("Embedding provider failed: {0}")]
    Provider(String),
}

/// Produces similarity vectors for article text.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate a vector for the given text.
    async fn generate(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

// ---------------------------------------------------------------------------
// MockEmbeddingProvider
// ---------------------------------------------------------------------------

/// Deterministic stand-in for a real embedding service.
///
/// Seeds a PRNG from a hash of the input text, so identical text always
/// maps to the identical vector, and normalizes to unit length so cosine
/// similarity behaves like it would with real embeddings.
#[derive(Default)]
pub struct MockEmbeddingProvider;

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn generate(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut rng = StdRng::seed_from_u64(hasher.finish());

        let mut vector: Vec<f32> = (0..EMBEDDING_DIMENSION)
            .map(|_| rng.random_range(-1.0f32..1.0))
            .collect();

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        Ok(vector)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
