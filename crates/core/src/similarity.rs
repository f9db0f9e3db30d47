//! Embedding-vector constants and similarity math.
//!
//! The embedding itself comes from an external provider; this module only
//! validates dimensionality and compares vectors. Scores are cosine
//! similarity in `-1.0..=1.0`, higher meaning more alike.

use crate::error::CoreError;

/// Dimensionality of the similarity vectors produced by the embedding
/// provider.
pub const EMBEDDING_DIMENSION: usize = 1536;

/// Validate that an embedding vector has the expected dimensionality.
pub fn validate_embedding_dimension(embedding: &[f32]) -> Result<(), CoreError> {
    if embedding.len() != EMBEDDING_DIMENSION {
        return Err(CoreError::Validation(format!(
            "Embedding must be {EMBEDDING_DIMENSION}-dimensional, got {}",
            embedding.len()
        )));
    }
    Ok(())
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns 0.0 when the vectors differ in length or either has zero
/// magnitude, so degenerate inputs rank last instead of erroring.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
