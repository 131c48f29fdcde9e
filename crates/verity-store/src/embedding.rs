//! Embedding Model for Text Vectorization
//!
//! This module provides text-to-vector conversion for similarity scoring.
//! Models run locally so that scoring needs neither network access nor
//! large model files.
//!
//! # Implementation
//!
//! [`LexicalEmbeddingModel`] uses the hashing trick: every stemmed content
//! term of the text is hashed into one of `dimension` buckets with a hashed
//! sign, the counts are summed and the vector is normalised to unit length.
//! Texts sharing vocabulary point in similar directions; unrelated texts are
//! close to orthogonal.
//!
//! # Examples
//!
//! ```rust
//! use verity_store::embedding::{cosine_similarity, EmbeddingModel, LexicalEmbeddingModel};
//!
//! let model = LexicalEmbeddingModel::new(512);
//! let a = model.embed("Paris is the capital of France").unwrap();
//! let b = model.embed("The capital of France is Paris.").unwrap();
//! assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-5);
//! ```

use crate::text::content_terms;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Default embedding dimension
pub const DEFAULT_DIMENSION: usize = 512;

/// Errors that can occur during embedding generation
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Model not loaded
    #[error("Embedding model not loaded")]
    ModelNotLoaded,

    /// Invalid input text
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Trait for embedding models
pub trait EmbeddingModel: Send + Sync {
    /// Generate an embedding vector for the given text
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Get the dimension of embeddings produced by this model
    fn dimension(&self) -> usize;

    /// Short model name reported by health checks
    fn name(&self) -> &str;

    /// Whether the model can serve requests
    fn is_ready(&self) -> bool {
        true
    }
}

/// Hashed bag-of-terms embedding model
///
/// - **Deterministic**: same text always produces the same embedding
/// - **Normalized**: non-zero vectors have unit length
/// - **Order-insensitive**: word order does not change the vector
pub struct LexicalEmbeddingModel {
    dimension: usize,
}

impl LexicalEmbeddingModel {
    /// Create a new model with the given dimension (must be non-zero)
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    /// Bucket index and sign for a term
    fn bucket(&self, term: &str) -> (usize, f32) {
        let mut hasher = DefaultHasher::new();
        term.hash(&mut hasher);
        let hash = hasher.finish();

        let index = (hash % self.dimension as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }
}

impl Default for LexicalEmbeddingModel {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl EmbeddingModel for LexicalEmbeddingModel {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "Empty text cannot be embedded".to_string(),
            ));
        }

        let mut embedding = vec![0.0f32; self.dimension];
        for term in content_terms(text) {
            let (index, sign) = self.bucket(&term);
            embedding[index] += sign;
        }

        // Normalize to unit length for cosine similarity
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut embedding {
                *value /= magnitude;
            }
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "lexical-hash"
    }
}

/// Calculate cosine similarity between two embedding vectors
///
/// Returns a value in [-1, 1]; zero when either vector has no magnitude or
/// the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}
