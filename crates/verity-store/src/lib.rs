//! Verity Storage Layer
//!
//! Everything that is loaded from or written to disk, plus the text
//! representation used to compare texts.
//!
//! # Architecture
//!
//! - [`corpus`]: the read-only fact corpus, validated at load time
//! - [`cache`]: bounded SQLite cache for external lookups
//! - [`embedding`]: local embedding model and cosine similarity
//! - [`text`]: normalization, keywords, stemming, negation and number cues
//!
//! # Examples
//!
//! ```no_run
//! use verity_store::{Corpus, LookupCache};
//!
//! let corpus = Corpus::load("data/corpus.json").unwrap();
//! let cache = LookupCache::in_memory().unwrap();
//! assert!(!corpus.is_empty());
//! assert!(cache.is_empty().unwrap());
//! ```

#![warn(missing_docs)]

pub mod cache;
pub mod corpus;
pub mod embedding;
pub mod text;

pub use cache::{CacheEntry, LookupCache};
pub use corpus::Corpus;
pub use embedding::{cosine_similarity, EmbeddingError, EmbeddingModel, LexicalEmbeddingModel};

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Corpus file missing or unreadable
    #[error("Corpus unavailable: {0}")]
    CorpusUnavailable(String),

    /// Corpus file is not valid JSON for the record schema
    #[error("Malformed corpus: {0}")]
    Json(#[from] serde_json::Error),

    /// A record failed validation
    #[error("Invalid record at position {position}: {reason}")]
    InvalidRecord {
        /// Zero-based position in the corpus file
        position: usize,
        /// What is wrong with it
        reason: String,
    },

    /// Two records share an identifier
    #[error("Duplicate record id: {0}")]
    DuplicateId(String),

    /// The corpus contains no records
    #[error("Corpus contains no records")]
    EmptyCorpus,

    /// The cache mutex was poisoned by a panicking holder
    #[error("Lookup cache lock poisoned")]
    LockPoisoned,
}
