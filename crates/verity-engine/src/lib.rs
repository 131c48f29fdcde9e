//! Verity Engine
//!
//! Checks an AI-generated answer against trusted evidence.
//!
//! The engine provides:
//! - Retrieval of the best corpus record, with an external fallback
//! - Similarity and keyword-coverage scoring with verdict thresholds
//! - Per-claim counter-evidence analysis
//! - A [`Verifier`] that runs the three steps for one request
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use verity_engine::{EngineConfig, RetrievalEngine, ScoringPolicy, Verifier, VerifyRequest};
//! use verity_store::{Corpus, LexicalEmbeddingModel};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let corpus = Arc::new(Corpus::load("data/corpus.json")?);
//! let retrieval = RetrievalEngine::new(corpus, Arc::new(LexicalEmbeddingModel::default()), EngineConfig::default())?;
//! let verifier = Verifier::new(Arc::new(retrieval), ScoringPolicy::default())?;
//!
//! let result = verifier
//!     .verify(&VerifyRequest::new("What is the capital of France?", "Paris"))
//!     .await?;
//! println!("{}: {}", result.score.verdict, result.score.rationale);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod claims;
mod config;
pub mod counter;
mod error;
pub mod retrieval;
pub mod scoring;
mod verifier;

pub use config::{EngineConfig, ScoringPolicy};
pub use counter::CounterEvidenceEngine;
pub use error::EngineError;
pub use retrieval::{RetrievalEngine, ScoredRecord};
pub use scoring::Scorer;
pub use verifier::{HealthStatus, Verification, Verifier, VerifyRequest, DEMO_ANSWER, DEMO_QUESTION};
