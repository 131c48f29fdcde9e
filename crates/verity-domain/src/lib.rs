//! Verity Domain Layer
//!
//! This crate contains the core value types shared by every other Verity crate.
//! It carries no I/O and a single external dependency (`uuid`), so the retrieval,
//! scoring and service layers can all agree on one vocabulary.
//!
//! ## Key Concepts
//!
//! - **Fact Record**: a trusted corpus entry (key phrase + canonical answer)
//! - **Evidence**: text with provenance retrieved to support or refute an answer
//! - **Score Result**: similarity, coverage, confidence and the derived verdict
//! - **Verdict**: verified / suspected / unverifiable
//! - **Counter-evidence**: per-claim contradiction analysis against the corpus
//!
//! ## Architecture
//!
//! - Pure data and small invariants only
//! - Corpus loading lives in `verity-store`
//! - Scoring policy and algorithms live in `verity-engine`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod counter;
pub mod evidence;
pub mod record;
pub mod verdict;
pub mod verification;

// Re-exports for convenience
pub use counter::{ClaimAnalysis, ClaimStatus, ContradictionKind, CounterEvidenceReport, CounterFinding};
pub use evidence::{Evidence, EvidenceRef, EvidenceSource};
pub use record::{FactRecord, RecordId};
pub use verdict::{ScoreResult, Verdict};
pub use verification::VerificationId;
