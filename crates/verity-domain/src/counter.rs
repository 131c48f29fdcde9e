//! Counter-evidence types
//!
//! A counter-evidence search splits the answer into atomic claims, analyses
//! each claim against related corpus records, and reports the strongest
//! contradiction it found. "Nothing found" is a normal outcome and is kept
//! distinct from a failed search (which surfaces as an error instead).

use crate::{Evidence, RecordId};

/// How a claim relates to the corpus records on its topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimStatus {
    /// A related record contradicts the claim
    LikelyContradicted,
    /// Related records exist but do not support the claim enough
    Unverifiable,
    /// Related records support the claim, or at least do not contradict it
    SupportedOrNeutral,
    /// No related record was found
    NoEvidence,
}

impl ClaimStatus {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::LikelyContradicted => "likely_contradicted",
            ClaimStatus::Unverifiable => "unverifiable",
            ClaimStatus::SupportedOrNeutral => "supported_or_neutral",
            ClaimStatus::NoEvidence => "no_evidence",
        }
    }
}

/// Which signal flagged a contradiction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContradictionKind {
    /// Exactly one side is negated
    NegatedPolarity,
    /// Both sides carry numbers and none of them agree
    NumericMismatch,
    /// The claim does not carry the canonical answer
    AnswerDivergence,
}

impl ContradictionKind {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ContradictionKind::NegatedPolarity => "negated_polarity",
            ContradictionKind::NumericMismatch => "numeric_mismatch",
            ContradictionKind::AnswerDivergence => "answer_divergence",
        }
    }
}

/// Analysis of a single atomic claim
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimAnalysis {
    /// The claim text
    pub claim: String,

    /// Derived status
    pub status: ClaimStatus,

    /// Best support score over related records, in [0, 1]
    pub support_score: f64,

    /// Best contradiction score over related records, in [0, 1]
    pub contradiction_score: f64,

    /// Canonical answer of the most supportive record
    pub support_passage: Option<String>,

    /// Canonical answer of the most contradicting record
    pub counter_passage: Option<String>,

    /// Record behind `counter_passage`
    pub counter_record: Option<RecordId>,

    /// Signal that fired for the contradiction, if any
    pub kind: Option<ContradictionKind>,
}

impl ClaimAnalysis {
    /// Analysis for a claim with no related record
    pub fn no_evidence(claim: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            status: ClaimStatus::NoEvidence,
            support_score: 0.0,
            contradiction_score: 0.0,
            support_passage: None,
            counter_passage: None,
            counter_record: None,
            kind: None,
        }
    }
}

/// Result of the counter-evidence search
#[derive(Debug, Clone, PartialEq)]
pub enum CounterFinding {
    /// A corpus record contradicts the answer
    Found {
        /// The contradicting evidence
        evidence: Evidence,
        /// Corpus record the evidence comes from
        record_id: RecordId,
        /// Signal that fired
        kind: ContradictionKind,
    },
    /// No explicit contradiction in the corpus
    NotFound,
}

/// Full counter-evidence report for one answer
#[derive(Debug, Clone, PartialEq)]
pub struct CounterEvidenceReport {
    /// Per-claim analyses, in claim order
    pub analysis: Vec<ClaimAnalysis>,

    /// Strongest contradiction, if any
    pub finding: CounterFinding,
}

impl CounterEvidenceReport {
    /// The contradicting evidence, if one was found
    pub fn evidence(&self) -> Option<&Evidence> {
        match &self.finding {
            CounterFinding::Found { evidence, .. } => Some(evidence),
            CounterFinding::NotFound => None,
        }
    }

    /// Record behind the contradicting evidence, if one was found
    pub fn record_id(&self) -> Option<&RecordId> {
        match &self.finding {
            CounterFinding::Found { record_id, .. } => Some(record_id),
            CounterFinding::NotFound => None,
        }
    }

    /// True when some claim was contradicted
    pub fn is_found(&self) -> bool {
        matches!(self.finding, CounterFinding::Found { .. })
    }
}
