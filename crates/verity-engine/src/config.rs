//! Engine configuration

use crate::EngineError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use verity_domain::Verdict;

/// Weights and verdict thresholds for combining similarity and coverage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    /// Weight of semantic similarity in the confidence
    pub similarity_weight: f64,

    /// Weight of keyword coverage in the confidence
    pub coverage_weight: f64,

    /// Minimum confidence for a verified verdict
    pub verified_threshold: f64,

    /// Minimum confidence for a suspected verdict
    pub suspected_threshold: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            similarity_weight: 0.6,
            coverage_weight: 0.4,
            verified_threshold: 0.70,
            suspected_threshold: 0.40,
        }
    }
}

impl ScoringPolicy {
    /// Higher bars for both verdicts
    pub fn strict() -> Self {
        Self {
            verified_threshold: 0.80,
            suspected_threshold: 0.50,
            ..Self::default()
        }
    }

    /// Lower bars for both verdicts
    pub fn lenient() -> Self {
        Self {
            verified_threshold: 0.60,
            suspected_threshold: 0.30,
            ..Self::default()
        }
    }

    /// Copy of this policy with per-request threshold overrides applied
    ///
    /// The result is validated; an override that breaks the ordering of the
    /// thresholds is rejected rather than clamped.
    pub fn with_thresholds(
        &self,
        verified: Option<f64>,
        suspected: Option<f64>,
    ) -> Result<Self, EngineError> {
        let policy = Self {
            verified_threshold: verified.unwrap_or(self.verified_threshold),
            suspected_threshold: suspected.unwrap_or(self.suspected_threshold),
            ..self.clone()
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Check ranges and ordering
    pub fn validate(&self) -> Result<(), EngineError> {
        let in_unit = |name: &str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(EngineError::InvalidPolicy(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )))
            }
        };

        in_unit("similarity_weight", self.similarity_weight)?;
        in_unit("coverage_weight", self.coverage_weight)?;
        in_unit("verified_threshold", self.verified_threshold)?;
        in_unit("suspected_threshold", self.suspected_threshold)?;

        if (self.similarity_weight + self.coverage_weight - 1.0).abs() > 1e-6 {
            return Err(EngineError::InvalidPolicy(format!(
                "weights must sum to 1, got {} + {}",
                self.similarity_weight, self.coverage_weight
            )));
        }
        if self.suspected_threshold > self.verified_threshold {
            return Err(EngineError::InvalidPolicy(format!(
                "suspected_threshold ({}) must not exceed verified_threshold ({})",
                self.suspected_threshold, self.verified_threshold
            )));
        }
        Ok(())
    }

    /// Weighted confidence, clamped to [0, 1]
    pub fn confidence(&self, similarity: f64, coverage: f64) -> f64 {
        (self.similarity_weight * similarity + self.coverage_weight * coverage).clamp(0.0, 1.0)
    }

    /// Verdict for a confidence value
    pub fn verdict_for(&self, confidence: f64) -> Verdict {
        if confidence >= self.verified_threshold {
            Verdict::Verified
        } else if confidence >= self.suspected_threshold {
            Verdict::Suspected
        } else {
            Verdict::Unverifiable
        }
    }
}

/// Retrieval and counter-evidence settings
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Minimum relevance for a corpus record to count as a match (0.0-1.0)
    pub relevance_threshold: f64,

    /// Semantic similarity at which a phrase matches even when the text
    /// lacks some of its content terms (0.0-1.0)
    pub semantic_match_threshold: f64,

    /// Maximum number of atomic claims analysed per answer
    pub max_claims: usize,

    /// Related records considered per claim
    pub top_k: usize,

    /// How far contradiction must exceed support to flag a claim
    pub contradiction_margin: f64,

    /// Support below this leaves a claim unverifiable
    pub support_floor: f64,

    /// Upper bound on one external lookup, cache miss included
    pub lookup_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            relevance_threshold: 0.5,
            semantic_match_threshold: 0.8,
            max_claims: 3,
            top_k: 3,
            contradiction_margin: 0.15,
            support_floor: 0.35,
            lookup_timeout: Duration::from_secs(5),
        }
    }
}

impl EngineConfig {
    /// Tighter matching; contradictions flagged more eagerly
    pub fn strict() -> Self {
        Self {
            relevance_threshold: 0.6,
            semantic_match_threshold: 0.9,
            contradiction_margin: 0.10,
            support_floor: 0.45,
            ..Self::default()
        }
    }

    /// Looser matching; contradictions need a wider margin
    pub fn lenient() -> Self {
        Self {
            relevance_threshold: 0.4,
            semantic_match_threshold: 0.7,
            contradiction_margin: 0.20,
            support_floor: 0.25,
            ..Self::default()
        }
    }

    /// Check ranges
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.relevance_threshold > 0.0 && self.relevance_threshold <= 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "relevance_threshold must be within (0, 1], got {}",
                self.relevance_threshold
            )));
        }
        if self.max_claims == 0 || self.top_k == 0 {
            return Err(EngineError::InvalidConfig(
                "max_claims and top_k must be at least 1".to_string(),
            ));
        }
        if !(self.semantic_match_threshold > 0.0 && self.semantic_match_threshold <= 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "semantic_match_threshold must be within (0, 1], got {}",
                self.semantic_match_threshold
            )));
        }
        for (name, value) in [
            ("contradiction_margin", self.contradiction_margin),
            ("support_floor", self.support_floor),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.lookup_timeout.is_zero() {
            return Err(EngineError::InvalidConfig("lookup_timeout must be positive".to_string()));
        }
        Ok(())
    }
}
