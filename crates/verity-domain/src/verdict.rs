//! Verdicts and score results

use std::fmt;

/// Outcome of checking an answer against evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Confidence reached the verified threshold
    Verified,
    /// Confidence reached the suspected threshold only
    Suspected,
    /// Confidence too low, or no evidence at all
    Unverifiable,
}

impl Verdict {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Verified => "verified",
            Verdict::Suspected => "suspected",
            Verdict::Unverifiable => "unverifiable",
        }
    }

    /// Human-readable label used by the dashboard
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Verified => "Verified",
            Verdict::Suspected => "Hallucination Suspected",
            Verdict::Unverifiable => "Unverifiable",
        }
    }

    /// Parse a verdict from its string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "verified" => Some(Verdict::Verified),
            "suspected" | "hallucination suspected" => Some(Verdict::Suspected),
            "unverifiable" => Some(Verdict::Unverifiable),
            _ => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores derived from one (answer, evidence) pair
///
/// Stateless: recomputed on every call, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    /// Semantic similarity between answer and evidence, in [0, 1]
    pub similarity: f64,

    /// Fraction of evidence keywords present in the answer, in [0, 1]
    pub coverage: f64,

    /// Weighted combination of similarity and coverage, in [0, 1]
    pub confidence: f64,

    /// Thresholded verdict
    pub verdict: Verdict,

    /// Evidence keywords found in the answer
    pub matched_keywords: Vec<String>,

    /// Evidence keywords absent from the answer
    pub missing_keywords: Vec<String>,

    /// Short templated explanation
    pub rationale: String,
}

impl ScoreResult {
    /// Result for a check with no usable evidence
    pub fn unverifiable(rationale: impl Into<String>) -> Self {
        Self {
            similarity: 0.0,
            coverage: 0.0,
            confidence: 0.0,
            verdict: Verdict::Unverifiable,
            matched_keywords: Vec::new(),
            missing_keywords: Vec::new(),
            rationale: rationale.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_parse_roundtrip() {
        for verdict in [Verdict::Verified, Verdict::Suspected, Verdict::Unverifiable] {
            assert_eq!(Verdict::parse(verdict.as_str()), Some(verdict));
        }
        assert_eq!(Verdict::parse("Hallucination Suspected"), Some(Verdict::Suspected));
        assert!(Verdict::parse("maybe").is_none());
    }

    #[test]
    fn test_unverifiable_result_is_zeroed() {
        let result = ScoreResult::unverifiable("No supporting evidence retrieved.");
        assert_eq!(result.verdict, Verdict::Unverifiable);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.similarity, 0.0);
        assert_eq!(result.coverage, 0.0);
    }
}
