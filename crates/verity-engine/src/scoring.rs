//! Scoring an answer against retrieved evidence
//!
//! Two signals are combined:
//!
//! - **similarity**: cosine between the answer and the evidence statement
//!   (the matched key phrase or page title followed by the evidence text),
//!   clamped to [0, 1]
//! - **coverage**: fraction of the evidence text's keywords that the answer
//!   mentions
//!
//! The weighted sum is thresholded into a [`Verdict`] by the
//! [`ScoringPolicy`]. Scoring is a pure function of its inputs.

use crate::{EngineError, ScoringPolicy};
use std::collections::HashSet;
use std::sync::Arc;
use verity_domain::{Evidence, EvidenceSource, ScoreResult, Verdict};
use verity_store::embedding::{cosine_similarity, EmbeddingModel};
use verity_store::text::{content_terms, keywords, snippet};

/// Evidence snippet length quoted in rationales
const SNIPPET_CHARS: usize = 80;

/// Keywords listed in a rationale
const RATIONALE_KEYWORDS: usize = 5;

/// Matched keywords returned to callers
const MAX_MATCHED: usize = 20;

/// Missing keywords returned to callers
const MAX_MISSING: usize = 10;

const NO_EVIDENCE_RATIONALE: &str = "No supporting evidence retrieved.";

/// Keyword overlap between evidence and answer
#[derive(Debug, Clone, PartialEq)]
pub struct Coverage {
    /// Matched fraction of evidence keywords, in [0, 1]
    pub ratio: f64,
    /// Evidence keywords present in the answer, in evidence order
    pub matched: Vec<String>,
    /// Evidence keywords absent from the answer, in evidence order
    pub missing: Vec<String>,
}

/// Fraction of `evidence_text` keywords mentioned by `answer`
///
/// ```
/// use verity_engine::scoring::keyword_coverage;
///
/// let coverage = keyword_coverage("Elon Musk founded SpaceX in 2002.", "Musk founded SpaceX");
/// assert_eq!(coverage.matched, vec!["musk", "found", "spacex"]);
/// assert_eq!(coverage.missing, vec!["elon", "2002"]);
/// assert!((coverage.ratio - 0.6).abs() < 1e-9);
/// ```
pub fn keyword_coverage(evidence_text: &str, answer: &str) -> Coverage {
    let answer_terms: HashSet<String> = content_terms(answer).into_iter().collect();
    let (matched, missing): (Vec<String>, Vec<String>) = keywords(evidence_text)
        .into_iter()
        .partition(|k| answer_terms.contains(k));

    let total = matched.len() + missing.len();
    let ratio = if total == 0 {
        0.0
    } else {
        matched.len() as f64 / total as f64
    };

    Coverage {
        ratio,
        matched,
        missing,
    }
}

/// Computes [`ScoreResult`]s
pub struct Scorer {
    embedder: Arc<dyn EmbeddingModel>,
}

impl Scorer {
    /// Create a scorer using the given embedding model
    pub fn new(embedder: Arc<dyn EmbeddingModel>) -> Self {
        Self { embedder }
    }

    /// Cosine similarity between two texts, clamped to [0, 1]
    pub fn similarity(&self, a: &str, b: &str) -> Result<f64, EngineError> {
        if a.trim().is_empty() || b.trim().is_empty() {
            return Ok(0.0);
        }
        let a = self.embedder.embed(a)?;
        let b = self.embedder.embed(b)?;
        Ok((cosine_similarity(&a, &b) as f64).clamp(0.0, 1.0))
    }

    /// Score `answer` against `evidence`
    ///
    /// Empty evidence always yields an unverifiable result with zero scores.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyInput`] for a blank answer.
    pub fn score(
        &self,
        answer: &str,
        evidence: &Evidence,
        policy: &ScoringPolicy,
    ) -> Result<ScoreResult, EngineError> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(EngineError::EmptyInput("answer"));
        }
        if evidence.is_empty() {
            return Ok(ScoreResult::unverifiable(NO_EVIDENCE_RATIONALE));
        }

        let similarity = self.similarity(answer, &evidence.statement())?;
        let coverage = keyword_coverage(&evidence.text, answer);
        let confidence = policy.confidence(similarity, coverage.ratio);
        let verdict = policy.verdict_for(confidence);

        let rationale = rationale(verdict, evidence, similarity, &coverage);

        Ok(ScoreResult {
            similarity,
            coverage: coverage.ratio,
            confidence,
            verdict,
            matched_keywords: coverage.matched.into_iter().take(MAX_MATCHED).collect(),
            missing_keywords: coverage.missing.into_iter().take(MAX_MISSING).collect(),
            rationale,
        })
    }
}

fn percent(value: f64) -> String {
    format!("{:.0}%", value * 100.0)
}

fn listed(terms: &[String]) -> String {
    if terms.is_empty() {
        "none".to_string()
    } else {
        terms
            .iter()
            .take(RATIONALE_KEYWORDS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn rationale(verdict: Verdict, evidence: &Evidence, similarity: f64, coverage: &Coverage) -> String {
    let source = match evidence.source {
        EvidenceSource::Corpus => "corpus",
        EvidenceSource::External => "external",
        EvidenceSource::None => "no",
    };
    let cited = format!(
        "{} evidence \"{}\" (similarity {}, coverage {})",
        source,
        snippet(&evidence.text, SNIPPET_CHARS),
        percent(similarity),
        percent(coverage.ratio)
    );

    match verdict {
        Verdict::Verified => format!(
            "Answer aligns well with {}. Matched key terms: {}.",
            cited,
            listed(&coverage.matched)
        ),
        Verdict::Suspected => format!(
            "Partial support from {}. Missing key terms: {}.",
            cited,
            listed(&coverage.missing)
        ),
        Verdict::Unverifiable => format!(
            "Low match with {}. Missing key terms: {}.",
            cited,
            listed(&coverage.missing)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_domain::RecordId;
    use verity_store::LexicalEmbeddingModel;

    fn scorer() -> Scorer {
        Scorer::new(Arc::new(LexicalEmbeddingModel::default()))
    }

    fn paris() -> Evidence {
        Evidence::from_corpus(RecordId::from("geo-001"), "What is the capital of France?", "Paris")
    }

    #[test]
    fn test_matching_answer_is_verified() {
        let result = scorer()
            .score("Paris is the capital of France", &paris(), &ScoringPolicy::default())
            .unwrap();

        assert_eq!(result.verdict, Verdict::Verified);
        assert!((result.similarity - 1.0).abs() < 1e-5);
        assert_eq!(result.coverage, 1.0);
        assert_eq!(result.matched_keywords, vec!["paris"]);
        assert!(result.rationale.starts_with("Answer aligns well with corpus evidence \"Paris\""));
    }

    #[test]
    fn test_wrong_answer_is_not_verified() {
        let result = scorer()
            .score("The capital of France is Berlin", &paris(), &ScoringPolicy::default())
            .unwrap();

        assert_ne!(result.verdict, Verdict::Verified);
        assert_eq!(result.coverage, 0.0);
        assert_eq!(result.missing_keywords, vec!["paris"]);
        assert!(result.rationale.contains("Missing key terms: paris."));
    }

    #[test]
    fn test_empty_evidence_is_unverifiable() {
        let result = scorer()
            .score("Anything at all", &Evidence::none(), &ScoringPolicy::default())
            .unwrap();

        assert_eq!(result, ScoreResult::unverifiable(NO_EVIDENCE_RATIONALE));
    }

    #[test]
    fn test_blank_answer_rejected() {
        let result = scorer().score("  ", &paris(), &ScoringPolicy::default());
        assert!(matches!(result, Err(EngineError::EmptyInput("answer"))));
    }

    #[test]
    fn test_thresholds_change_verdict_only() {
        let answer = "The capital of France is Berlin";
        let default = scorer().score(answer, &paris(), &ScoringPolicy::default()).unwrap();
        let lenient = ScoringPolicy::default().with_thresholds(Some(0.3), Some(0.1)).unwrap();
        let relaxed = scorer().score(answer, &paris(), &lenient).unwrap();

        assert_eq!(default.confidence, relaxed.confidence);
        assert_eq!(relaxed.verdict, Verdict::Verified);
    }

    #[test]
    fn test_keyword_lists_are_capped() {
        let text = (0..40).map(|i| format!("term{:02}x", i)).collect::<Vec<_>>().join(" ");
        let answer = (0..30).map(|i| format!("term{:02}x", i)).collect::<Vec<_>>().join(" ");
        let evidence = Evidence::from_external("Terms", text, "https://example.org");

        let result = scorer().score(&answer, &evidence, &ScoringPolicy::default()).unwrap();
        assert_eq!(result.matched_keywords.len(), MAX_MATCHED);
        assert_eq!(result.missing_keywords.len(), MAX_MISSING);
        assert!((result.coverage - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_coverage_without_keywords() {
        let coverage = keyword_coverage("the of and", "anything");
        assert_eq!(coverage.ratio, 0.0);
        assert!(coverage.matched.is_empty());
    }

    #[test]
    fn test_rationale_snippet_is_truncated() {
        let long = "Mount Everest is Earth's highest mountain above sea level, located in the Mahalangur Himal sub-range of the Himalayas.";
        let evidence = Evidence::from_external("Mount Everest", long, "https://example.org");
        let result = scorer().score("Everest is the highest mountain", &evidence, &ScoringPolicy::default()).unwrap();
        assert!(result.rationale.contains("..."));
        assert!(!result.rationale.contains("Himalayas"));
    }
}
