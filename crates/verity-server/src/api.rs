//! JSON wire types of the HTTP API.
//!
//! These are shared with the command-line client, so every type
//! round-trips through serde in both directions.

use serde::{Deserialize, Serialize};
use verity_domain::{
    ClaimAnalysis, CounterEvidenceReport, CounterFinding, Evidence, EvidenceRef,
};
use verity_engine::{HealthStatus, Verification, VerifyRequest};

/// Body of `POST /verify`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyRequestBody {
    /// The question that was asked
    pub question: String,
    /// The AI-generated answer to check
    pub answer: String,
    /// Run the counter-evidence search
    #[serde(default = "default_include_counter")]
    pub include_counter: bool,
    /// Per-request verified threshold, in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_threshold: Option<f64>,
    /// Per-request suspected threshold, in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspected_threshold: Option<f64>,
}

fn default_include_counter() -> bool {
    true
}

impl VerifyRequestBody {
    /// Body with counter-evidence on and default thresholds
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            include_counter: true,
            verified_threshold: None,
            suspected_threshold: None,
        }
    }
}

impl From<VerifyRequestBody> for VerifyRequest {
    fn from(body: VerifyRequestBody) -> Self {
        VerifyRequest::new(body.question, body.answer)
            .with_counter(body.include_counter)
            .with_thresholds(body.verified_threshold, body.suspected_threshold)
    }
}

/// Evidence as sent over the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceDto {
    /// `corpus`, `external` or `none`
    pub source: String,
    /// Evidence text; empty when nothing was found
    pub text: String,
    /// Matched key phrase or page title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Record identifier or page URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl From<&Evidence> for EvidenceDto {
    fn from(evidence: &Evidence) -> Self {
        Self {
            source: evidence.source.as_str().to_string(),
            text: evidence.text.clone(),
            context: evidence.context.clone(),
            reference: evidence.reference.as_ref().map(|r| match r {
                EvidenceRef::Record(id) => id.as_str().to_string(),
                EvidenceRef::Url(url) => url.clone(),
            }),
        }
    }
}

/// Per-claim counter-evidence analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimAnalysisDto {
    /// The claim text
    pub claim: String,
    /// `supported_or_neutral`, `likely_contradicted`, `unverifiable` or `no_evidence`
    pub status: String,
    /// Best support score
    pub support_score: f64,
    /// Best contradiction score
    pub contradiction_score: f64,
    /// Passage of the best supporting record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_passage: Option<String>,
    /// Passage of the most contradicting record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_passage: Option<String>,
    /// Contradiction signal that fired
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl From<&ClaimAnalysis> for ClaimAnalysisDto {
    fn from(analysis: &ClaimAnalysis) -> Self {
        Self {
            claim: analysis.claim.clone(),
            status: analysis.status.as_str().to_string(),
            support_score: analysis.support_score,
            contradiction_score: analysis.contradiction_score,
            support_passage: analysis.support_passage.clone(),
            counter_passage: analysis.counter_passage.clone(),
            kind: analysis.kind.map(|k| k.as_str().to_string()),
        }
    }
}

/// Counter-evidence outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterEvidenceDto {
    /// `found`, `not_found` or `failed`
    pub status: String,
    /// Contradicting passage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Corpus record of the contradicting passage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    /// Contradiction signal that fired
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Why the search failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Per-claim analyses
    #[serde(default)]
    pub analysis: Vec<ClaimAnalysisDto>,
}

impl CounterEvidenceDto {
    /// Outcome of a failed search
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: "failed".to_string(),
            text: None,
            record_id: None,
            kind: None,
            error: Some(error.into()),
            analysis: Vec::new(),
        }
    }

    /// True when a contradiction was found
    pub fn is_found(&self) -> bool {
        self.status == "found"
    }
}

impl From<&CounterEvidenceReport> for CounterEvidenceDto {
    fn from(report: &CounterEvidenceReport) -> Self {
        let analysis = report.analysis.iter().map(ClaimAnalysisDto::from).collect();
        match &report.finding {
            CounterFinding::Found { evidence, record_id, kind } => Self {
                status: "found".to_string(),
                text: Some(evidence.text.clone()),
                record_id: Some(record_id.as_str().to_string()),
                kind: Some(kind.as_str().to_string()),
                error: None,
                analysis,
            },
            CounterFinding::NotFound => Self {
                status: "not_found".to_string(),
                text: None,
                record_id: None,
                kind: None,
                error: None,
                analysis,
            },
        }
    }
}

/// Body of a successful `POST /verify` or `GET /demo`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Verification identifier
    pub id: String,
    /// The question, trimmed
    pub question: String,
    /// The answer, trimmed
    pub answer: String,
    /// `verified`, `suspected` or `unverifiable`
    pub verdict: String,
    /// Human-readable verdict
    pub verdict_label: String,
    /// Weighted confidence in [0, 1]
    pub confidence: f64,
    /// Semantic similarity in [0, 1]
    pub similarity: f64,
    /// Keyword coverage in [0, 1]
    pub coverage: f64,
    /// One-sentence explanation
    pub rationale: String,
    /// Evidence keywords the answer mentions
    pub matched_keywords: Vec<String>,
    /// Evidence keywords the answer omits
    pub missing_keywords: Vec<String>,
    /// Evidence the answer was scored against
    pub evidence: EvidenceDto,
    /// Counter-evidence, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_evidence: Option<CounterEvidenceDto>,
}

impl From<&Verification> for VerifyResponse {
    fn from(v: &Verification) -> Self {
        Self {
            id: v.id.to_string(),
            question: v.question.clone(),
            answer: v.answer.clone(),
            verdict: v.score.verdict.as_str().to_string(),
            verdict_label: v.score.verdict.label().to_string(),
            confidence: v.score.confidence,
            similarity: v.score.similarity,
            coverage: v.score.coverage,
            rationale: v.score.rationale.clone(),
            matched_keywords: v.score.matched_keywords.clone(),
            missing_keywords: v.score.missing_keywords.clone(),
            evidence: EvidenceDto::from(&v.evidence),
            counter_evidence: v.counter.as_ref().map(|counter| match counter {
                Ok(report) => CounterEvidenceDto::from(report),
                Err(error) => CounterEvidenceDto::failed(error.clone()),
            }),
        }
    }
}

/// Body of `GET /`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootResponse {
    /// Service name
    pub name: String,
    /// Records in the loaded corpus
    pub corpus_size: usize,
    /// Available routes
    pub routes: Vec<String>,
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` when the service answers
    pub status: String,
    /// Records in the loaded corpus
    pub corpus_record_count: usize,
    /// Whether the scoring model can serve requests
    pub scoring_model_ready: bool,
    /// Scoring model name
    pub model: String,
    /// Whether the encyclopedia fallback is configured
    pub external_lookup: bool,
}

impl From<HealthStatus> for HealthResponse {
    fn from(health: HealthStatus) -> Self {
        Self {
            status: "ok".to_string(),
            corpus_record_count: health.corpus_record_count,
            scoring_model_ready: health.scoring_model_ready,
            model: health.model,
            external_lookup: health.external_lookup,
        }
    }
}

/// Error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_domain::{ClaimStatus, ContradictionKind, RecordId};

    #[test]
    fn test_request_defaults() {
        let body: VerifyRequestBody =
            serde_json::from_str(r#"{"question": "Who founded SpaceX?", "answer": "Elon Musk"}"#).unwrap();
        assert!(body.include_counter);
        assert_eq!(body.verified_threshold, None);

        let request = VerifyRequest::from(body);
        assert!(request.include_counter);
        assert_eq!(request.answer, "Elon Musk");
    }

    #[test]
    fn test_request_omits_unset_thresholds() {
        let json = serde_json::to_value(VerifyRequestBody::new("q", "a")).unwrap();
        assert!(json.get("verified_threshold").is_none());
        assert_eq!(json["include_counter"], true);
    }

    #[test]
    fn test_evidence_reference() {
        let corpus = Evidence::from_corpus(RecordId::from("geo-001"), "What is the capital of France?", "Paris");
        let dto = EvidenceDto::from(&corpus);
        assert_eq!(dto.source, "corpus");
        assert_eq!(dto.reference.as_deref(), Some("geo-001"));

        let none = EvidenceDto::from(&Evidence::none());
        assert_eq!(none.source, "none");
        assert!(none.reference.is_none());
    }

    #[test]
    fn test_counter_found() {
        let report = CounterEvidenceReport {
            analysis: vec![ClaimAnalysis {
                claim: "The capital of France is Berlin".to_string(),
                status: ClaimStatus::LikelyContradicted,
                support_score: 0.0,
                contradiction_score: 1.0,
                support_passage: None,
                counter_passage: Some("Paris".to_string()),
                counter_record: Some(RecordId::from("geo-001")),
                kind: Some(ContradictionKind::AnswerDivergence),
            }],
            finding: CounterFinding::Found {
                evidence: Evidence::from_corpus(RecordId::from("geo-001"), "What is the capital of France?", "Paris"),
                record_id: RecordId::from("geo-001"),
                kind: ContradictionKind::AnswerDivergence,
            },
        };

        let dto = CounterEvidenceDto::from(&report);
        assert!(dto.is_found());
        assert_eq!(dto.text.as_deref(), Some("Paris"));
        assert_eq!(dto.record_id.as_deref(), Some("geo-001"));
        assert_eq!(dto.analysis[0].status, "likely_contradicted");
    }

    #[test]
    fn test_counter_failed() {
        let dto = CounterEvidenceDto::failed("boom");
        assert_eq!(dto.status, "failed");
        assert_eq!(dto.error.as_deref(), Some("boom"));
        assert!(!dto.is_found());
    }
}
