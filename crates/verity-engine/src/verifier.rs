//! The verification pipeline: retrieval, scoring, then counter-evidence

use crate::counter::CounterEvidenceEngine;
use crate::retrieval::RetrievalEngine;
use crate::scoring::Scorer;
use crate::{EngineError, ScoringPolicy};
use std::sync::Arc;
use tracing::{info, warn};
use verity_domain::{CounterEvidenceReport, Evidence, ScoreResult, VerificationId};

/// Question of the built-in demonstration check
pub const DEMO_QUESTION: &str = "Who founded SpaceX?";

/// Deliberately wrong answer of the built-in demonstration check
pub const DEMO_ANSWER: &str = "Jeff Bezos founded SpaceX.";

/// One question/answer pair to check
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyRequest {
    /// The question that was asked
    pub question: String,
    /// The AI-generated answer to check
    pub answer: String,
    /// Run the counter-evidence search
    pub include_counter: bool,
    /// Override of the verified threshold for this request
    pub verified_threshold: Option<f64>,
    /// Override of the suspected threshold for this request
    pub suspected_threshold: Option<f64>,
}

impl VerifyRequest {
    /// Request with counter-evidence and default thresholds
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            include_counter: true,
            verified_threshold: None,
            suspected_threshold: None,
        }
    }

    /// Enable or disable the counter-evidence search
    pub fn with_counter(mut self, include_counter: bool) -> Self {
        self.include_counter = include_counter;
        self
    }

    /// Override the verdict thresholds
    pub fn with_thresholds(mut self, verified: Option<f64>, suspected: Option<f64>) -> Self {
        self.verified_threshold = verified;
        self.suspected_threshold = suspected;
        self
    }
}

/// Outcome of one verification
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    /// Identifier of this verification
    pub id: VerificationId,
    /// The question, trimmed
    pub question: String,
    /// The answer, trimmed
    pub answer: String,
    /// Evidence the answer was scored against
    pub evidence: Evidence,
    /// Scores, verdict and rationale
    pub score: ScoreResult,
    /// Counter-evidence report, or why the search failed; `None` when not requested
    pub counter: Option<Result<CounterEvidenceReport, String>>,
}

/// Readiness of the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct HealthStatus {
    /// Records in the loaded corpus
    pub corpus_record_count: usize,
    /// Whether the embedding model can serve requests
    pub scoring_model_ready: bool,
    /// Embedding model name
    pub model: String,
    /// Whether an external lookup is configured
    pub external_lookup: bool,
}

/// Runs the full check for a question/answer pair
pub struct Verifier {
    retrieval: Arc<RetrievalEngine>,
    scorer: Scorer,
    counter: CounterEvidenceEngine,
    policy: ScoringPolicy,
}

impl Verifier {
    /// Build a verifier; the policy is validated once here
    pub fn new(retrieval: Arc<RetrievalEngine>, policy: ScoringPolicy) -> Result<Self, EngineError> {
        policy.validate()?;
        Ok(Self {
            scorer: Scorer::new(retrieval.embedder().clone()),
            counter: CounterEvidenceEngine::new(retrieval.clone()),
            retrieval,
            policy,
        })
    }

    /// Default scoring policy
    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// The retrieval engine
    pub fn retrieval(&self) -> &RetrievalEngine {
        &self.retrieval
    }

    /// Verify one question/answer pair
    ///
    /// A failed counter-evidence search is reported inside the result
    /// rather than failing the verification.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyInput`] for a blank question or answer and
    /// [`EngineError::InvalidPolicy`] for bad threshold overrides.
    pub async fn verify(&self, request: &VerifyRequest) -> Result<Verification, EngineError> {
        let question = request.question.trim();
        let answer = request.answer.trim();
        if question.is_empty() {
            return Err(EngineError::EmptyInput("question"));
        }
        if answer.is_empty() {
            return Err(EngineError::EmptyInput("answer"));
        }

        let policy = self
            .policy
            .with_thresholds(request.verified_threshold, request.suspected_threshold)?;

        let evidence = self.retrieval.retrieve(question).await?;
        let score = self.scorer.score(answer, &evidence, &policy)?;

        let counter = request.include_counter.then(|| {
            self.counter
                .find_counter_evidence(question, answer)
                .map_err(|e| {
                    warn!(error = %e, "Counter-evidence search failed");
                    e.to_string()
                })
        });

        let id = VerificationId::new();
        info!(
            id = %id,
            verdict = score.verdict.as_str(),
            confidence = score.confidence,
            source = evidence.source.as_str(),
            "Verified answer"
        );

        Ok(Verification {
            id,
            question: question.to_string(),
            answer: answer.to_string(),
            evidence,
            score,
            counter,
        })
    }

    /// Run the built-in demonstration check with default thresholds
    pub async fn demo(&self) -> Result<Verification, EngineError> {
        self.verify(&VerifyRequest::new(DEMO_QUESTION, DEMO_ANSWER)).await
    }

    /// Current readiness
    pub fn health(&self) -> HealthStatus {
        let embedder = self.retrieval.embedder();
        HealthStatus {
            corpus_record_count: self.retrieval.corpus_size(),
            scoring_model_ready: embedder.is_ready(),
            model: embedder.name().to_string(),
            external_lookup: self.retrieval.has_lookup(),
        }
    }
}
