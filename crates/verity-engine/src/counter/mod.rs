//! Counter-evidence search
//!
//! The answer is split into atomic claims. Each claim is compared with the
//! corpus records related to its topic (by the question or by the claim
//! itself). A record supports a claim in proportion to how much of its
//! canonical answer the claim carries, and contradicts it otherwise, or
//! outright when a contradiction detector fires.

pub mod detection;

use crate::claims::split_claims;
use crate::retrieval::{RetrievalEngine, ScoredRecord};
use crate::EngineError;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;
use verity_domain::{
    ClaimAnalysis, ClaimStatus, ContradictionKind, CounterEvidenceReport, CounterFinding, Evidence, FactRecord,
};
use verity_store::text::{content_terms, keywords};

/// Support and contradiction of one claim against one record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordComparison {
    /// Topic relevance times agreement
    pub support: f64,
    /// Topic relevance times disagreement, or the full relevance on a detector hit
    pub contradiction: f64,
    /// Detector that fired, if any
    pub kind: Option<ContradictionKind>,
}

/// Fraction of the record's canonical-answer keywords present in the claim
pub fn agreement(claim: &str, record: &FactRecord) -> f64 {
    let answer_keywords = keywords(&record.answer);
    if answer_keywords.is_empty() {
        return 0.0;
    }
    let claim_terms: HashSet<String> = content_terms(claim).into_iter().collect();
    let present = answer_keywords.iter().filter(|k| claim_terms.contains(*k)).count();
    present as f64 / answer_keywords.len() as f64
}

/// Compare a claim with a related record
///
/// A negated or numerically conflicting claim gives the record no support.
pub fn compare(claim: &str, record: &FactRecord, topic_relevance: f64) -> RecordComparison {
    let agreement = agreement(claim, record);
    let kind = detection::detect_all(claim, &record.answer, agreement);

    let support = match kind {
        Some(ContradictionKind::NegatedPolarity) | Some(ContradictionKind::NumericMismatch) => 0.0,
        _ => topic_relevance * agreement,
    };
    let contradiction = match kind {
        Some(_) => topic_relevance,
        None => topic_relevance * (1.0 - agreement),
    };

    RecordComparison {
        support,
        contradiction,
        kind,
    }
}

/// Searches the corpus for evidence against an answer
pub struct CounterEvidenceEngine {
    retrieval: Arc<RetrievalEngine>,
}

impl CounterEvidenceEngine {
    /// Create an engine over the retrieval engine's corpus and settings
    pub fn new(retrieval: Arc<RetrievalEngine>) -> Self {
        Self { retrieval }
    }

    /// Records related to the claim's topic, best first, above the threshold
    fn related(&self, question_scores: &[f64], claim: &str) -> Result<Vec<ScoredRecord<'_>>, EngineError> {
        let config = self.retrieval.config();
        let claim_scores = self.retrieval.relevances(claim)?;
        let topic_scores = question_scores
            .iter()
            .zip(claim_scores)
            .map(|(q, c)| q.max(c))
            .collect();

        Ok(self
            .retrieval
            .top_records(topic_scores, config.top_k)
            .into_iter()
            .filter(|scored| scored.relevance >= config.relevance_threshold)
            .collect())
    }

    fn analyse_claim(&self, question_scores: &[f64], claim: String) -> Result<ClaimAnalysis, EngineError> {
        let related = self.related(question_scores, &claim)?;
        if related.is_empty() {
            return Ok(ClaimAnalysis::no_evidence(claim));
        }

        let comparisons: Vec<(&FactRecord, RecordComparison)> = related
            .iter()
            .map(|scored| (scored.record, compare(&claim, scored.record, scored.relevance)))
            .collect();

        // First maximum wins so that ties favour the more relevant record
        let best_support = comparisons
            .iter()
            .fold(None::<&(&FactRecord, RecordComparison)>, |best, item| match best {
                Some(b) if b.1.support >= item.1.support => Some(b),
                _ => Some(item),
            });
        let best_contradiction = comparisons
            .iter()
            .fold(None::<&(&FactRecord, RecordComparison)>, |best, item| match best {
                Some(b) if b.1.contradiction >= item.1.contradiction => Some(b),
                _ => Some(item),
            });

        let (support_record, support) = match best_support {
            Some((record, cmp)) => (Some(*record), cmp.support),
            None => (None, 0.0),
        };
        let (counter_record, contradiction, kind) = match best_contradiction {
            Some((record, cmp)) => (Some(*record), cmp.contradiction, cmp.kind),
            None => (None, 0.0, None),
        };

        let config = self.retrieval.config();
        let status = if contradiction > support + config.contradiction_margin {
            ClaimStatus::LikelyContradicted
        } else if support < config.support_floor {
            ClaimStatus::Unverifiable
        } else {
            ClaimStatus::SupportedOrNeutral
        };

        debug!(
            claim = %claim,
            status = status.as_str(),
            support,
            contradiction,
            "Analysed claim"
        );

        Ok(ClaimAnalysis {
            claim,
            status,
            support_score: support,
            contradiction_score: contradiction,
            support_passage: support_record.map(|r| r.answer.clone()),
            counter_passage: counter_record.map(|r| r.answer.clone()),
            counter_record: counter_record.map(|r| r.id.clone()),
            kind,
        })
    }

    /// Analyse every claim of `answer` and report the strongest contradiction
    ///
    /// Finding no contradiction is a normal [`CounterFinding::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyInput`] for a blank question or answer.
    pub fn find_counter_evidence(
        &self,
        question: &str,
        answer: &str,
    ) -> Result<CounterEvidenceReport, EngineError> {
        if question.trim().is_empty() {
            return Err(EngineError::EmptyInput("question"));
        }
        if answer.trim().is_empty() {
            return Err(EngineError::EmptyInput("answer"));
        }

        let question_scores = self.retrieval.relevances(question)?;
        let analysis = split_claims(answer, self.retrieval.config().max_claims)
            .into_iter()
            .map(|claim| self.analyse_claim(&question_scores, claim))
            .collect::<Result<Vec<_>, _>>()?;

        let finding = strongest_contradiction(&analysis)
            .and_then(|claim| {
                let id = claim.counter_record.as_ref()?;
                let record = self.retrieval.corpus().get(id)?;
                Some(CounterFinding::Found {
                    evidence: Evidence::from_corpus(id.clone(), record.key_phrase.clone(), record.answer.clone()),
                    record_id: id.clone(),
                    kind: claim.kind.unwrap_or(ContradictionKind::AnswerDivergence),
                })
            })
            .unwrap_or(CounterFinding::NotFound);

        Ok(CounterEvidenceReport { analysis, finding })
    }
}

fn strongest_contradiction(analysis: &[ClaimAnalysis]) -> Option<&ClaimAnalysis> {
    analysis
        .iter()
        .filter(|a| a.status == ClaimStatus::LikelyContradicted)
        .fold(None, |best: Option<&ClaimAnalysis>, item| match best {
            Some(b) if b.contradiction_score >= item.contradiction_score => Some(b),
            _ => Some(item),
        })
}
