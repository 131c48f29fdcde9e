//! End-to-end checks of the verification pipeline against the sample corpus

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use verity_domain::{ClaimStatus, EvidenceSource, Verdict};
use verity_engine::{EngineConfig, RetrievalEngine, ScoringPolicy, Verifier, VerifyRequest};
use verity_lookup::{LookupError, LookupPage, MockLookup};
use verity_store::{Corpus, LexicalEmbeddingModel, LookupCache};

fn sample_corpus() -> Arc<Corpus> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/corpus.json");
    Arc::new(Corpus::load(path).unwrap())
}

fn retrieval() -> RetrievalEngine {
    RetrievalEngine::new(
        sample_corpus(),
        Arc::new(LexicalEmbeddingModel::default()),
        EngineConfig::default(),
    )
    .unwrap()
}

fn verifier(retrieval: RetrievalEngine) -> Verifier {
    Verifier::new(Arc::new(retrieval), ScoringPolicy::default()).unwrap()
}

#[tokio::test]
async fn test_correct_answer_is_verified_from_corpus() {
    let request = VerifyRequest::new("What is the capital of France?", "Paris is the capital of France");
    let result = verifier(retrieval()).verify(&request).await.unwrap();

    assert_eq!(result.score.verdict, Verdict::Verified);
    assert_eq!(result.evidence.source, EvidenceSource::Corpus);
    assert_eq!(result.evidence.text, "Paris");
}

#[tokio::test]
async fn test_unknown_question_with_failed_lookup_is_unverifiable() {
    let question = "What is the airspeed velocity of an unladen swallow?";
    let lookup = MockLookup::new();
    lookup.add_failure(question, LookupError::Communication("connection refused".to_string()));

    let verifier = verifier(retrieval().with_lookup(Arc::new(lookup.clone())));
    let result = verifier
        .verify(&VerifyRequest::new(question, "About eleven metres per second."))
        .await
        .unwrap();

    assert_eq!(result.evidence.source, EvidenceSource::None);
    assert_eq!(result.score.verdict, Verdict::Unverifiable);
    assert_eq!(result.score.rationale, "No supporting evidence retrieved.");
    assert_eq!(lookup.call_count(), 1);
}

#[tokio::test]
async fn test_contradicting_answer_gets_counter_evidence() {
    let request = VerifyRequest::new("What is the capital of France?", "The capital of France is Berlin");
    let result = verifier(retrieval()).verify(&request).await.unwrap();

    assert_ne!(result.score.verdict, Verdict::Verified);

    let report = result.counter.unwrap().unwrap();
    assert_eq!(report.analysis[0].status, ClaimStatus::LikelyContradicted);
    assert_eq!(report.evidence().unwrap().text, "Paris");
}

#[tokio::test]
async fn test_repeated_external_lookup_hits_cache() {
    let question = "Who composed the Four Seasons?";
    let lookup = MockLookup::new();
    lookup.add_response(
        question,
        LookupPage::new(
            "The Four Seasons (Vivaldi)",
            "The Four Seasons is a group of four violin concertos by Antonio Vivaldi.",
            "https://en.wikipedia.org/wiki/The_Four_Seasons_(Vivaldi)",
        ),
    );
    let cache = Arc::new(LookupCache::in_memory().unwrap());
    let verifier = verifier(
        retrieval()
            .with_lookup(Arc::new(lookup.clone()))
            .with_cache(cache.clone()),
    );

    let request = VerifyRequest::new(question, "Antonio Vivaldi composed the Four Seasons.");
    let first = verifier.verify(&request).await.unwrap();
    let second = verifier.verify(&request).await.unwrap();

    assert_eq!(first.evidence.source, EvidenceSource::External);
    assert_eq!(first.evidence, second.evidence);
    assert_eq!(first.score, second.score);
    assert_eq!(lookup.call_count(), 1);
    assert_eq!(cache.len().unwrap(), 1);
}

#[tokio::test]
async fn test_cache_file_is_reused_across_restarts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lookup_cache.db");
    let question = "Who composed the Four Seasons?";
    let lookup = MockLookup::new();
    lookup.add_response(
        question,
        LookupPage::new("The Four Seasons", "Violin concertos by Antonio Vivaldi.", "https://example.org/seasons"),
    );

    for _ in 0..2 {
        let cache = Arc::new(LookupCache::open(&path, 16, Duration::from_secs(3600)).unwrap());
        let engine = retrieval().with_lookup(Arc::new(lookup.clone())).with_cache(cache);
        let evidence = engine.retrieve(question).await.unwrap();
        assert_eq!(evidence.source, EvidenceSource::External);
    }

    assert_eq!(lookup.call_count(), 1);
}

#[tokio::test]
async fn test_threshold_override_changes_verdict() {
    let question = "What is the capital of France?";
    let answer = "The capital of France is Berlin";
    let verifier = verifier(retrieval());

    let strict = verifier.verify(&VerifyRequest::new(question, answer)).await.unwrap();
    let relaxed = verifier
        .verify(&VerifyRequest::new(question, answer).with_thresholds(Some(0.2), Some(0.1)))
        .await
        .unwrap();

    assert_eq!(strict.score.confidence, relaxed.score.confidence);
    assert_ne!(strict.score.verdict, Verdict::Verified);
    assert_eq!(relaxed.score.verdict, Verdict::Verified);
}

#[tokio::test]
async fn test_question_about_another_country_falls_through_to_lookup() {
    let question = "What is the capital of Spain?";
    let lookup = MockLookup::new();
    lookup.add_response(
        question,
        LookupPage::new("Madrid", "Madrid is the capital and largest city of Spain.", "https://en.wikipedia.org/wiki/Madrid"),
    );

    let engine = retrieval().with_lookup(Arc::new(lookup.clone()));
    let evidence = engine.retrieve(question).await.unwrap();

    assert_eq!(evidence.source, EvidenceSource::External);
    assert_eq!(lookup.call_count(), 1);

    let italy = retrieval().retrieve("What is the capital of Italy?").await.unwrap();
    assert_eq!(italy.source, EvidenceSource::None);
}

#[tokio::test]
async fn test_correct_answer_about_unlisted_entity_has_no_counter_evidence() {
    let request = VerifyRequest::new("What is the capital of Spain?", "Madrid is the capital of Spain.");
    let result = verifier(retrieval()).verify(&request).await.unwrap();

    assert_eq!(result.evidence.source, EvidenceSource::None);
    let report = result.counter.unwrap().unwrap();
    assert!(!report.is_found());
    assert!(report.analysis.iter().all(|a| a.status == ClaimStatus::NoEvidence));
}

#[tokio::test]
async fn test_other_company_founder_is_not_matched_to_spacex() {
    let request = VerifyRequest::new("Who founded Tesla?", "Tesla was founded by Martin Eberhard and Marc Tarpenning.");
    let result = verifier(retrieval()).verify(&request).await.unwrap();

    assert_eq!(result.evidence.source, EvidenceSource::None);
    assert!(!result.counter.unwrap().unwrap().is_found());
}
