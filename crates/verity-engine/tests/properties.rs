//! Property tests for retrieval and scoring

use proptest::prelude::*;
use std::sync::Arc;
use verity_domain::{Evidence, EvidenceSource, FactRecord, RecordId};
use verity_engine::scoring::keyword_coverage;
use verity_engine::{EngineConfig, RetrievalEngine, Scorer, ScoringPolicy};
use verity_store::embedding::{cosine_similarity, EmbeddingModel};
use verity_store::{Corpus, LexicalEmbeddingModel};

const VOCABULARY: &[&str] = &[
    "paris", "france", "capital", "river", "mountain", "rocket", "planet", "ocean", "gold", "silver",
    "einstein", "relativity", "armstrong", "moon", "apollo", "vivaldi", "violin", "nile", "africa", "everest",
];

/// Distinct head words, one per generated record
const HEADS: &[&str] = &[
    "東京", "富士山", "zürich", "málaga", "москва", "αθήνα", "القاهرة", "서울", "kraków", "łódź", "日本の首都は", "reykjavík",
];

/// Words several generated records may share
const SHARED: &[&str] = &["größe", "höhe", "人口", "población", "столица", "首都"];

/// Records whose key phrases are a unique head word plus some shared words
fn unicode_records() -> impl Strategy<Value = Vec<FactRecord>> {
    proptest::sample::subsequence(HEADS.to_vec(), 1..=HEADS.len())
        .prop_flat_map(|heads| {
            let extras = proptest::collection::vec(proptest::sample::subsequence(SHARED.to_vec(), 0..=2), heads.len());
            (Just(heads), extras)
        })
        .prop_map(|(heads, extras)| {
            heads
                .iter()
                .zip(extras)
                .enumerate()
                .map(|(i, (head, extra))| {
                    let mut words = vec![*head];
                    words.extend(extra);
                    FactRecord::new(
                        RecordId::new(format!("rec-{}", i)),
                        "general",
                        format!("{}?", words.join(" ")),
                        format!("Answer {}", i),
                    )
                })
                .collect()
        })
}

fn engine_over(records: Vec<FactRecord>) -> RetrievalEngine {
    RetrievalEngine::new(
        Arc::new(Corpus::from_records(records).unwrap()),
        Arc::new(LexicalEmbeddingModel::default()),
        EngineConfig::default(),
    )
    .unwrap()
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

fn scorer() -> Scorer {
    Scorer::new(Arc::new(LexicalEmbeddingModel::default()))
}

#[tokio::test]
async fn test_every_key_phrase_retrieves_its_record() {
    let corpus = Arc::new(Corpus::load(concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/corpus.json")).unwrap());
    let engine = RetrievalEngine::new(
        corpus.clone(),
        Arc::new(LexicalEmbeddingModel::default()),
        EngineConfig::default(),
    )
    .unwrap();

    for record in corpus.iter() {
        let evidence = engine.retrieve(&record.key_phrase).await.unwrap();
        assert_eq!(evidence.source, EvidenceSource::Corpus, "{}", record.id);
        assert_eq!(evidence.text, record.answer, "{}", record.id);
    }
}

proptest! {
    #[test]
    fn prop_unicode_key_phrase_retrieves_its_record(records in unicode_records()) {
        let engine = engine_over(records.clone());
        for record in &records {
            let evidence = block_on(engine.retrieve(&record.key_phrase)).unwrap();
            prop_assert_eq!(evidence.source, EvidenceSource::Corpus);
            prop_assert_eq!(evidence.record_id(), Some(&record.id));
            prop_assert_eq!(&evidence.text, &record.answer);
        }
    }

    #[test]
    fn prop_question_missing_the_head_word_is_not_a_match(
        heads in proptest::sample::subsequence(HEADS.to_vec(), 2),
        shared in proptest::sample::select(SHARED.to_vec()),
    ) {
        // Head words hashed onto the same bucket are indistinguishable to the embedder
        let model = LexicalEmbeddingModel::default();
        let overlap = cosine_similarity(&model.embed(heads[0]).unwrap(), &model.embed(heads[1]).unwrap());
        prop_assume!(overlap < 0.5);

        let record = FactRecord::new("rec-0", "general", format!("{} {}?", shared, heads[0]), "Answer");
        let engine = engine_over(vec![record]);

        let evidence = block_on(engine.retrieve(&format!("{} {}?", shared, heads[1]))).unwrap();
        prop_assert_eq!(evidence.source, EvidenceSource::None);
    }

    #[test]
    fn prop_scores_are_bounded(
        answer in "[A-Za-z0-9 ,.?'-]{1,120}",
        text in "[A-Za-z0-9 ,.?'-]{1,120}",
        context in "[A-Za-z ?]{0,40}",
    ) {
        prop_assume!(!answer.trim().is_empty());
        let evidence = Evidence::from_corpus(RecordId::from("r"), context, text);
        let result = scorer().score(&answer, &evidence, &ScoringPolicy::default()).unwrap();

        for value in [result.similarity, result.coverage, result.confidence] {
            prop_assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn prop_scoring_is_idempotent(
        answer in "[a-z ]{1,80}",
        text in "[a-z ]{1,80}",
    ) {
        prop_assume!(!answer.trim().is_empty());
        let evidence = Evidence::from_external("Title", text, "https://example.org");
        let first = scorer().score(&answer, &evidence, &ScoringPolicy::default()).unwrap();
        let second = scorer().score(&answer, &evidence, &ScoringPolicy::default()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_more_overlap_never_lowers_coverage(
        evidence_words in proptest::sample::subsequence(VOCABULARY.to_vec(), 1..VOCABULARY.len()),
        mask in proptest::collection::vec(any::<bool>(), VOCABULARY.len()),
        extra in 0usize..VOCABULARY.len(),
    ) {
        let evidence = evidence_words.join(" ");
        let base: Vec<&str> = VOCABULARY.iter().zip(&mask).filter(|(_, keep)| **keep).map(|(w, _)| *w).collect();
        let mut wider = base.clone();
        wider.push(VOCABULARY[extra]);

        let narrow = keyword_coverage(&evidence, &base.join(" "));
        let broad = keyword_coverage(&evidence, &wider.join(" "));
        prop_assert!(broad.ratio >= narrow.ratio);
    }
}
