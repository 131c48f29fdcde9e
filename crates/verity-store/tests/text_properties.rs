//! Property tests for text analysis and embeddings

use proptest::prelude::*;
use verity_store::embedding::{cosine_similarity, EmbeddingModel, LexicalEmbeddingModel};
use verity_store::text::{keywords, normalize, snippet};

proptest! {
    #[test]
    fn prop_keywords_are_unique(text in "[a-zA-Z ,.?]{0,200}") {
        let kws = keywords(&text);
        let mut deduped = kws.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(kws.len(), deduped.len());
    }

    #[test]
    fn prop_normalize_is_idempotent(text in "[a-zA-Z0-9 ,.?!-]{0,200}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn prop_letters_in_any_script_survive_normalization(word in "\\p{L}{1,12}", punct in "[?!.,¿¡]{0,3}") {
        let normalized = normalize(&format!("{}{}", word, punct));
        prop_assert!(!normalized.is_empty());
        prop_assert_eq!(normalize(&normalized), normalized);
    }

    #[test]
    fn prop_self_similarity(text in "[a-z]{3,10}( [a-z]{3,10}){0,12}") {
        let model = LexicalEmbeddingModel::default();
        let v = model.embed(&text).unwrap();
        let sim = cosine_similarity(&v, &v);
        prop_assert!(sim == 0.0 || (sim - 1.0).abs() < 1e-4);
    }

    #[test]
    fn prop_similarity_is_bounded(a in "[a-z]{3,10}( [a-z]{3,10}){0,8}", b in "[a-z]{3,10}( [a-z]{3,10}){0,8}") {
        let model = LexicalEmbeddingModel::default();
        let sim = cosine_similarity(&model.embed(&a).unwrap(), &model.embed(&b).unwrap());
        prop_assert!((-1.0001..=1.0001).contains(&sim));
    }

    #[test]
    fn prop_snippet_is_bounded(text in ".{0,300}", max in 1usize..100) {
        prop_assert!(snippet(&text, max).chars().count() <= max + 3);
    }
}
