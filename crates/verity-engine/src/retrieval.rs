//! Retrieval of the best evidence for a question
//!
//! The corpus is scanned linearly: every record's key phrase and alternates
//! are compared with the question, lexically and semantically, and the best
//! record wins when it clears the relevance threshold. Otherwise an external
//! encyclopedia is consulted through the lookup cache.
//!
//! A phrase fully matches a text that carries all of its content terms or is
//! semantically close enough to it. Partial matches ("capital of Spain"
//! against "capital of France") score below one half.
//!
//! Phrase embeddings are computed once when the engine is built.

use crate::{EngineConfig, EngineError};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};
use verity_domain::{Evidence, FactRecord};
use verity_lookup::EncyclopediaLookup;
use verity_store::embedding::{cosine_similarity, EmbeddingModel};
use verity_store::text::{content_terms, normalize};
use verity_store::{CacheEntry, Corpus, LookupCache};

/// A corpus record with its relevance to a query
#[derive(Debug, Clone, Copy)]
pub struct ScoredRecord<'a> {
    /// The record
    pub record: &'a FactRecord,
    /// Relevance in [0, 1]
    pub relevance: f64,
}

/// Precomputed representation of one record phrase
struct PhraseIndex {
    normalized: String,
    terms: HashSet<String>,
    embedding: Vec<f32>,
}

/// Precomputed representation of a query text
struct Query {
    normalized: String,
    terms: HashSet<String>,
    embedding: Vec<f32>,
}

impl PhraseIndex {
    fn build(embedder: &dyn EmbeddingModel, phrase: &str) -> Result<Self, EngineError> {
        Ok(Self {
            normalized: normalize(phrase),
            terms: content_terms(phrase).into_iter().collect(),
            embedding: embedder.embed(phrase)?,
        })
    }

    /// Relevance of the phrase to a query, in [0, 1]
    ///
    /// 1.0 on an exact normalized match. A full match (every content term
    /// present, or semantic similarity of at least `semantic_bar`) scores
    /// `0.5·lexical + 0.5·semantic`; a partial match `0.5·lexical·semantic`.
    fn score(&self, query: &Query, semantic_bar: f64) -> f64 {
        if !self.normalized.is_empty() && self.normalized == query.normalized {
            return 1.0;
        }
        if self.terms.is_empty() {
            return 0.0;
        }

        let shared = self.terms.intersection(&query.terms).count();
        let lexical = shared as f64 / self.terms.len() as f64;
        let semantic = (cosine_similarity(&self.embedding, &query.embedding) as f64).clamp(0.0, 1.0);

        let full = shared == self.terms.len() || semantic >= semantic_bar;
        let relevance = if full {
            0.5 * lexical + 0.5 * semantic
        } else {
            0.5 * lexical * semantic
        };
        relevance.clamp(0.0, 1.0)
    }
}

/// Finds the evidence that best answers a question
pub struct RetrievalEngine {
    corpus: Arc<Corpus>,
    embedder: Arc<dyn EmbeddingModel>,
    phrases: Vec<Vec<PhraseIndex>>,
    lookup: Option<Arc<dyn EncyclopediaLookup>>,
    cache: Option<Arc<LookupCache>>,
    config: EngineConfig,
}

impl RetrievalEngine {
    /// Build an engine over a loaded corpus
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or a phrase cannot be embedded.
    pub fn new(
        corpus: Arc<Corpus>,
        embedder: Arc<dyn EmbeddingModel>,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let phrases = corpus
            .iter()
            .map(|record| {
                record
                    .phrases()
                    .map(|phrase| PhraseIndex::build(embedder.as_ref(), phrase))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(records = corpus.len(), model = embedder.name(), "Indexed corpus phrases");

        Ok(Self {
            corpus,
            embedder,
            phrases,
            lookup: None,
            cache: None,
            config,
        })
    }

    /// Consult `lookup` when the corpus has no relevant record
    pub fn with_lookup(mut self, lookup: Arc<dyn EncyclopediaLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Remember external lookups in `cache`
    pub fn with_cache(mut self, cache: Arc<LookupCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Number of records in the corpus
    pub fn corpus_size(&self) -> usize {
        self.corpus.len()
    }

    /// The corpus being searched
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// The embedding model used for semantic comparison
    pub fn embedder(&self) -> &Arc<dyn EmbeddingModel> {
        &self.embedder
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether an external lookup is configured
    pub fn has_lookup(&self) -> bool {
        self.lookup.is_some()
    }

    fn query(&self, text: &str) -> Result<Option<Query>, EngineError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(Query {
            normalized: normalize(text),
            terms: content_terms(text).into_iter().collect(),
            embedding: self.embedder.embed(text)?,
        }))
    }

    /// Relevance of `text` to `record`, in [0, 1]
    ///
    /// The maximum over the record's key phrase and alternates. Blank text
    /// has zero relevance.
    pub fn relevance(&self, text: &str, record: &FactRecord) -> Result<f64, EngineError> {
        let Some(query) = self.query(text)? else {
            return Ok(0.0);
        };

        let mut best: f64 = 0.0;
        for phrase in record.phrases() {
            let index = PhraseIndex::build(self.embedder.as_ref(), phrase)?;
            best = best.max(index.score(&query, self.config.semantic_match_threshold));
        }
        Ok(best)
    }

    /// Relevance of `text` to every record, in corpus order
    ///
    /// Blank text has zero relevance to everything.
    pub fn relevances(&self, text: &str) -> Result<Vec<f64>, EngineError> {
        let Some(query) = self.query(text)? else {
            return Ok(vec![0.0; self.corpus.len()]);
        };

        let semantic_bar = self.config.semantic_match_threshold;
        Ok(self
            .phrases
            .iter()
            .map(|phrases| {
                phrases
                    .iter()
                    .map(|p| p.score(&query, semantic_bar))
                    .fold(0.0, f64::max)
            })
            .collect())
    }

    /// Up to `k` records ordered by relevance to `text`, best first
    ///
    /// Ties keep corpus order. Blank text ranks nothing.
    pub fn rank(&self, text: &str, k: usize) -> Result<Vec<ScoredRecord<'_>>, EngineError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.top_records(self.relevances(text)?, k))
    }

    /// Order records by the given corpus-ordered scores, best first
    pub(crate) fn top_records(&self, scores: Vec<f64>, k: usize) -> Vec<ScoredRecord<'_>> {
        let mut scored: Vec<ScoredRecord<'_>> = self
            .corpus
            .iter()
            .zip(scores)
            .map(|(record, relevance)| ScoredRecord { record, relevance })
            .collect();

        // Stable sort: equal relevance keeps file order
        scored.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
        scored.truncate(k);
        scored
    }

    /// Best evidence for a question
    ///
    /// Corpus evidence when a record clears the relevance threshold, then
    /// external evidence (cached first), then [`Evidence::none`]. Lookup
    /// failures are logged and never returned.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyInput`] for a blank question.
    pub async fn retrieve(&self, question: &str) -> Result<Evidence, EngineError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(EngineError::EmptyInput("question"));
        }

        if let Some(best) = self.rank(question, 1)?.into_iter().next() {
            if best.relevance >= self.config.relevance_threshold {
                debug!(
                    record = %best.record.id,
                    relevance = best.relevance,
                    "Corpus match"
                );
                return Ok(Evidence::from_corpus(
                    best.record.id.clone(),
                    best.record.key_phrase.clone(),
                    best.record.answer.clone(),
                ));
            }
            debug!(
                record = %best.record.id,
                relevance = best.relevance,
                threshold = self.config.relevance_threshold,
                "Best corpus record below threshold"
            );
        }

        Ok(self.external_evidence(question).await)
    }

    async fn external_evidence(&self, question: &str) -> Evidence {
        let Some(lookup) = &self.lookup else {
            return Evidence::none();
        };
        let key = cache_key(question);

        if let Some(cache) = &self.cache {
            match cache.get(&key) {
                Ok(Some(entry)) => {
                    debug!(key = %key, "Lookup cache hit");
                    return Evidence::from_external(entry.title, entry.text, entry.url);
                }
                Ok(None) => debug!(key = %key, "Lookup cache miss"),
                Err(e) => warn!(error = %e, "Lookup cache read failed"),
            }
        }

        let page = match tokio::time::timeout(self.config.lookup_timeout, lookup.lookup(question)).await {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => {
                warn!(provider = lookup.name(), error = %e, "External lookup failed");
                return Evidence::none();
            }
            Err(_) => {
                warn!(
                    provider = lookup.name(),
                    timeout = ?self.config.lookup_timeout,
                    "External lookup timed out"
                );
                return Evidence::none();
            }
        };

        if let Some(cache) = &self.cache {
            let entry = CacheEntry::new(key, page.title.clone(), page.extract.clone(), page.url.clone());
            if let Err(e) = cache.put(&entry) {
                warn!(error = %e, "Lookup cache write failed");
            }
        }

        page.into_evidence()
    }
}

/// Cache key for a question: its normalized form, or the lowercased text
/// when normalization leaves nothing
fn cache_key(question: &str) -> String {
    let key = normalize(question);
    if key.is_empty() {
        question.trim().to_lowercase()
    } else {
        key
    }
}
