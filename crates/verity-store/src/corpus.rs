//! Trusted fact corpus
//!
//! The corpus is a JSON array of fact records loaded once at start-up and
//! read-only for the rest of the process lifetime. Every entry is checked
//! against an explicit schema at load time; a single malformed entry fails
//! the whole load.

use crate::text::normalize;
use crate::StoreError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};
use verity_domain::{FactRecord, RecordId};

/// On-disk shape of a corpus entry
#[derive(Debug, Deserialize)]
struct CorpusEntry {
    id: String,

    #[serde(default = "default_topic", alias = "category")]
    topic: String,

    #[serde(alias = "question")]
    key_phrase: String,

    #[serde(alias = "text")]
    answer: String,

    #[serde(default)]
    alternates: Vec<String>,
}

fn default_topic() -> String {
    "general".to_string()
}

/// In-memory fact corpus with unique record identifiers
#[derive(Debug, Clone)]
pub struct Corpus {
    records: Vec<FactRecord>,
    index: HashMap<RecordId, usize>,
}

impl Corpus {
    /// Load and validate a corpus file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            StoreError::CorpusUnavailable(format!("{}: {}", path.display(), e))
        })?;

        let corpus = Self::from_json_str(&contents)?;
        info!(path = %path.display(), records = corpus.len(), "Loaded fact corpus");
        Ok(corpus)
    }

    /// Parse and validate a corpus from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let entries: Vec<CorpusEntry> = serde_json::from_str(json)?;

        let records = entries
            .into_iter()
            .enumerate()
            .map(|(position, entry)| entry_to_record(position, entry))
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_records(records)
    }

    /// Build a corpus from already-constructed records
    ///
    /// Fails on an empty corpus, duplicate ids or blank fields.
    pub fn from_records(records: Vec<FactRecord>) -> Result<Self, StoreError> {
        if records.is_empty() {
            return Err(StoreError::EmptyCorpus);
        }

        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            validate_record(position, record)?;
            if index.insert(record.id.clone(), position).is_some() {
                return Err(StoreError::DuplicateId(record.id.to_string()));
            }
        }

        debug!(records = records.len(), "Corpus validated");
        Ok(Self { records, index })
    }

    /// All records, in file order
    pub fn records(&self) -> &[FactRecord] {
        &self.records
    }

    /// Look up a record by identifier
    pub fn get(&self, id: &RecordId) -> Option<&FactRecord> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a loaded corpus; kept for API symmetry
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records in file order
    pub fn iter(&self) -> impl Iterator<Item = &FactRecord> {
        self.records.iter()
    }
}

fn entry_to_record(position: usize, entry: CorpusEntry) -> Result<FactRecord, StoreError> {
    let record = FactRecord::new(
        entry.id.trim(),
        entry.topic.trim(),
        entry.key_phrase.trim(),
        entry.answer.trim(),
    )
    .with_alternates(
        entry
            .alternates
            .into_iter()
            .map(|a| a.trim().to_string())
            .collect(),
    );
    validate_record(position, &record)?;
    Ok(record)
}

fn validate_record(position: usize, record: &FactRecord) -> Result<(), StoreError> {
    let blank = |field: &str| StoreError::InvalidRecord {
        position,
        reason: format!("field '{}' is empty", field),
    };

    if record.id.as_str().trim().is_empty() {
        return Err(blank("id"));
    }
    if record.topic.trim().is_empty() {
        return Err(blank("topic"));
    }
    if record.key_phrase.trim().is_empty() {
        return Err(blank("key_phrase"));
    }
    if record.answer.trim().is_empty() {
        return Err(blank("answer"));
    }
    if record.alternates.iter().any(|a| a.trim().is_empty()) {
        return Err(blank("alternates"));
    }

    // A phrase without words can never be matched
    let wordless = |field: &str| StoreError::InvalidRecord {
        position,
        reason: format!("field '{}' has no words", field),
    };
    if normalize(&record.key_phrase).is_empty() {
        return Err(wordless("key_phrase"));
    }
    if record.alternates.iter().any(|a| normalize(a).is_empty()) {
        return Err(wordless("alternates"));
    }
    Ok(())
}
