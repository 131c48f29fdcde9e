//! Fact record module - the unit of the trusted corpus

use std::fmt;

/// Identifier of a fact record, unique within a corpus
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(String);

impl RecordId {
    /// Create a record identifier from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A trusted fact: a question-like key phrase and its canonical answer
///
/// Records are immutable once the corpus is loaded; the store hands out
/// shared references only.
#[derive(Debug, Clone, PartialEq)]
pub struct FactRecord {
    /// Unique identifier within the corpus
    pub id: RecordId,

    /// Topic or category (e.g. "geography")
    pub topic: String,

    /// Question-like key phrase used for retrieval
    pub key_phrase: String,

    /// Canonical answer text
    pub answer: String,

    /// Alternate phrasings of the key phrase
    pub alternates: Vec<String>,
}

impl FactRecord {
    /// Create a new record without alternate phrasings
    pub fn new(
        id: impl Into<RecordId>,
        topic: impl Into<String>,
        key_phrase: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            topic: topic.into(),
            key_phrase: key_phrase.into(),
            answer: answer.into(),
            alternates: Vec::new(),
        }
    }

    /// Attach alternate phrasings
    pub fn with_alternates(mut self, alternates: Vec<String>) -> Self {
        self.alternates = alternates;
        self
    }

    /// The key phrase followed by every alternate phrasing
    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.key_phrase.as_str()).chain(self.alternates.iter().map(String::as_str))
    }
}
