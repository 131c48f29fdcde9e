//! Evidence and provenance tracking

use crate::RecordId;

/// Where a piece of evidence came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvidenceSource {
    /// A record of the trusted corpus
    Corpus,
    /// An external encyclopedia page
    External,
    /// Nothing was found
    None,
}

impl EvidenceSource {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceSource::Corpus => "corpus",
            EvidenceSource::External => "external",
            EvidenceSource::None => "none",
        }
    }
}

/// Pointer back to the origin of the evidence text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvidenceRef {
    /// Corpus record identifier
    Record(RecordId),
    /// External page URL
    Url(String),
}

/// Evidence retrieved for a question, with provenance
#[derive(Debug, Clone, PartialEq)]
pub struct Evidence {
    /// Provenance tag
    pub source: EvidenceSource,

    /// Evidence text (canonical answer or page extract)
    pub text: String,

    /// What the text answers: the matched key phrase or the page title
    pub context: Option<String>,

    /// Record or URL reference
    pub reference: Option<EvidenceRef>,
}

impl Evidence {
    /// Evidence taken from a corpus record
    pub fn from_corpus(id: RecordId, key_phrase: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            source: EvidenceSource::Corpus,
            text: answer.into(),
            context: Some(key_phrase.into()),
            reference: Some(EvidenceRef::Record(id)),
        }
    }

    /// Evidence taken from an external page
    pub fn from_external(title: impl Into<String>, text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            source: EvidenceSource::External,
            text: text.into(),
            context: Some(title.into()),
            reference: Some(EvidenceRef::Url(url.into())),
        }
    }

    /// Empty evidence marked "none"
    ///
    /// Callers must treat it as input for an unverifiable verdict.
    pub fn none() -> Self {
        Self {
            source: EvidenceSource::None,
            text: String::new(),
            context: None,
            reference: None,
        }
    }

    /// True when there is no usable evidence text
    pub fn is_empty(&self) -> bool {
        self.source == EvidenceSource::None || self.text.trim().is_empty()
    }

    /// Context and text joined into one statement for semantic comparison
    pub fn statement(&self) -> String {
        match &self.context {
            Some(context) if !context.trim().is_empty() => format!("{} {}", context.trim(), self.text.trim()),
            _ => self.text.trim().to_string(),
        }
    }

    /// Record identifier, if this is corpus evidence
    pub fn record_id(&self) -> Option<&RecordId> {
        match &self.reference {
            Some(EvidenceRef::Record(id)) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_empty() {
        let evidence = Evidence::none();
        assert!(evidence.is_empty());
        assert_eq!(evidence.source.as_str(), "none");
        assert_eq!(evidence.statement(), "");
    }

    #[test]
    fn test_corpus_statement_joins_context() {
        let evidence = Evidence::from_corpus(RecordId::from("geo-001"), "What is the capital of France?", "Paris");
        assert_eq!(evidence.statement(), "What is the capital of France? Paris");
        assert_eq!(evidence.record_id(), Some(&RecordId::from("geo-001")));
        assert!(!evidence.is_empty());
    }

    #[test]
    fn test_external_reference_is_url() {
        let evidence = Evidence::from_external("SpaceX", "SpaceX was founded by Elon Musk.", "https://en.wikipedia.org/wiki/SpaceX");
        assert_eq!(evidence.source, EvidenceSource::External);
        assert!(evidence.record_id().is_none());
        assert!(matches!(evidence.reference, Some(EvidenceRef::Url(_))));
    }
}
