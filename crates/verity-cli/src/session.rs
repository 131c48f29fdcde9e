//! Session history of verification runs.
//!
//! Entries live for one interactive session only. The history is bounded;
//! once full, the oldest run is dropped.

use crate::error::{CliError, Result};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use verity_domain::Verdict;
use verity_server::api::VerifyResponse;

const CSV_HEADER: &str = "id,timestamp,question,answer,verdict,confidence,coverage,rationale";

/// One verification run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// Verification identifier assigned by the server
    pub id: String,
    /// When the result was received
    pub timestamp: DateTime<Utc>,
    /// The question
    pub question: String,
    /// The answer that was checked
    pub answer: String,
    /// Verdict
    #[serde(serialize_with = "serialize_verdict")]
    pub verdict: Verdict,
    /// Weighted confidence
    pub confidence: f64,
    /// Keyword coverage
    pub coverage: f64,
    /// Rationale sentence
    pub rationale: String,
}

impl HistoryEntry {
    /// Entry for a response received at `timestamp`
    ///
    /// # Errors
    ///
    /// Fails when the response carries a verdict this client does not know.
    pub fn from_response(response: &VerifyResponse, timestamp: DateTime<Utc>) -> Result<Self> {
        let verdict = Verdict::parse(&response.verdict).ok_or_else(|| {
            CliError::UnexpectedResponse(format!("unknown verdict '{}'", response.verdict))
        })?;

        Ok(Self {
            id: response.id.clone(),
            timestamp,
            question: response.question.clone(),
            answer: response.answer.clone(),
            verdict,
            confidence: response.confidence,
            coverage: response.coverage,
            rationale: response.rationale.clone(),
        })
    }

    fn csv_row(&self) -> String {
        [
            escape_csv(&self.id),
            escape_csv(&self.timestamp.to_rfc3339()),
            escape_csv(&self.question),
            escape_csv(&self.answer),
            self.verdict.as_str().to_string(),
            format!("{:.4}", self.confidence),
            format!("{:.4}", self.coverage),
            escape_csv(&self.rationale),
        ]
        .join(",")
    }
}

/// Aggregates over a session
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionStats {
    /// Number of runs
    pub runs: usize,
    /// Mean confidence, 0 when there are no runs
    pub average_confidence: f64,
    /// Mean coverage, 0 when there are no runs
    pub average_coverage: f64,
    /// Runs with a verified verdict
    pub verified: usize,
    /// Runs with a suspected verdict
    pub suspected: usize,
    /// Runs with an unverifiable verdict
    pub unverifiable: usize,
}

/// Bounded, append-ordered run history
#[derive(Debug, Clone)]
pub struct Session {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Session {
    /// Empty session holding at most `capacity` runs (at least one)
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Append a run, dropping the oldest when full
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Record a server response received now
    ///
    /// A response that cannot be understood is not recorded.
    pub fn record(&mut self, response: &VerifyResponse) -> Result<&HistoryEntry> {
        self.push(HistoryEntry::from_response(response, Utc::now())?);
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Number of runs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no run has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every run
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Runs, newest first
    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    /// Confidence of each run, oldest first
    pub fn trend(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.confidence).collect()
    }

    /// Aggregates over all runs
    pub fn stats(&self) -> SessionStats {
        let runs = self.entries.len();
        if runs == 0 {
            return SessionStats::default();
        }

        let count = |verdict: Verdict| self.entries.iter().filter(|e| e.verdict == verdict).count();
        SessionStats {
            runs,
            average_confidence: self.entries.iter().map(|e| e.confidence).sum::<f64>() / runs as f64,
            average_coverage: self.entries.iter().map(|e| e.coverage).sum::<f64>() / runs as f64,
            verified: count(Verdict::Verified),
            suspected: count(Verdict::Suspected),
            unverifiable: count(Verdict::Unverifiable),
        }
    }

    /// History as CSV, oldest first, with a header row
    pub fn to_csv(&self) -> String {
        let mut out = String::from(CSV_HEADER);
        out.push('\n');
        for entry in &self.entries {
            out.push_str(&entry.csv_row());
            out.push('\n');
        }
        out
    }

    /// Write the history as CSV; returns the number of rows written
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        fs::write(path, self.to_csv())?;
        Ok(self.entries.len())
    }
}

fn serialize_verdict<S: Serializer>(verdict: &Verdict, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(verdict.as_str())
}

/// Quote a field when it contains a delimiter, quote or line break
fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(id: &str, verdict: Verdict, confidence: f64, coverage: f64) -> HistoryEntry {
        HistoryEntry {
            id: id.to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap(),
            question: "Who founded SpaceX?".to_string(),
            answer: "Elon Musk".to_string(),
            verdict,
            confidence,
            coverage,
            rationale: "Matched key terms: musk, spacex.".to_string(),
        }
    }

    #[test]
    fn test_newest_first() {
        let mut session = Session::new(10);
        session.push(entry("a", Verdict::Verified, 0.9, 1.0));
        session.push(entry("b", Verdict::Suspected, 0.5, 0.5));

        let ids: Vec<&str> = session.newest_first().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(session.trend(), vec![0.9, 0.5]);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut session = Session::new(2);
        session.push(entry("a", Verdict::Verified, 0.9, 1.0));
        session.push(entry("b", Verdict::Verified, 0.8, 1.0));
        session.push(entry("c", Verdict::Verified, 0.7, 1.0));

        assert_eq!(session.len(), 2);
        let ids: Vec<&str> = session.newest_first().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);
    }

    #[test]
    fn test_stats() {
        let mut session = Session::new(10);
        assert_eq!(session.stats(), SessionStats::default());

        session.push(entry("a", Verdict::Verified, 0.9, 1.0));
        session.push(entry("b", Verdict::Unverifiable, 0.1, 0.0));
        session.push(entry("c", Verdict::Suspected, 0.5, 0.5));

        let stats = session.stats();
        assert_eq!(stats.runs, 3);
        assert!((stats.average_confidence - 0.5).abs() < 1e-9);
        assert!((stats.average_coverage - 0.5).abs() < 1e-9);
        assert_eq!((stats.verified, stats.suspected, stats.unverifiable), (1, 1, 1));
    }

    #[test]
    fn test_clear() {
        let mut session = Session::new(10);
        session.push(entry("a", Verdict::Verified, 0.9, 1.0));
        session.clear();
        assert!(session.is_empty());
    }

    #[test]
    fn test_unknown_verdict_is_not_recorded() {
        let response: VerifyResponse = serde_json::from_value(serde_json::json!({
            "id": "0190a0b0-0000-7000-8000-000000000000",
            "question": "Who founded SpaceX?",
            "answer": "Elon Musk",
            "verdict": "probably",
            "verdict_label": "Probably",
            "confidence": 0.5,
            "similarity": 0.5,
            "coverage": 0.5,
            "rationale": "Partial support.",
            "matched_keywords": [],
            "missing_keywords": [],
            "evidence": {"source": "none", "text": ""}
        }))
        .unwrap();

        let mut session = Session::new(10);
        let err = session.record(&response).unwrap_err();
        assert!(matches!(err, CliError::UnexpectedResponse(ref msg) if msg.contains("probably")));
        assert!(session.is_empty());
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a, b"), "\"a, b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_csv_export() {
        let mut session = Session::new(10);
        session.push(entry("a", Verdict::Verified, 0.9, 1.0));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        assert_eq!(session.export_csv(&path).unwrap(), 1);

        let csv = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            "a,2026-10-16T12:00:00+00:00,Who founded SpaceX?,Elon Musk,verified,0.9000,1.0000,\"Matched key terms: musk, spacex.\""
        );
    }
}
