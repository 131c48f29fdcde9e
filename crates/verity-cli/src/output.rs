//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::session::Session;
use colored::*;
use std::collections::HashSet;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use verity_domain::Verdict;
use verity_server::api::{CounterEvidenceDto, HealthResponse, VerifyResponse};
use verity_store::text::stem;

/// Width of score and trend bars, in cells
const BAR_WIDTH: usize = 20;

/// Characters of a question or answer shown in the history table
const HISTORY_TEXT_CHARS: usize = 40;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a verification result.
    pub fn format_verification(&self, response: &VerifyResponse) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(response)?),
            OutputFormat::Quiet => Ok(response.verdict.clone()),
            OutputFormat::Table => Ok(self.format_verification_table(response)),
        }
    }

    fn format_verification_table(&self, response: &VerifyResponse) -> String {
        let mut out = Vec::new();

        out.push(format!(
            "{}  confidence {}",
            self.verdict_badge(&response.verdict),
            percent(response.confidence)
        ));
        out.push(String::new());

        let mut builder = Builder::default();
        builder.push_record(["Score", "Value", ""]);
        for (name, value) in [
            ("Confidence", response.confidence),
            ("Similarity", response.similarity),
            ("Coverage", response.coverage),
        ] {
            builder.push_record([name.to_string(), percent(value), bar(value, BAR_WIDTH)]);
        }
        out.push(self.table(builder));
        out.push(String::new());

        out.push(response.rationale.clone());
        out.push(String::new());

        let evidence = &response.evidence;
        if evidence.text.is_empty() {
            out.push(self.warning("No evidence retrieved"));
        } else {
            let origin = match &evidence.reference {
                Some(reference) => format!("{}, {}", evidence.source, reference),
                None => evidence.source.clone(),
            };
            out.push(format!("Evidence ({}):", origin));
            if let Some(context) = &evidence.context {
                out.push(format!("  {}", self.colorize(context, "cyan")));
            }
            out.push(format!(
                "  {}",
                self.highlight_keywords(&evidence.text, &response.matched_keywords)
            ));
        }

        if !response.missing_keywords.is_empty() {
            out.push(format!("Missing key terms: {}", response.missing_keywords.join(", ")));
        }

        if let Some(counter) = &response.counter_evidence {
            out.push(String::new());
            out.push(self.format_counter(counter));
        }

        out.join("\n")
    }

    fn format_counter(&self, counter: &CounterEvidenceDto) -> String {
        let mut out = Vec::new();

        match counter.status.as_str() {
            "found" => {
                let kind = counter.kind.as_deref().unwrap_or("contradiction");
                out.push(self.colorize(&format!("Counter-evidence found ({})", kind), "red"));
                if let Some(text) = &counter.text {
                    let source = counter.record_id.as_deref().unwrap_or("corpus");
                    out.push(format!("  {} [{}]", text, source));
                }
            }
            "failed" => {
                let error = counter.error.as_deref().unwrap_or("unknown error");
                out.push(self.warning(&format!("Counter-evidence search failed: {}", error)));
            }
            _ => out.push(self.success("No counter-evidence found")),
        }

        if !counter.analysis.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Claim", "Status", "Support", "Contradiction", "Counter passage"]);
            for claim in &counter.analysis {
                builder.push_record([
                    truncate(&claim.claim, HISTORY_TEXT_CHARS),
                    claim.status.replace('_', " "),
                    format!("{:.2}", claim.support_score),
                    format!("{:.2}", claim.contradiction_score),
                    claim
                        .counter_passage
                        .as_deref()
                        .map(|p| truncate(p, HISTORY_TEXT_CHARS))
                        .unwrap_or_else(|| "-".to_string()),
                ]);
            }
            out.push(self.table(builder));
        }

        out.join("\n")
    }

    /// Format server health.
    pub fn format_health(&self, health: &HealthResponse) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(health)?),
            OutputFormat::Quiet => Ok(health.status.clone()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Status", "Records", "Model", "Model ready", "External lookup"]);
                builder.push_record([
                    health.status.clone(),
                    health.corpus_record_count.to_string(),
                    health.model.clone(),
                    yes_no(health.scoring_model_ready).to_string(),
                    yes_no(health.external_lookup).to_string(),
                ]);
                Ok(self.table(builder))
            }
        }
    }

    /// Format the session history, newest first.
    pub fn format_history(&self, session: &Session) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let entries: Vec<_> = session.newest_first().collect();
                Ok(serde_json::to_string_pretty(&entries)?)
            }
            OutputFormat::Quiet => Ok(session
                .newest_first()
                .map(|e| e.id.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if session.is_empty() {
                    return Ok(self.colorize("No verifications yet.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Time", "Question", "Answer", "Verdict", "Confidence", "Coverage"]);
                for entry in session.newest_first() {
                    builder.push_record([
                        entry.timestamp.format("%H:%M:%S").to_string(),
                        truncate(&entry.question, HISTORY_TEXT_CHARS),
                        truncate(&entry.answer, HISTORY_TEXT_CHARS),
                        entry.verdict.label().to_string(),
                        percent(entry.confidence),
                        percent(entry.coverage),
                    ]);
                }
                Ok(self.table(builder))
            }
        }
    }

    /// Format session statistics and the confidence trend.
    pub fn format_stats(&self, session: &Session) -> Result<String> {
        let stats = session.stats();
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "runs": stats.runs,
                "average_confidence": stats.average_confidence,
                "average_coverage": stats.average_coverage,
                "verified": stats.verified,
                "suspected": stats.suspected,
                "unverifiable": stats.unverifiable,
                "trend": session.trend(),
            }))?),
            OutputFormat::Quiet => Ok(format!(
                "{} {:.2} {:.2}",
                stats.runs, stats.average_confidence, stats.average_coverage
            )),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Runs", "Avg confidence", "Avg coverage", "Verified", "Suspected", "Unverifiable"]);
                builder.push_record([
                    stats.runs.to_string(),
                    percent(stats.average_confidence),
                    percent(stats.average_coverage),
                    stats.verified.to_string(),
                    stats.suspected.to_string(),
                    stats.unverifiable.to_string(),
                ]);

                let mut out = vec![self.table(builder)];
                if !session.is_empty() {
                    out.push(String::new());
                    out.push("Confidence trend (oldest first):".to_string());
                    out.push(self.trend_chart(&session.trend()));
                }
                Ok(out.join("\n"))
            }
        }
    }

    /// One bar per run, oldest first.
    pub fn trend_chart(&self, values: &[f64]) -> String {
        values
            .iter()
            .enumerate()
            .map(|(i, value)| format!("{:>3} {} {}", i + 1, bar(*value, BAR_WIDTH), percent(*value)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Coloured verdict badge.
    pub fn verdict_badge(&self, verdict: &str) -> String {
        let (label, color) = match Verdict::parse(verdict) {
            Some(Verdict::Verified) => (Verdict::Verified.label(), "green"),
            Some(Verdict::Suspected) => (Verdict::Suspected.label(), "yellow"),
            Some(Verdict::Unverifiable) => (Verdict::Unverifiable.label(), "red"),
            None => (verdict, "magenta"),
        };
        let badge = format!("[ {} ]", label.to_uppercase());
        if self.color_enabled {
            badge.as_str().color(color).bold().to_string()
        } else {
            badge
        }
    }

    /// Mark the words of `text` whose stem is a matched keyword.
    ///
    /// Highlighted words are bold green, or wrapped in `*` without colour.
    pub fn highlight_keywords(&self, text: &str, matched: &[String]) -> String {
        let matched: HashSet<&str> = matched.iter().map(String::as_str).collect();
        text.split(' ')
            .map(|token| {
                let word = token.trim_matches(|c: char| !c.is_alphanumeric());
                if word.is_empty() || !matched.contains(stem(word).as_str()) {
                    return token.to_string();
                }
                let marked = if self.color_enabled {
                    word.green().bold().to_string()
                } else {
                    format!("*{}*", word)
                };
                token.replacen(word, &marked, 1)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn percent(value: f64) -> String {
    format!("{:.0}%", value * 100.0)
}

fn bar(value: f64, width: usize) -> String {
    let filled = (value.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
