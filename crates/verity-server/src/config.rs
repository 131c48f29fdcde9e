//! Configuration file parsing for the server.
//!
//! Loads bind settings, corpus and cache locations, the external lookup
//! settings and the engine knobs from a TOML file. Every field has a
//! default, so an empty file is a valid configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use verity_engine::{EngineConfig, ScoringPolicy};
use verity_lookup::wikipedia::{DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};
use verity_store::cache::{DEFAULT_MAX_ENTRIES, DEFAULT_TTL_SECS};

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Fact corpus JSON file
    #[serde(default = "default_corpus_path")]
    pub corpus_path: PathBuf,

    /// Lookup cache SQLite file, or ":memory:"
    #[serde(default = "default_cache_path")]
    pub cache_path: String,

    /// Maximum cached lookups before the oldest are evicted
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    /// Cached lookups older than this are discarded
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// External encyclopedia lookup
    #[serde(default)]
    pub lookup: LookupSettings,

    /// Confidence weights and verdict thresholds
    #[serde(default)]
    pub scoring: ScoringPolicy,

    /// Retrieval and counter-evidence knobs
    #[serde(default)]
    pub retrieval: RetrievalSettings,
}

/// `[lookup]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LookupSettings {
    /// Consult the encyclopedia when the corpus has no match
    pub enabled: bool,
    /// MediaWiki base URL
    pub endpoint: String,
    /// Upper bound on one lookup, in seconds
    pub timeout_secs: u64,
    /// HTTP attempts per request
    pub max_retries: u32,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// `[retrieval]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Minimum relevance for a corpus match
    pub relevance_threshold: f64,
    /// Semantic similarity that lets a phrase match with terms missing
    pub semantic_match_threshold: f64,
    /// Claims analysed per answer
    pub max_claims: usize,
    /// Related records per claim
    pub top_k: usize,
    /// Margin by which contradiction must beat support
    pub contradiction_margin: f64,
    /// Support below this leaves a claim unverifiable
    pub support_floor: f64,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            relevance_threshold: engine.relevance_threshold,
            semantic_match_threshold: engine.semantic_match_threshold,
            max_claims: engine.max_claims,
            top_k: engine.top_k,
            contradiction_margin: engine.contradiction_margin,
            support_floor: engine.support_floor,
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8000
}

fn default_corpus_path() -> PathBuf {
    PathBuf::from("data/corpus.json")
}

fn default_cache_path() -> String {
    "data/lookup_cache.db".to_string()
}

fn default_cache_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

impl ServerConfig {
    /// Load and validate configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration for testing
    ///
    /// Uses the bundled sample corpus, an in-memory cache and no external
    /// lookup.
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            corpus_path: default_corpus_path(),
            cache_path: ":memory:".to_string(),
            cache_max_entries: DEFAULT_MAX_ENTRIES,
            cache_ttl_secs: DEFAULT_TTL_SECS,
            lookup: LookupSettings::default(),
            scoring: ScoringPolicy::default(),
            retrieval: RetrievalSettings::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// Engine settings derived from the `[retrieval]` and `[lookup]` sections
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            relevance_threshold: self.retrieval.relevance_threshold,
            semantic_match_threshold: self.retrieval.semantic_match_threshold,
            max_claims: self.retrieval.max_claims,
            top_k: self.retrieval.top_k,
            contradiction_margin: self.retrieval.contradiction_margin,
            support_floor: self.retrieval.support_floor,
            lookup_timeout: Duration::from_secs(self.lookup.timeout_secs),
        }
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.corpus_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("corpus_path must not be empty".to_string()));
        }
        if self.cache_max_entries == 0 {
            return Err(ConfigError::Invalid("cache_max_entries must be at least 1".to_string()));
        }
        if self.lookup.enabled && self.lookup.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("lookup.endpoint must not be empty".to_string()));
        }

        self.scoring
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.engine_config()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default_test_config();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.bind_port, 8000);
        assert_eq!(config.cache_path, ":memory:");
        assert!(!config.lookup.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bind_addr() {
        let config = ServerConfig::default_test_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.corpus_path, PathBuf::from("data/corpus.json"));
        assert_eq!(config.cache_path, "data/lookup_cache.db");
        assert_eq!(config.cache_max_entries, 1024);
        assert_eq!(config.cache_ttl_secs, 7 * 24 * 3600);
        assert_eq!(config.scoring, ScoringPolicy::default());
        assert_eq!(config.engine_config(), EngineConfig::default());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000
            corpus_path = "/srv/verity/corpus.json"
            cache_path = ":memory:"
            cache_max_entries = 64

            [lookup]
            enabled = true
            endpoint = "https://de.wikipedia.org"
            timeout_secs = 3

            [scoring]
            verified_threshold = 0.8
            suspected_threshold = 0.5

            [retrieval]
            relevance_threshold = 0.6
            max_claims = 5
        "#;

        let config: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.cache_max_entries, 64);
        assert!(config.lookup.enabled);
        assert_eq!(config.lookup.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.scoring.verified_threshold, 0.8);
        assert_eq!(config.scoring.similarity_weight, 0.6);

        let engine = config.engine_config();
        assert_eq!(engine.relevance_threshold, 0.6);
        assert_eq!(engine.max_claims, 5);
        assert_eq!(engine.top_k, 3);
        assert_eq!(engine.lookup_timeout, Duration::from_secs(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let toml = r#"
            [scoring]
            verified_threshold = 0.3
            suspected_threshold = 0.6
        "#;
        let config: ServerConfig = toml::from_str(toml).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_cache_bound_rejected() {
        let config = ServerConfig {
            cache_max_entries: 0,
            ..ServerConfig::default_test_config()
        };
        assert!(config.validate().is_err());
    }
}
