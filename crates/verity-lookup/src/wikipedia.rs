//! Wikipedia Lookup Implementation
//!
//! Resolves a free-text question to a page in two steps: a MediaWiki full
//! text search picks the best title, then the REST summary endpoint returns
//! the page extract.
//!
//! # Features
//!
//! - Async HTTP communication via `reqwest`
//! - Configurable endpoint (any MediaWiki installation)
//! - Retry logic with exponential backoff
//! - Per-request timeout
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//! use verity_lookup::WikipediaClient;
//!
//! let client = WikipediaClient::new("https://en.wikipedia.org", Duration::from_secs(5)).unwrap();
//! ```

use crate::{EncyclopediaLookup, LookupError, LookupPage};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Default encyclopedia endpoint
pub const DEFAULT_ENDPOINT: &str = "https://en.wikipedia.org";

/// Default timeout for a single HTTP request (5 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Default number of attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Base delay for exponential backoff between attempts
const BACKOFF_BASE_MS: u64 = 250;

/// Wikipedia client for external evidence
pub struct WikipediaClient {
    endpoint: Url,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: SearchQuery,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    title: String,
    #[serde(default)]
    extract: String,
    #[serde(default)]
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: PageUrl,
}

#[derive(Debug, Deserialize)]
struct PageUrl {
    page: String,
}

impl WikipediaClient {
    /// Create a client for the given endpoint
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidEndpoint`] if the endpoint is not an
    /// absolute base URL.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, LookupError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| LookupError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
        if endpoint.cannot_be_a_base() {
            return Err(LookupError::InvalidEndpoint(endpoint.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("verity/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LookupError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a client for English Wikipedia with the default timeout
    pub fn default_endpoint() -> Result<Self, LookupError> {
        Self::new(DEFAULT_ENDPOINT, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Set the maximum number of attempts per request (at least one)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    fn endpoint_with_path(&self, segments: &[&str]) -> Result<Url, LookupError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| LookupError::InvalidEndpoint(self.endpoint.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn search_url(&self, query: &str) -> Result<Url, LookupError> {
        let mut url = self.endpoint_with_path(&["w", "api.php"])?;
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("list", "search")
            .append_pair("format", "json")
            .append_pair("srlimit", "1")
            .append_pair("srsearch", query);
        Ok(url)
    }

    fn summary_url(&self, title: &str) -> Result<Url, LookupError> {
        self.endpoint_with_path(&["api", "rest_v1", "page", "summary", title])
    }

    /// GET a JSON document, retrying transient failures with backoff
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, LookupError> {
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.get(url.clone()).send().await {
                Ok(response) if response.status().is_success() => {
                    return response.json::<T>().await.map_err(|e| {
                        LookupError::InvalidResponse(format!("Failed to parse response: {}", e))
                    });
                }
                Ok(response) if response.status() == StatusCode::NOT_FOUND => {
                    return Err(LookupError::NotFound(url.to_string()));
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    last_error = Some(LookupError::Communication(format!("HTTP {}: {}", status, body)));
                }
                Err(e) if e.is_timeout() => {
                    last_error = Some(LookupError::Timeout);
                }
                Err(e) => {
                    last_error = Some(LookupError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                let delay = Duration::from_millis(BACKOFF_BASE_MS * 2u64.pow(attempts - 1));
                debug!(attempts, ?delay, "Retrying encyclopedia request");
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| LookupError::Communication("Max retries exceeded".to_string())))
    }

    /// Best-matching page title for a query, if any
    pub async fn search(&self, query: &str) -> Result<Option<String>, LookupError> {
        let response: SearchResponse = self.get_json(self.search_url(query)?).await?;
        Ok(response.query.search.into_iter().next().map(|hit| hit.title))
    }

    /// Summary of the page with the given title
    pub async fn summary(&self, title: &str) -> Result<LookupPage, LookupError> {
        let response: SummaryResponse = self.get_json(self.summary_url(title)?).await?;
        page_from_summary(response, || self.summary_url(title).map(String::from).unwrap_or_default())
    }
}

fn page_from_summary(
    response: SummaryResponse,
    fallback_url: impl FnOnce() -> String,
) -> Result<LookupPage, LookupError> {
    let extract = response.extract.trim();
    if extract.is_empty() {
        return Err(LookupError::NotFound(response.title));
    }

    let url = response
        .content_urls
        .map(|urls| urls.desktop.page)
        .unwrap_or_else(fallback_url);
    Ok(LookupPage::new(response.title, extract, url))
}

#[async_trait]
impl EncyclopediaLookup for WikipediaClient {
    async fn lookup(&self, query: &str) -> Result<LookupPage, LookupError> {
        let title = match self.search(query).await? {
            Some(title) => title,
            None => return Err(LookupError::NotFound(query.to_string())),
        };

        debug!(query, title = %title, "Resolved encyclopedia page");
        self.summary(&title).await.inspect_err(|e| {
            warn!(title = %title, error = %e, "Failed to fetch page summary");
        })
    }

    fn name(&self) -> &str {
        "wikipedia"
    }
}
