//! Verity Encyclopedia Lookup Layer
//!
//! External evidence sources consulted when the trusted corpus has no
//! relevant record.
//!
//! # Providers
//!
//! - `MockLookup`: Scripted responses for testing, no network calls
//! - `WikipediaClient`: MediaWiki search followed by the REST page summary
//!
//! # Examples
//!
//! ```
//! use verity_lookup::{EncyclopediaLookup, LookupPage, MockLookup};
//!
//! let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
//! let lookup = MockLookup::new();
//! lookup.add_response(
//!     "Who founded SpaceX?",
//!     LookupPage::new("SpaceX", "SpaceX was founded in 2002 by Elon Musk.", "https://en.wikipedia.org/wiki/SpaceX"),
//! );
//!
//! let page = rt.block_on(lookup.lookup("Who founded SpaceX?")).unwrap();
//! assert_eq!(page.title, "SpaceX");
//! assert_eq!(lookup.call_count(), 1);
//! ```

#![warn(missing_docs)]

pub mod wikipedia;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use verity_domain::Evidence;

pub use wikipedia::WikipediaClient;

/// Errors that can occur during an external lookup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// No page matches the query
    #[error("No page found for '{0}'")]
    NotFound(String),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The request did not complete in time
    #[error("Lookup timed out")]
    Timeout,

    /// The configured endpoint is not a usable base URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// A page summary returned by an encyclopedia
#[derive(Debug, Clone, PartialEq)]
pub struct LookupPage {
    /// Page title
    pub title: String,
    /// Plain-text summary of the page
    pub extract: String,
    /// Canonical page URL
    pub url: String,
}

impl LookupPage {
    /// Create a page
    pub fn new(title: impl Into<String>, extract: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            extract: extract.into(),
            url: url.into(),
        }
    }

    /// Convert into external evidence
    pub fn into_evidence(self) -> Evidence {
        Evidence::from_external(self.title, self.extract, self.url)
    }
}

/// An external source of encyclopedic text
#[async_trait]
pub trait EncyclopediaLookup: Send + Sync {
    /// Find the page that best answers the query
    async fn lookup(&self, query: &str) -> Result<LookupPage, LookupError>;

    /// Short provider name for logs
    fn name(&self) -> &str;
}

#[derive(Debug, Clone)]
enum MockResponse {
    Page(LookupPage),
    Failure(LookupError),
}

/// Mock lookup provider for deterministic testing
///
/// Queries are matched exactly. Unknown queries return
/// [`LookupError::NotFound`]. Clones share responses and the call count.
#[derive(Debug, Clone, Default)]
pub struct MockLookup {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    call_count: Arc<Mutex<usize>>,
    delay: Option<Duration>,
}

impl MockLookup {
    /// Create an empty mock
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every lookup, for exercising timeouts
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Return `page` for `query`
    pub fn add_response(&self, query: impl Into<String>, page: LookupPage) {
        lock(&self.responses).insert(query.into(), MockResponse::Page(page));
    }

    /// Fail lookups of `query` with `error`
    pub fn add_failure(&self, query: impl Into<String>, error: LookupError) {
        lock(&self.responses).insert(query.into(), MockResponse::Failure(error));
    }

    /// Number of times lookup was called
    pub fn call_count(&self) -> usize {
        *lock(&self.call_count)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *lock(&self.call_count) = 0;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl EncyclopediaLookup for MockLookup {
    async fn lookup(&self, query: &str) -> Result<LookupPage, LookupError> {
        *lock(&self.call_count) += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let response = lock(&self.responses).get(query).cloned();
        match response {
            Some(MockResponse::Page(page)) => Ok(page),
            Some(MockResponse::Failure(error)) => Err(error),
            None => Err(LookupError::NotFound(query.to_string())),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
