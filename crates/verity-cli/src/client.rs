//! HTTP client for the verification server.

use crate::error::{CliError, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use verity_server::api::{ErrorResponse, HealthResponse, RootResponse, VerifyRequestBody, VerifyResponse};

/// Request timeout; counter-evidence and an external lookup fit comfortably
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for one verification server
#[derive(Debug, Clone)]
pub struct VerityClient {
    base_url: String,
    http: reqwest::Client,
}

impl VerityClient {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:8000`)
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(CliError::Config(format!(
                "Server URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base_url: base_url.to_string(),
            http,
        })
    }

    /// Server base URL, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Service name, corpus size and routes
    pub async fn root(&self) -> Result<RootResponse> {
        self.get("/").await
    }

    /// Server health
    pub async fn health(&self) -> Result<HealthResponse> {
        self.get("/health").await
    }

    /// Verify one question/answer pair
    pub async fn verify(&self, body: &VerifyRequestBody) -> Result<VerifyResponse> {
        debug!(question = %body.question, "Sending verification request");
        let response = self
            .http
            .post(self.url("/verify"))
            .json(body)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;
        decode(response).await
    }

    /// Run the built-in demonstration check
    pub async fn demo(&self) -> Result<VerifyResponse> {
        self.get("/demo").await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;
        decode(response).await
    }

    fn connection_error(&self, err: reqwest::Error) -> CliError {
        if err.is_connect() || err.is_timeout() {
            CliError::Connection(format!("{} ({})", self.base_url, err))
        } else {
            CliError::Http(err)
        }
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|e| e.error)
            .unwrap_or(text);
        return Err(CliError::Server {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}
