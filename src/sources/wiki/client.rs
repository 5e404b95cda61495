//! Wiki summary HTTP client
//!
//! Fetches page summaries by title. The title goes into the URL as a
//! single encoded path segment, so "Kraków, Poland" becomes
//! `.../Krak%C3%B3w%2C%20Poland`.

use super::dto;
use crate::config::WikiApiConfig;
use crate::error::{Error, Result};
use reqwest::StatusCode;
use std::time::Duration;

/// Upper bound on any single upstream request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Wiki summary client
pub struct WikiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl WikiClient {
    /// Create a new client from config.
    pub fn new(config: &WikiApiConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(Error::config("WIKI_API_BASE_URL is not set"));
        }

        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .gzip(true)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| Error::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
        })
    }

    /// Create a client for testing with a custom base URL
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the summary extract for a page title.
    ///
    /// `Ok(None)` means the page does not exist - an expected outcome for
    /// speculative lookups, distinct from transport failures.
    pub async fn fetch_summary(&self, term: &str) -> Result<Option<String>> {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(term));

        let response = self
            .http_client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::upstream_unavailable(format!("summary request failed: {e}")))?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::rate_limited("summary API throttled the request"));
        }
        if !status.is_success() {
            return Err(Error::upstream(
                status.as_u16(),
                format!(
                    "summary lookup failed: {}",
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            ));
        }

        let body: dto::SummaryResponse = response
            .json()
            .await
            .map_err(|e| Error::upstream(status.as_u16(), format!("unparseable summary response: {e}")))?;

        Ok(body.extract.filter(|extract| !extract.trim().is_empty()))
    }
}
