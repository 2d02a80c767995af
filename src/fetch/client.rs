//! HTTP page retrieval

use std::time::Duration;

use tracing::debug;

use super::error::FetchError;

/// A source of JSON pages addressed by URL.
///
/// Pagination logic only needs "GET this URL and parse the body"; keeping
/// that behind a trait lets tests drive the page walk from canned bodies.
pub trait PageSource {
    /// Fetch one page and parse its body as JSON
    fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError>;
}

/// Blocking HTTP page source backed by reqwest
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Http {
                url: String::new(),
                reason: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

impl PageSource for HttpFetcher {
    fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        debug!(url, "fetching page");

        let response = self.client.get(url).send().map_err(|e| FetchError::Http {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json().map_err(|e| FetchError::Json {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
