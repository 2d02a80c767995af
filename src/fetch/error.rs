//! Error types for fetching and pagination

use thiserror::Error;

/// Errors that can occur while fetching pages of records
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level HTTP failure
    #[error("HTTP request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    /// Non-success status code
    #[error("HTTP error {status} when fetching {url}")]
    Status { url: String, status: u16 },

    /// Response body was not valid JSON
    #[error("Invalid JSON from {url}: {reason}")]
    Json { url: String, reason: String },

    /// The list accessor key is missing or not an array
    #[error("Key '{key}' does not hold a record array in the response from {url}")]
    MissingListField { key: String, url: String },

    /// The link field held something other than a string or null
    #[error("Link field '{key}' held a non-string value in the response from {url}")]
    BadLinkField { key: String, url: String },

    /// A list entry was not a JSON object
    #[error("Non-object entry at index {index} in the record list from {url}")]
    NonObjectRecord { url: String, index: usize },

    /// Year-scoped mode requires a year token in the URL
    #[error("No 4-digit year (1900-2099) found in URL: {0}")]
    NoYearToken(String),

    /// Malformed year range string
    #[error("Invalid year range '{0}': expected YYYY or YYYY-YYYY")]
    InvalidYearRange(String),
}
