//! Error types for catalog searches.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while searching the catalog.
///
/// Every variant is terminal for the search that produced it; nothing is retried.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("unexpected status code: {0}")]
    BadResponseStatus(StatusCode),

    /// The body was not the expected JSON document.
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// A non-empty release date was not in `YYYY-MM-DD` form.
    #[error("failed to parse release date {value:?}: {source}")]
    InvalidReleaseDate {
        value: String,
        source: chrono::ParseError,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}
