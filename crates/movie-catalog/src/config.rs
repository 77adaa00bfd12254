//! Configuration for the catalog client.

use std::time::Duration;

/// Default TMDb API base URL.
pub const DEFAULT_API_URL: &str = "https://api.themoviedb.org/3";

/// Configuration for [`crate::MovieCatalog`].
#[derive(Clone)]
pub struct CatalogConfig {
    /// API base URL, without trailing slash.
    pub api_url: String,

    /// TMDb API key (v3 auth).
    pub api_key: String,

    /// Timeout for a single search request.
    pub timeout: Duration,
}

impl CatalogConfig {
    /// Create a configuration for the public TMDb API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(15),
        }
    }

    /// Point the client at a different base URL (used by tests and proxies).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// URL of the movie search endpoint.
    pub fn search_url(&self) -> String {
        format!("{}/search/movie", self.api_url)
    }
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
