//! HTTP client for the catalog search endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::candidate::{parse_release_date, sort_by_release_desc, MovieCandidate};
use crate::config::CatalogConfig;
use crate::error::CatalogError;

/// Something that can search movies by title.
///
/// Abstracted so the conversation handler can be tested without the network.
#[async_trait]
pub trait MovieSearch: Send + Sync {
    /// Search by title, optionally restricted to a release year.
    ///
    /// Results are sorted newest release first, unknown dates last.
    async fn search(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> Result<Vec<MovieCandidate>, CatalogError>;
}

/// Raw search response body.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

/// A single raw search result. `null` and missing strings read as empty.
#[derive(Debug, Deserialize)]
struct SearchResult {
    id: i64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
}

/// Parse a search response body into sorted candidates.
///
/// One malformed non-empty date fails the whole batch.
pub fn parse_search_response(body: &str) -> Result<Vec<MovieCandidate>, CatalogError> {
    let response: SearchResponse = serde_json::from_str(body)?;

    let mut candidates = response
        .results
        .into_iter()
        .map(|result| {
            Ok(MovieCandidate {
                release_date: parse_release_date(result.release_date.as_deref().unwrap_or(""))?,
                id: result.id,
                title: result.title.unwrap_or_default(),
            })
        })
        .collect::<Result<Vec<_>, CatalogError>>()?;

    sort_by_release_desc(&mut candidates);
    Ok(candidates)
}

/// TMDb-backed movie search.
#[derive(Clone)]
pub struct MovieCatalog {
    http: Client,
    config: CatalogConfig,
}

impl MovieCatalog {
    /// Create a new catalog client.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        if config.api_key.trim().is_empty() {
            return Err(CatalogError::Configuration("API key is empty".to_string()));
        }

        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}

#[async_trait]
impl MovieSearch for MovieCatalog {
    async fn search(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> Result<Vec<MovieCandidate>, CatalogError> {
        let year = year.map(|y| y.to_string()).unwrap_or_default();
        debug!("Searching catalog for '{}' (year: '{}')", title, year);

        let response = self
            .http
            .get(self.config.search_url())
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("query", title),
                ("year", year.as_str()),
            ])
            .send()
            .await
            .map_err(strip_url)?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Catalog search returned status {}", status);
            return Err(CatalogError::BadResponseStatus(status));
        }

        let body = response.text().await.map_err(strip_url)?;
        let candidates = parse_search_response(&body)?;
        debug!("Catalog returned {} results for '{}'", candidates.len(), title);

        Ok(candidates)
    }
}

// The request URL carries the API key.
fn strip_url(err: reqwest::Error) -> CatalogError {
    CatalogError::Transport(err.without_url())
}

impl std::fmt::Debug for MovieCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieCatalog")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_search_response_sorts_and_keeps_unknown() {
        let body = r#"{
            "page": 1,
            "results": [
                {"id": 1, "title": "Julia", "release_date": "2008-03-12"},
                {"id": 2, "title": "Julia", "release_date": ""},
                {"id": 3, "title": "Julia", "release_date": "2014-09-04"}
            ]
        }"#;
        let candidates = parse_search_response(body).unwrap();

        let ids: Vec<i64> = candidates.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(candidates[0].release_date, NaiveDate::from_ymd_opt(2014, 9, 4));
        assert_eq!(candidates[2].release_date, None);
    }

    #[test]
    fn test_parse_search_response_missing_release_date_field() {
        let body = r#"{"results": [{"id": 7, "title": "Untitled"}]}"#;
        let candidates = parse_search_response(body).unwrap();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].release_date.is_none());
    }

    #[test]
    fn test_parse_search_response_null_fields() {
        let body = r#"{"results": [
            {"id": 1, "title": "Announced", "release_date": "2019-01-01"},
            {"id": 2, "title": "Unannounced", "release_date": null},
            {"id": 3, "title": null, "release_date": "2018-06-01"}
        ]}"#;
        let candidates = parse_search_response(body).unwrap();

        let ids: Vec<i64> = candidates.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
        assert_eq!(candidates[1].title, "");
        assert_eq!(candidates[2].title, "Unannounced");
        assert!(candidates[2].release_date.is_none());
    }

    #[test]
    fn test_parse_search_response_bad_date_fails_batch() {
        let body = r#"{"results": [
            {"id": 1, "title": "Good", "release_date": "2019-01-01"},
            {"id": 2, "title": "Bad", "release_date": "2019-13-45"}
        ]}"#;
        let err = parse_search_response(body).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidReleaseDate { .. }));
    }

    #[test]
    fn test_parse_search_response_malformed_json() {
        let err = parse_search_response("<html>oops</html>").unwrap_err();
        assert!(matches!(err, CatalogError::MalformedResponse(_)));

        let err = parse_search_response(r#"{"page": 1}"#).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedResponse(_)));
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let result = MovieCatalog::new(CatalogConfig::new(""));
        assert!(matches!(result, Err(CatalogError::Configuration(_))));
    }

    #[test]
    fn test_debug_redacts_key() {
        let catalog = MovieCatalog::new(CatalogConfig::new("super-secret")).unwrap();
        assert!(!format!("{:?}", catalog).contains("super-secret"));
    }
}
