//! Movie catalog search for the release bot.
//!
//! This crate wraps the TMDb `search/movie` endpoint and normalizes its
//! results into [`MovieCandidate`]s:
//!
//! - [`MovieSearch`] - The trait the conversation handler searches through
//! - [`MovieCatalog`] - The HTTP implementation
//! - [`CatalogError`] - Transport, status and parsing failures
//!
//! # Example
//!
//! ```no_run
//! use movie_catalog::{CatalogConfig, MovieCatalog, MovieSearch};
//!
//! # async fn example() -> Result<(), movie_catalog::CatalogError> {
//! let catalog = MovieCatalog::new(CatalogConfig::new("api-key"))?;
//! for movie in catalog.search("climax", Some(2018)).await? {
//!     println!("{} ({:?})", movie.title, movie.release_date);
//! }
//! # Ok(())
//! # }
//! ```

mod candidate;
mod client;
mod config;
mod error;

pub use candidate::{filter_exact, parse_release_date, sort_by_release_desc, MovieCandidate};
pub use client::{parse_search_response, MovieCatalog, MovieSearch};
pub use config::CatalogConfig;
pub use error::CatalogError;

// Re-export async_trait for implementors of MovieSearch
pub use async_trait::async_trait;
