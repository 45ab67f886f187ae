//! Provider implementations for catalog lookups.

use async_trait::async_trait;

use crate::errors::CatalogError;
use crate::types::{MovieDetail, ResultPage};

pub mod mock;
pub mod omdb;

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockCatalog;
pub use omdb::OmdbClient;

/// Trait for movie metadata catalogs.
///
/// Implementations perform one remote lookup per call. They never retry and
/// never cache; calling twice with the same arguments issues two lookups.
#[async_trait]
pub trait MovieCatalog: Send + Sync + std::fmt::Debug {
    /// Search titles matching `query`, returning the requested 1-based page.
    ///
    /// A blank query yields an empty page with zero total and makes no
    /// remote call.
    ///
    /// # Errors
    /// - `CatalogError::Transport` - Request could not be completed
    /// - `CatalogError::Api` - API reported a logical failure (no matches)
    async fn search_by_title(&self, query: &str, page: u32) -> Result<ResultPage, CatalogError>;

    /// Fetch full metadata for one title by IMDb identifier.
    ///
    /// # Errors
    /// - `CatalogError::Transport` - Request could not be completed
    /// - `CatalogError::Api` - API reported a logical failure (unknown id)
    async fn fetch_detail(&self, imdb_id: &str) -> Result<MovieDetail, CatalogError>;
}
