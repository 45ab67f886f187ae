//! Marquee Catalog - OMDb search and detail lookups

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Performs the two remote lookups Marquee needs (paged search by title and
//! full detail by IMDb identifier) and folds OMDb's in-band error signaling
//! into a uniform [`CatalogError`].

pub mod errors;
pub mod metadata;
pub mod providers;
pub mod types;

// Re-export main types
pub use errors::CatalogError;
pub use metadata::ApiOutcome;
#[cfg(any(test, feature = "test-utils"))]
pub use providers::MockCatalog;
pub use providers::{MovieCatalog, OmdbClient};
pub use types::{
    DetailRecord, MediaType, MovieDetail, MovieSummary, PAGE_SIZE, Query, Rating, ResultPage,
    clamp_page, is_blank, total_pages,
};

/// Convenience type alias for Results with CatalogError.
pub type Result<T> = std::result::Result<T, CatalogError>;
