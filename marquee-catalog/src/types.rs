//! Data types for catalog lookups.

use serde::{Deserialize, Serialize};

use crate::errors::CatalogError;

/// Number of results OMDb returns per search page.
pub const PAGE_SIZE: u32 = 10;

/// Number of pages needed to show `total` results, never less than one.
pub fn total_pages(total: u64) -> u32 {
    let pages = total.div_ceil(u64::from(PAGE_SIZE)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Clamps a requested page into `[1, total_pages(total)]`.
pub fn clamp_page(requested: u32, total: u64) -> u32 {
    requested.clamp(1, total_pages(total))
}

/// Free-text search query plus the 1-based page being requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Raw text as typed by the user
    pub text: String,
    /// Requested page, always at least 1
    pub page: u32,
}

impl Query {
    /// Creates a query for the first page.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page: 1,
        }
    }

    /// Returns the same text at another page. Page 0 becomes page 1.
    pub fn at_page(&self, page: u32) -> Self {
        Self {
            text: self.text.clone(),
            page: page.max(1),
        }
    }

    /// True when the text is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        is_blank(&self.text)
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::new("")
    }
}

/// True when `text` is empty or only whitespace.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Media type classification reported by OMDb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Feature film
    Movie,
    /// TV series
    Series,
    /// Single episode of a series
    Episode,
    /// Video game
    Game,
    /// Missing or unrecognized type
    Unknown,
}

impl MediaType {
    /// Maps OMDb's `Type` attribute to a media type.
    pub fn from_omdb(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("movie") => Self::Movie,
            Some("series") => Self::Series,
            Some("episode") => Self::Episode,
            Some("game") => Self::Game,
            _ => Self::Unknown,
        }
    }

    /// Lowercase label as OMDb spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
            Self::Game => "game",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a search result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// IMDb identifier used for detail lookups
    pub imdb_id: String,
    /// Display title
    pub title: String,
    /// Release year, or a range like "2008–2013" for series
    pub year: Option<String>,
    /// Type classification
    pub media_type: MediaType,
    /// Poster image URL
    pub poster: Option<String>,
}

/// A single page of search results plus the total hit count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    /// Results on this page, in API order
    pub items: Vec<MovieSummary>,
    /// Total number of hits across all pages
    pub total: u64,
}

impl ResultPage {
    /// Page with no results and zero total.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of pages implied by the total at [`PAGE_SIZE`] results per page.
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total)
    }

    /// True when the page carries no results.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A rating from one source, e.g. "Rotten Tomatoes: 91%".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Rating source name
    pub source: String,
    /// Rating value as the source formats it
    pub value: String,
}

/// Extended metadata for a single title.
///
/// Attributes OMDb reports as "N/A" are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetail {
    /// IMDb identifier
    pub imdb_id: String,
    /// Display title
    pub title: String,
    /// Release year or year range
    pub year: Option<String>,
    /// Content rating (PG-13, R, ...)
    pub rated: Option<String>,
    /// Release date
    pub released: Option<String>,
    /// Runtime, e.g. "143 min"
    pub runtime: Option<String>,
    /// Comma separated genres
    pub genre: Option<String>,
    /// Director names
    pub director: Option<String>,
    /// Writer names
    pub writer: Option<String>,
    /// Main cast
    pub actors: Option<String>,
    /// Full plot summary
    pub plot: Option<String>,
    /// Spoken languages
    pub language: Option<String>,
    /// Production countries
    pub country: Option<String>,
    /// Awards summary
    pub awards: Option<String>,
    /// Poster image URL
    pub poster: Option<String>,
    /// Ratings from individual sources
    pub ratings: Vec<Rating>,
    /// IMDb user rating, e.g. "8.0"
    pub imdb_rating: Option<String>,
    /// Type classification
    pub media_type: Option<MediaType>,
}

/// Detail slot contents: either the loaded metadata or the failure message.
///
/// A failed lookup still produces a record so it can render in the same
/// place a successful one would.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailRecord {
    /// Metadata was fetched successfully
    Loaded(MovieDetail),
    /// Lookup failed; `message` is what the UI shows
    Failed {
        /// Identifier that was requested
        imdb_id: String,
        /// Displayable failure message
        message: String,
    },
}

impl DetailRecord {
    /// Captures the outcome of a detail lookup without propagating the error.
    pub fn from_result(imdb_id: &str, result: Result<MovieDetail, CatalogError>) -> Self {
        match result {
            Ok(detail) => Self::Loaded(detail),
            Err(error) => Self::Failed {
                imdb_id: imdb_id.to_string(),
                message: error.to_string(),
            },
        }
    }

    /// The identifier this record belongs to.
    pub fn imdb_id(&self) -> &str {
        match self {
            Self::Loaded(detail) => &detail.imdb_id,
            Self::Failed { imdb_id, .. } => imdb_id,
        }
    }

    /// The error marker, if the lookup failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Loaded(_) => None,
            Self::Failed { message, .. } => Some(message),
        }
    }

    /// The loaded metadata, if the lookup succeeded.
    pub fn detail(&self) -> Option<&MovieDetail> {
        match self {
            Self::Loaded(detail) => Some(detail),
            Self::Failed { .. } => None,
        }
    }
}
