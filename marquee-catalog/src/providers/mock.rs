//! Mock catalog implementation for testing.

#![cfg(any(test, feature = "test-utils"))]

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::MovieCatalog;
use crate::errors::CatalogError;
use crate::types::{MediaType, MovieDetail, MovieSummary, ResultPage, is_blank};

/// Message returned for queries and ids nobody registered, as OMDb words it.
const NOT_FOUND: &str = "Movie not found!";

/// Scripted reply with an optional artificial latency.
#[derive(Debug, Clone)]
struct Reply<T> {
    result: Result<T, CatalogError>,
    delay: Duration,
}

/// In-memory catalog with scripted replies and call recording.
///
/// Searches are keyed by trimmed query text; the page argument is recorded
/// but does not select a different reply. Blank queries behave like the real
/// provider: they return an empty page and are not recorded as calls.
#[derive(Debug, Default)]
pub struct MockCatalog {
    searches: Mutex<HashMap<String, Reply<ResultPage>>>,
    details: Mutex<HashMap<String, Reply<MovieDetail>>>,
    search_calls: Mutex<Vec<(String, u32)>>,
    detail_calls: Mutex<Vec<String>>,
}

impl MockCatalog {
    /// Creates an empty mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a successful search reply.
    pub fn with_page(self, query: &str, page: ResultPage) -> Self {
        self.with_search_reply(query, Ok(page), Duration::ZERO)
    }

    /// Registers a successful search reply that arrives after `delay`.
    pub fn with_delayed_page(self, query: &str, page: ResultPage, delay: Duration) -> Self {
        self.with_search_reply(query, Ok(page), delay)
    }

    /// Registers a failing search reply.
    pub fn with_search_error(self, query: &str, error: CatalogError) -> Self {
        self.with_search_reply(query, Err(error), Duration::ZERO)
    }

    /// Registers a successful detail reply.
    pub fn with_detail(self, detail: MovieDetail) -> Self {
        let imdb_id = detail.imdb_id.clone();
        self.with_detail_reply(&imdb_id, Ok(detail), Duration::ZERO)
    }

    /// Registers a successful detail reply that arrives after `delay`.
    pub fn with_delayed_detail(self, detail: MovieDetail, delay: Duration) -> Self {
        let imdb_id = detail.imdb_id.clone();
        self.with_detail_reply(&imdb_id, Ok(detail), delay)
    }

    /// Registers a failing detail reply.
    pub fn with_detail_error(self, imdb_id: &str, error: CatalogError) -> Self {
        self.with_detail_reply(imdb_id, Err(error), Duration::ZERO)
    }

    fn with_search_reply(
        self,
        query: &str,
        result: Result<ResultPage, CatalogError>,
        delay: Duration,
    ) -> Self {
        self.searches
            .lock()
            .insert(query.trim().to_string(), Reply { result, delay });
        self
    }

    fn with_detail_reply(
        self,
        imdb_id: &str,
        result: Result<MovieDetail, CatalogError>,
        delay: Duration,
    ) -> Self {
        self.details
            .lock()
            .insert(imdb_id.to_string(), Reply { result, delay });
        self
    }

    /// Searches issued so far as `(query, page)`, in call order.
    pub fn search_calls(&self) -> Vec<(String, u32)> {
        self.search_calls.lock().clone()
    }

    /// Detail lookups issued so far, in call order.
    pub fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().clone()
    }

    /// Builds a page of `count` numbered movies with the given total.
    pub fn sample_page(prefix: &str, count: usize, total: u64) -> ResultPage {
        let items = (0..count)
            .map(|n| MovieSummary {
                imdb_id: format!("tt{prefix}{n:04}"),
                title: format!("{prefix} {n}"),
                year: Some("2012".to_string()),
                media_type: MediaType::Movie,
                poster: None,
            })
            .collect();

        ResultPage { items, total }
    }

    /// Builds a detail record with a title and plot.
    pub fn sample_detail(imdb_id: &str, title: &str) -> MovieDetail {
        MovieDetail {
            imdb_id: imdb_id.to_string(),
            title: title.to_string(),
            plot: Some(format!("{title} plot")),
            media_type: Some(MediaType::Movie),
            ..MovieDetail::default()
        }
    }
}

#[async_trait]
impl MovieCatalog for MockCatalog {
    async fn search_by_title(&self, query: &str, page: u32) -> Result<ResultPage, CatalogError> {
        if is_blank(query) {
            return Ok(ResultPage::empty());
        }

        let query = query.trim().to_string();
        self.search_calls.lock().push((query.clone(), page));

        let reply = self.searches.lock().get(&query).cloned();
        match reply {
            Some(reply) => {
                if !reply.delay.is_zero() {
                    tokio::time::sleep(reply.delay).await;
                }
                reply.result
            }
            None => Err(CatalogError::api(NOT_FOUND)),
        }
    }

    async fn fetch_detail(&self, imdb_id: &str) -> Result<MovieDetail, CatalogError> {
        self.detail_calls.lock().push(imdb_id.to_string());

        let reply = self.details.lock().get(imdb_id).cloned();
        match reply {
            Some(reply) => {
                if !reply.delay.is_zero() {
                    tokio::time::sleep(reply.delay).await;
                }
                reply.result
            }
            None => Err(CatalogError::api("Incorrect IMDb ID.")),
        }
    }
}
