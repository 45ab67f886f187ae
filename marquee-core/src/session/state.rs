//! Search session state and request sequencing.

use std::sync::atomic::{AtomicU64, Ordering};

use marquee_catalog::{DetailRecord, Query, ResultPage, total_pages};

/// Everything the UI renders, owned by one [`SearchSession`](super::SearchSession).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Displayed query text and target page
    pub query: Query,
    /// Currently displayed result page
    pub results: ResultPage,
    /// Query and page that `results` answers; lags `query` while a search is outstanding
    pub results_query: Query,
    /// A list search is outstanding
    pub list_loading: bool,
    /// Display message of the last failed list search
    pub list_error: Option<String>,
    /// Title whose details are open
    pub selected_id: Option<String>,
    /// Detail slot for `selected_id`
    pub detail: Option<DetailRecord>,
    /// A detail lookup is outstanding
    pub detail_loading: bool,
}

impl SearchState {
    pub fn new(initial_query: impl Into<String>) -> Self {
        Self {
            query: Query::new(initial_query),
            ..Self::default()
        }
    }

    /// Page count for the displayed results, at least 1.
    pub fn total_pages(&self) -> u32 {
        total_pages(self.results.total)
    }

    /// True while the detail view is open (loading, loaded, or failed).
    pub fn detail_open(&self) -> bool {
        self.selected_id.is_some()
    }
}

/// Token identifying one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Monotonic request counter.
///
/// Each issued request takes a fresh token; a completion may only touch
/// state while its token is still the latest one issued.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new token, superseding every earlier one.
    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Supersedes all outstanding tokens without issuing a request.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}
