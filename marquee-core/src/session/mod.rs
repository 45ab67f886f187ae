//! Search session orchestration.
//!
//! A [`SearchSession`] owns the query, the displayed results and the detail
//! slot. Keystrokes are debounced into a single search; page changes and
//! detail lookups fire immediately. Every fetch carries a request token and
//! its completion is dropped when a newer request of the same kind has been
//! issued since, so results apply in issuance order regardless of arrival
//! order.

pub mod debounce;
pub mod state;

use std::sync::Arc;

use marquee_catalog::{CatalogError, DetailRecord, MovieCatalog, Query, ResultPage, clamp_page};
use tokio::sync::watch;

pub use debounce::Debouncer;
pub use state::{RequestSequence, RequestToken, SearchState};

use crate::config::SessionConfig;

/// State and sequencing shared with in-flight fetch tasks.
#[derive(Debug)]
struct SessionShared {
    catalog: Arc<dyn MovieCatalog>,
    state: watch::Sender<SearchState>,
    searches: RequestSequence,
    details: RequestSequence,
}

/// Query orchestrator for one search UI.
///
/// All methods must be called from within a Tokio runtime. Fetches run as
/// detached tasks; dropping the session cancels a pending debounced search
/// but lets in-flight fetches finish unobserved.
#[derive(Debug)]
pub struct SearchSession {
    shared: Arc<SessionShared>,
    debouncer: Debouncer,
}

impl SearchSession {
    pub fn new(catalog: Arc<dyn MovieCatalog>, config: &SessionConfig) -> Self {
        let (state, _) = watch::channel(SearchState::new(config.initial_query.clone()));

        Self {
            shared: Arc::new(SessionShared {
                catalog,
                state,
                searches: RequestSequence::new(),
                details: RequestSequence::new(),
            }),
            debouncer: Debouncer::new(config.debounce_delay),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SearchState {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.shared.state.subscribe()
    }

    /// Searches the initial query, page 1, without waiting for a debounce.
    pub fn start(&self) {
        let text = self.shared.state.borrow().query.text.clone();
        SessionShared::issue_search(&self.shared, text, 1);
    }

    /// Keystroke entry point.
    ///
    /// Updates the displayed query and resets the page to 1 right away, then
    /// schedules a search for `text` once typing has paused. A further call
    /// within the delay replaces the scheduled search.
    pub fn on_query_change(&self, text: impl Into<String>) {
        let text = text.into();

        self.shared.state.send_modify(|state| {
            state.query.text = text.clone();
            state.query.page = 1;
        });

        let shared = Arc::clone(&self.shared);
        self.debouncer.schedule(move || {
            SessionShared::issue_search(&shared, text, 1);
        });
    }

    /// Searches the current query at page 1 now, dropping any pending
    /// debounced search.
    pub fn submit(&self) {
        self.debouncer.cancel();

        let text = {
            let mut text = String::new();
            self.shared.state.send_modify(|state| {
                state.query.page = 1;
                text = state.query.text.clone();
            });
            text
        };

        SessionShared::issue_search(&self.shared, text, 1);
    }

    /// Moves to `page`, clamped into `[1, total_pages]`, and searches
    /// immediately. Returns the page actually requested.
    ///
    /// A pending debounced search is dropped; this request already carries
    /// the current query text.
    pub fn on_page_change(&self, page: u32) -> u32 {
        self.debouncer.cancel();

        let mut target = (String::new(), 1);
        self.shared.state.send_modify(|state| {
            let clamped = clamp_page(page, state.results.total);
            state.query.page = clamped;
            target = (state.query.text.clone(), clamped);
        });

        let (text, clamped) = target;
        if clamped != page {
            tracing::debug!(requested = page, clamped, "Clamped page request");
        }

        SessionShared::issue_search(&self.shared, text, clamped);
        clamped
    }

    pub fn next_page(&self) -> u32 {
        let current = self.shared.state.borrow().query.page;
        self.on_page_change(current.saturating_add(1))
    }

    pub fn previous_page(&self) -> u32 {
        let current = self.shared.state.borrow().query.page;
        self.on_page_change(current.saturating_sub(1))
    }

    /// Opens the detail view for `imdb_id` and fetches its metadata.
    ///
    /// Failures are captured into the detail slot as
    /// [`DetailRecord::Failed`]; nothing is propagated to the caller.
    pub fn open_details(&self, imdb_id: impl Into<String>) {
        let imdb_id = imdb_id.into();
        let token = self.shared.details.issue();

        self.shared.state.send_modify(|state| {
            state.selected_id = Some(imdb_id.clone());
            state.detail = None;
            state.detail_loading = true;
        });

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let result = shared.catalog.fetch_detail(&imdb_id).await;
            shared.apply_detail(token, &imdb_id, result);
        });
    }

    /// Closes the detail view; an outstanding lookup is ignored when it lands.
    pub fn close_details(&self) {
        self.shared.details.invalidate();
        self.shared.state.send_modify(|state| {
            state.selected_id = None;
            state.detail = None;
            state.detail_loading = false;
        });
    }

    /// True while a debounced search is waiting to fire.
    pub fn search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

impl SessionShared {
    /// Issues a list search and applies its outcome if still current.
    fn issue_search(shared: &Arc<Self>, text: String, page: u32) {
        let token = shared.searches.issue();

        shared.state.send_modify(|state| {
            state.list_loading = true;
            state.list_error = None;
        });
        tracing::debug!(query = %text, page, ?token, "Issuing search");

        let shared = Arc::clone(shared);
        tokio::spawn(async move {
            let result = shared.catalog.search_by_title(&text, page).await;
            shared.apply_search(token, Query { text, page }, result);
        });
    }

    /// Applies a search outcome. The token is checked under the state lock so
    /// a stale completion can never overwrite a newer one.
    fn apply_search(
        &self,
        token: RequestToken,
        query: Query,
        result: Result<ResultPage, CatalogError>,
    ) {
        self.state.send_if_modified(|state| {
            if !self.searches.is_current(token) {
                tracing::debug!(query = %query.text, ?token, "Discarding stale search response");
                return false;
            }

            state.list_loading = false;
            match result {
                Ok(page) => {
                    state.results = page;
                    state.list_error = None;
                }
                Err(error) => {
                    tracing::warn!(query = %query.text, error = ?error, "Search failed");
                    state.results = ResultPage::empty();
                    state.list_error = Some(error.to_string());
                }
            }
            state.results_query = query;
            true
        });
    }

    fn apply_detail(
        &self,
        token: RequestToken,
        imdb_id: &str,
        result: Result<marquee_catalog::MovieDetail, CatalogError>,
    ) {
        let record = DetailRecord::from_result(imdb_id, result);
        self.state.send_if_modified(|state| {
            if !self.details.is_current(token) {
                tracing::debug!(imdb_id, ?token, "Discarding stale detail response");
                return false;
            }

            if let Some(message) = record.error() {
                tracing::warn!(imdb_id, error = %message, "Detail lookup failed");
            }
            state.detail = Some(record);
            state.detail_loading = false;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use marquee_catalog::{MockCatalog, MovieSummary};

    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    fn session_with(catalog: Arc<MockCatalog>, initial_query: &str) -> SearchSession {
        let config = SessionConfig {
            debounce_delay: DELAY,
            initial_query: initial_query.to_string(),
        };
        SearchSession::new(catalog, &config)
    }

    /// Lets timers fire and spawned fetches finish on the paused clock.
    async fn settle() {
        tokio::time::sleep(Duration::from_secs(10)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_searches_initial_query() {
        let catalog = Arc::new(
            MockCatalog::new().with_page("Avengers", MockCatalog::sample_page("Avengers", 10, 42)),
        );
        let session = session_with(Arc::clone(&catalog), "Avengers");

        session.start();
        assert!(session.state().list_loading);
        settle().await;

        let state = session.state();
        assert!(!state.list_loading);
        assert_eq!(state.results.items.len(), 10);
        assert_eq!(state.total_pages(), 5);
        assert_eq!(catalog.search_calls(), vec![("Avengers".to_string(), 1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystroke_burst_issues_one_search() {
        let catalog = Arc::new(
            MockCatalog::new().with_page("Heat", MockCatalog::sample_page("Heat", 2, 2)),
        );
        let session = session_with(Arc::clone(&catalog), "");

        for text in ["H", "He", "Hea", "Heat"] {
            session.on_query_change(text);
            assert_eq!(session.state().query.text, text);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(session.search_pending());
        assert!(catalog.search_calls().is_empty());

        settle().await;

        assert_eq!(catalog.search_calls(), vec![("Heat".to_string(), 1)]);
        assert_eq!(session.state().results.items.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_change_resets_page() {
        let catalog = Arc::new(
            MockCatalog::new()
                .with_page("Alien", MockCatalog::sample_page("Alien", 10, 30))
                .with_page("Aliens", MockCatalog::sample_page("Aliens", 10, 30)),
        );
        let session = session_with(Arc::clone(&catalog), "Alien");
        session.start();
        settle().await;

        assert_eq!(session.on_page_change(3), 3);
        settle().await;
        assert_eq!(session.state().query.page, 3);

        session.on_query_change("Aliens");
        assert_eq!(session.state().query.page, 1);
        settle().await;

        assert_eq!(
            catalog.search_calls().last(),
            Some(&("Aliens".to_string(), 1))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_change_is_clamped() {
        let catalog = Arc::new(
            MockCatalog::new().with_page("Alien", MockCatalog::sample_page("Alien", 10, 25)),
        );
        let session = session_with(Arc::clone(&catalog), "Alien");
        session.start();
        settle().await;

        assert_eq!(session.on_page_change(99), 3);
        assert_eq!(session.on_page_change(0), 1);
        settle().await;

        let calls = catalog.search_calls();
        assert_eq!(calls[1], ("Alien".to_string(), 3));
        assert_eq!(calls[2], ("Alien".to_string(), 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_change_with_no_results_stays_on_first_page() {
        let catalog = Arc::new(MockCatalog::new());
        let session = session_with(Arc::clone(&catalog), "");

        assert_eq!(session.state().total_pages(), 1);
        assert_eq!(session.on_page_change(1), 1);
        assert_eq!(session.next_page(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_change_fires_without_debounce() {
        let catalog = Arc::new(
            MockCatalog::new().with_page("Alien", MockCatalog::sample_page("Alien", 10, 25)),
        );
        let session = session_with(Arc::clone(&catalog), "Alien");
        session.start();
        settle().await;

        session.next_page();
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(catalog.search_calls().len(), 2);
        assert!(!session.search_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_change_drops_pending_debounce() {
        let catalog = Arc::new(
            MockCatalog::new()
                .with_page("Alien", MockCatalog::sample_page("Alien", 10, 30))
                .with_page("Aliens", MockCatalog::sample_page("Aliens", 10, 30)),
        );
        let session = session_with(Arc::clone(&catalog), "Alien");
        session.start();
        settle().await;

        session.on_query_change("Aliens");
        assert!(session.search_pending());
        assert_eq!(session.on_page_change(3), 3);
        assert!(!session.search_pending());
        settle().await;

        assert_eq!(
            catalog.search_calls(),
            vec![("Alien".to_string(), 1), ("Aliens".to_string(), 3)]
        );
        let state = session.state();
        assert_eq!(state.query.page, 3);
        assert_eq!(state.results_query, Query::new("Aliens").at_page(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_query_lags_typed_text() {
        let catalog = Arc::new(
            MockCatalog::new()
                .with_page("Alien", MockCatalog::sample_page("Alien", 10, 30))
                .with_page("Aliens", MockCatalog::sample_page("Aliens", 10, 30)),
        );
        let session = session_with(Arc::clone(&catalog), "Alien");
        session.start();
        settle().await;

        session.on_query_change("Aliens");
        let state = session.state();
        assert_eq!(state.query.text, "Aliens");
        assert_eq!(state.results_query.text, "Alien");

        settle().await;
        assert_eq!(session.state().results_query.text, "Aliens");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_search_does_not_notify_subscribers() {
        let catalog = Arc::new(
            MockCatalog::new()
                .with_delayed_page("slow", MockCatalog::sample_page("Slow", 1, 1), Duration::from_secs(3))
                .with_page("fast", MockCatalog::sample_page("Fast", 3, 3)),
        );
        let session = session_with(Arc::clone(&catalog), "");
        let mut updates = session.subscribe();

        session.on_query_change("slow");
        session.submit();
        session.on_query_change("fast");
        session.submit();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(updates.borrow_and_update().results_query.text, "fast");
        settle().await;

        assert!(!updates.has_changed().unwrap());
        assert_eq!(session.state().results.items.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_api_failure_clears_results() {
        let catalog = Arc::new(
            MockCatalog::new()
                .with_page("Alien", MockCatalog::sample_page("Alien", 10, 25))
                .with_search_error("zzzz", CatalogError::api("Movie not found!")),
        );
        let session = session_with(Arc::clone(&catalog), "Alien");
        session.start();
        settle().await;
        assert_eq!(session.state().results.total, 25);

        session.on_query_change("zzzz");
        settle().await;

        let state = session.state();
        assert!(state.results.items.is_empty());
        assert_eq!(state.results.total, 0);
        assert_eq!(state.list_error.as_deref(), Some("Movie not found!"));
        assert!(!state.list_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_shows_generic_message() {
        let catalog = Arc::new(
            MockCatalog::new().with_search_error("Alien", CatalogError::transport("HTTP 503")),
        );
        let session = session_with(Arc::clone(&catalog), "Alien");
        session.start();
        settle().await;

        assert_eq!(session.state().list_error.as_deref(), Some("Network error"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_response_does_not_clobber_newer_query() {
        let slow = MockCatalog::sample_page("Slow", 1, 1);
        let fast = MockCatalog::sample_page("Fast", 3, 3);
        let catalog = Arc::new(
            MockCatalog::new()
                .with_delayed_page("slow", slow, Duration::from_secs(3))
                .with_page("fast", fast.clone()),
        );
        let session = session_with(Arc::clone(&catalog), "");

        session.on_query_change("slow");
        session.submit();
        tokio::time::sleep(Duration::from_millis(10)).await;

        session.on_query_change("fast");
        session.submit();
        settle().await;

        let state = session.state();
        assert_eq!(catalog.search_calls().len(), 2);
        assert_eq!(state.results, fast);
        assert_eq!(state.query.text, "fast");
        assert!(!state.list_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_cancels_pending_debounce() {
        let catalog = Arc::new(
            MockCatalog::new().with_page("Up", MockCatalog::sample_page("Up", 1, 1)),
        );
        let session = session_with(Arc::clone(&catalog), "");

        session.on_query_change("Up");
        session.submit();
        settle().await;

        assert_eq!(catalog.search_calls(), vec![("Up".to_string(), 1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_query_yields_empty_results() {
        let catalog = Arc::new(
            MockCatalog::new().with_page("Alien", MockCatalog::sample_page("Alien", 10, 25)),
        );
        let session = session_with(Arc::clone(&catalog), "Alien");
        session.start();
        settle().await;

        session.on_query_change("   ");
        settle().await;

        let state = session.state();
        assert!(state.results.items.is_empty());
        assert_eq!(state.results.total, 0);
        assert_eq!(state.list_error, None);
        assert_eq!(catalog.search_calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_details_loads_record() {
        let catalog = Arc::new(
            MockCatalog::new().with_detail(MockCatalog::sample_detail("tt0848228", "The Avengers")),
        );
        let session = session_with(Arc::clone(&catalog), "");

        session.open_details("tt0848228");
        let state = session.state();
        assert!(state.detail_loading);
        assert_eq!(state.selected_id.as_deref(), Some("tt0848228"));
        assert!(state.detail.is_none());

        settle().await;

        let state = session.state();
        assert!(!state.detail_loading);
        let detail = state.detail.as_ref().and_then(DetailRecord::detail).unwrap();
        assert_eq!(detail.title, "The Avengers");
    }

    #[tokio::test(start_paused = true)]
    async fn test_detail_failure_is_captured() {
        let catalog = Arc::new(
            MockCatalog::new()
                .with_page("Alien", MockCatalog::sample_page("Alien", 10, 25))
                .with_detail_error("tt1", CatalogError::api("Incorrect IMDb ID.")),
        );
        let session = session_with(Arc::clone(&catalog), "Alien");
        session.start();
        settle().await;

        session.open_details("tt1");
        settle().await;

        let state = session.state();
        let record = state.detail.as_ref().unwrap();
        assert_eq!(record.error(), Some("Incorrect IMDb ID."));
        assert_eq!(record.imdb_id(), "tt1");
        assert!(!state.detail_loading);
        // List state is untouched by detail failures
        assert_eq!(state.results.total, 25);
        assert_eq!(state.list_error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_detail_is_discarded() {
        let catalog = Arc::new(
            MockCatalog::new()
                .with_delayed_detail(MockCatalog::sample_detail("tt1", "Slow"), Duration::from_secs(2))
                .with_detail(MockCatalog::sample_detail("tt2", "Fast")),
        );
        let session = session_with(Arc::clone(&catalog), "");

        session.open_details("tt1");
        session.open_details("tt2");
        settle().await;

        let state = session.state();
        assert_eq!(state.selected_id.as_deref(), Some("tt2"));
        assert_eq!(state.detail.as_ref().map(DetailRecord::imdb_id), Some("tt2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_details_ignores_late_response() {
        let catalog = Arc::new(MockCatalog::new().with_delayed_detail(
            MockCatalog::sample_detail("tt1", "Slow"),
            Duration::from_secs(2),
        ));
        let session = session_with(Arc::clone(&catalog), "");

        session.open_details("tt1");
        session.close_details();
        settle().await;

        let state = session.state();
        assert!(!state.detail_open());
        assert!(state.detail.is_none());
        assert!(!state.detail_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_applied_results() {
        let catalog = Arc::new(MockCatalog::new().with_page(
            "Up",
            ResultPage {
                items: vec![MovieSummary {
                    imdb_id: "tt1049413".to_string(),
                    title: "Up".to_string(),
                    year: Some("2009".to_string()),
                    media_type: marquee_catalog::MediaType::Movie,
                    poster: None,
                }],
                total: 1,
            },
        ));
        let session = session_with(Arc::clone(&catalog), "Up");
        let mut updates = session.subscribe();

        session.start();
        let state = updates
            .wait_for(|state| !state.list_loading && !state.results.is_empty())
            .await
            .unwrap()
            .clone();

        assert_eq!(state.results.items[0].title, "Up");
    }
}
