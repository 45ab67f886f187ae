//! Search session over the real client: debounce, paging, ordering, details.

use std::sync::Arc;
use std::time::Duration;

use marquee_catalog::{DetailRecord, MovieCatalog};
use marquee_core::config::SessionConfig;
use marquee_core::{MarqueeConfig, SearchSession, SearchState};
use tokio::sync::watch;

use crate::fake_omdb::{API_KEY, AVENGERS_TOTAL, FakeOmdb, SLOW_DELAY};

const DEBOUNCE: Duration = Duration::from_millis(50);

fn session_for(server: &FakeOmdb, initial_query: &str) -> SearchSession {
    let mut config = MarqueeConfig::for_testing();
    config.api.base_url = server.base_url.clone();
    config.api.api_key = Some(API_KEY.to_string());

    let catalog: Arc<dyn MovieCatalog> = Arc::new(config.build_catalog().unwrap());
    let session_config = SessionConfig {
        debounce_delay: DEBOUNCE,
        initial_query: initial_query.to_string(),
    };
    SearchSession::new(catalog, &session_config)
}

async fn wait_until(
    updates: &mut watch::Receiver<SearchState>,
    condition: impl FnMut(&SearchState) -> bool,
) -> SearchState {
    tokio::time::timeout(Duration::from_secs(5), updates.wait_for(condition))
        .await
        .expect("timed out waiting for session state")
        .expect("session dropped")
        .clone()
}

#[tokio::test]
async fn test_initial_search_populates_results() {
    let server = FakeOmdb::start().await;
    let session = session_for(&server, "Avengers");
    let mut updates = session.subscribe();

    session.start();
    let state = wait_until(&mut updates, |s| !s.list_loading && !s.results.is_empty()).await;

    assert_eq!(state.results.items.len(), 10);
    assert_eq!(state.results.total, AVENGERS_TOTAL);
    assert_eq!(state.total_pages(), 14);
    assert_eq!(state.query.page, 1);
}

#[tokio::test]
async fn test_typing_burst_sends_single_request() {
    let server = FakeOmdb::start().await;
    let session = session_for(&server, "");
    let mut updates = session.subscribe();

    for text in ["A", "Av", "Aven", "Avengers"] {
        session.on_query_change(text);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let state = wait_until(&mut updates, |s| !s.list_loading && !s.results.is_empty()).await;
    tokio::time::sleep(DEBOUNCE * 3).await;

    assert_eq!(state.query.text, "Avengers");
    assert_eq!(server.searched_titles(), vec!["Avengers".to_string()]);
}

#[tokio::test]
async fn test_page_requests_are_clamped() {
    let server = FakeOmdb::start().await;
    let session = session_for(&server, "Avengers");
    let mut updates = session.subscribe();

    session.start();
    wait_until(&mut updates, |s| !s.list_loading && !s.results.is_empty()).await;

    assert_eq!(session.on_page_change(50), 14);
    let state = wait_until(&mut updates, |s| {
        !s.list_loading && s.results.items.len() == 7
    })
    .await;

    assert_eq!(state.query.page, 14);
    let last = server.requests().pop().unwrap();
    assert_eq!(last.get("page").map(String::as_str), Some("14"));
}

#[tokio::test]
async fn test_slow_older_response_is_discarded() {
    let server = FakeOmdb::start().await;
    let session = session_for(&server, "");
    let mut updates = session.subscribe();

    session.on_query_change("slow");
    session.submit();
    tokio::time::sleep(Duration::from_millis(20)).await;

    session.on_query_change("One");
    session.submit();

    let state = wait_until(&mut updates, |s| !s.list_loading).await;
    assert_eq!(state.results.items[0].imdb_id, "tt1");

    // Let the slow response land; it must not replace the newer results
    tokio::time::sleep(SLOW_DELAY * 2).await;

    let state = session.state();
    assert_eq!(state.results.items.len(), 1);
    assert_eq!(state.results.items[0].imdb_id, "tt1");
    assert_eq!(server.searched_titles(), vec!["slow".to_string(), "One".to_string()]);
}

#[tokio::test]
async fn test_failed_search_clears_list() {
    let server = FakeOmdb::start().await;
    let session = session_for(&server, "Avengers");
    let mut updates = session.subscribe();

    session.start();
    wait_until(&mut updates, |s| !s.list_loading && !s.results.is_empty()).await;

    session.on_query_change("zzzz");
    let state = wait_until(&mut updates, |s| s.list_error.is_some()).await;

    assert!(state.results.items.is_empty());
    assert_eq!(state.results.total, 0);
    assert_eq!(state.list_error.as_deref(), Some("Movie not found!"));
}

#[tokio::test]
async fn test_details_open_and_fail_in_place() {
    let server = FakeOmdb::start().await;
    let session = session_for(&server, "");
    let mut updates = session.subscribe();

    session.open_details("tt0848228");
    let state = wait_until(&mut updates, |s| s.detail.is_some()).await;
    let detail = state.detail.as_ref().and_then(DetailRecord::detail).unwrap();
    assert_eq!(detail.title, "The Avengers");

    session.open_details("tt-missing");
    let state = wait_until(&mut updates, |s| {
        s.detail.as_ref().and_then(DetailRecord::error).is_some()
    })
    .await;
    assert_eq!(state.selected_id.as_deref(), Some("tt-missing"));
    assert_eq!(
        state.detail.as_ref().and_then(DetailRecord::error),
        Some("Incorrect IMDb ID.")
    );
    assert_eq!(state.list_error, None);

    session.close_details();
    assert!(!session.state().detail_open());
}
