//! OMDb client against the fake endpoint: request shape and error mapping.

use marquee_catalog::{CatalogError, DetailRecord, MovieCatalog, OmdbClient};
use tokio_test::{assert_err, assert_ok};

use crate::fake_omdb::{API_KEY, AVENGERS_TOTAL, FakeOmdb};

fn client_for(server: &FakeOmdb) -> OmdbClient {
    OmdbClient::new(&server.base_url, Some(API_KEY.to_string())).unwrap()
}

#[tokio::test]
async fn test_blank_query_makes_no_request() {
    let server = FakeOmdb::start().await;
    let client = client_for(&server);

    for query in ["", "   ", "\t\n"] {
        let page = assert_ok!(client.search_by_title(query, 1).await);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }

    assert_eq!(server.hits(), 0);
}

#[tokio::test]
async fn test_search_sends_key_title_and_page() {
    let server = FakeOmdb::start().await;
    let client = client_for(&server);

    let page = assert_ok!(client.search_by_title("  Avengers ", 2).await);

    assert_eq!(page.items.len(), 10);
    assert_eq!(page.items[0].title, "Avengers 10");
    assert_eq!(page.items[0].poster, None);
    assert_eq!(page.total, AVENGERS_TOTAL);
    assert_eq!(page.total_pages(), 14);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].get("apikey").map(String::as_str), Some(API_KEY));
    assert_eq!(requests[0].get("s").map(String::as_str), Some("Avengers"));
    assert_eq!(requests[0].get("page").map(String::as_str), Some("2"));
}

#[tokio::test]
async fn test_minimal_search_body() {
    let server = FakeOmdb::start().await;
    let client = client_for(&server);

    let page = assert_ok!(client.search_by_title("One", 1).await);

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].imdb_id, "tt1");
    assert_eq!(page.items[0].title, "A");
    assert_eq!(page.total_pages(), 1);
}

#[tokio::test]
async fn test_no_results_is_api_error() {
    let server = FakeOmdb::start().await;
    let client = client_for(&server);

    let error = assert_err!(client.search_by_title("zzzz", 1).await);
    assert_eq!(error, CatalogError::api("Movie not found!"));
    assert_eq!(error.to_string(), "Movie not found!");
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let server = FakeOmdb::start().await;
    let client = client_for(&server);

    let error = assert_err!(client.search_by_title("boom", 1).await);
    assert!(error.is_transport());
    assert_eq!(error.to_string(), "Network error");
}

#[tokio::test]
async fn test_undecodable_body_is_transport_error() {
    let server = FakeOmdb::start().await;
    let client = client_for(&server);

    let error = assert_err!(client.search_by_title("garbled", 1).await);
    assert!(error.is_transport());
}

#[tokio::test]
async fn test_missing_key_surfaces_api_message() {
    let server = FakeOmdb::start().await;
    let client = OmdbClient::new(&server.base_url, None).unwrap();

    let error = assert_err!(client.search_by_title("Avengers", 1).await);
    assert_eq!(error.to_string(), "No API key provided.");
    assert!(!server.requests()[0].contains_key("apikey"));
}

#[tokio::test]
async fn test_detail_requests_full_plot() {
    let server = FakeOmdb::start().await;
    let client = client_for(&server);

    let detail = assert_ok!(client.fetch_detail("tt0848228").await);

    assert_eq!(detail.title, "The Avengers");
    assert_eq!(detail.director.as_deref(), Some("Joss Whedon"));
    assert_eq!(detail.awards, None);
    assert_eq!(detail.ratings.len(), 2);
    assert_eq!(detail.imdb_rating.as_deref(), Some("8.0"));

    let requests = server.requests();
    assert_eq!(requests[0].get("i").map(String::as_str), Some("tt0848228"));
    assert_eq!(requests[0].get("plot").map(String::as_str), Some("full"));
}

#[tokio::test]
async fn test_detail_failure_becomes_error_marker() {
    let server = FakeOmdb::start().await;
    let client = client_for(&server);

    let record = DetailRecord::from_result("tt1", client.fetch_detail("tt1").await);

    assert_eq!(record.error(), Some("Incorrect IMDb ID."));
    assert_eq!(record.imdb_id(), "tt1");
}

#[tokio::test]
async fn test_lookups_are_not_cached() {
    let server = FakeOmdb::start().await;
    let client = client_for(&server);

    assert_ok!(client.search_by_title("One", 1).await);
    assert_ok!(client.search_by_title("One", 1).await);

    assert_eq!(server.hits(), 2);
}
