//! Local stand-in for the OMDb endpoint.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const API_KEY: &str = "test-key";

/// Total hit count the fake reports for "Avengers".
pub const AVENGERS_TOTAL: u64 = 137;

/// How long the "slow" query takes to answer.
pub const SLOW_DELAY: Duration = Duration::from_millis(400);

type RequestLog = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// Running fake OMDb server; stops when dropped.
pub struct FakeOmdb {
    pub base_url: String,
    requests: RequestLog,
    server: JoinHandle<()>,
}

impl FakeOmdb {
    pub async fn start() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("marquee_catalog=debug,marquee_core=debug")
            .with_test_writer()
            .try_init();

        let requests: RequestLog = Arc::default();
        let app = Router::new()
            .route("/", get(handle_request))
            .with_state(Arc::clone(&requests));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{address}/"),
            requests,
            server,
        }
    }

    /// Query parameters of every request received, in arrival order.
    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.requests.lock().clone()
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().len()
    }

    /// Values of the `s` parameter across all search requests.
    pub fn searched_titles(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter_map(|params| params.get("s").cloned())
            .collect()
    }
}

impl Drop for FakeOmdb {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle_request(
    State(requests): State<RequestLog>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    requests.lock().push(params.clone());

    match params.get("apikey").map(String::as_str) {
        Some(API_KEY) => {}
        None => return failure("No API key provided."),
        Some(_) => return failure("Invalid API key!"),
    }

    if let Some(title) = params.get("s") {
        let page = params
            .get("page")
            .and_then(|p| p.parse::<u64>().ok())
            .unwrap_or(1);
        return search_response(title, page).await;
    }

    match params.get("i") {
        Some(imdb_id) => detail_response(imdb_id),
        None => failure("Incorrect IMDb ID."),
    }
}

fn failure(message: &str) -> Response {
    Json(json!({"Response": "False", "Error": message})).into_response()
}

fn summary(imdb_id: &str, title: &str, year: &str) -> Value {
    json!({
        "Title": title,
        "Year": year,
        "imdbID": imdb_id,
        "Type": "movie",
        "Poster": "N/A"
    })
}

async fn search_response(title: &str, page: u64) -> Response {
    match title {
        "Avengers" => {
            let first = (page.max(1) - 1) * 10;
            let items: Vec<Value> = (first..(first + 10).min(AVENGERS_TOTAL))
                .map(|n| summary(&format!("tt9{n:06}"), &format!("Avengers {n}"), "2012"))
                .collect();
            Json(json!({
                "Search": items,
                "totalResults": AVENGERS_TOTAL.to_string(),
                "Response": "True"
            }))
            .into_response()
        }
        "One" => Json(json!({
            "Search": [{"imdbID": "tt1", "Title": "A"}],
            "totalResults": "1"
        }))
        .into_response(),
        "slow" => {
            tokio::time::sleep(SLOW_DELAY).await;
            Json(json!({
                "Search": [summary("tt0000001", "Slow Movie", "1999")],
                "totalResults": "1",
                "Response": "True"
            }))
            .into_response()
        }
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
        "garbled" => (StatusCode::OK, "<html>not json</html>").into_response(),
        _ => failure("Movie not found!"),
    }
}

fn detail_response(imdb_id: &str) -> Response {
    match imdb_id {
        "tt0848228" => Json(json!({
            "Title": "The Avengers",
            "Year": "2012",
            "Rated": "PG-13",
            "Released": "04 May 2012",
            "Runtime": "143 min",
            "Genre": "Action, Sci-Fi",
            "Director": "Joss Whedon",
            "Writer": "Joss Whedon, Zak Penn",
            "Actors": "Robert Downey Jr., Chris Evans, Scarlett Johansson",
            "Plot": "Earth's mightiest heroes must come together.",
            "Language": "English, Russian",
            "Country": "United States",
            "Awards": "N/A",
            "Poster": "https://example.invalid/avengers.jpg",
            "Ratings": [
                {"Source": "Internet Movie Database", "Value": "8.0/10"},
                {"Source": "Rotten Tomatoes", "Value": "91%"}
            ],
            "imdbRating": "8.0",
            "imdbID": "tt0848228",
            "Type": "movie",
            "Response": "True"
        }))
        .into_response(),
        _ => failure("Incorrect IMDb ID."),
    }
}
