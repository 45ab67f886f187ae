//! OMDb response decoding.
//!
//! OMDb answers every request with HTTP 200 and signals logical failure in
//! the body (`"Response": "False"` plus an `"Error"` message). Bodies are
//! decoded into an [`ApiOutcome`] right after the transport call so nothing
//! downstream inspects raw fields.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CatalogError;
use crate::types::{MediaType, MovieDetail, MovieSummary, Rating, ResultPage};

/// Message used when OMDb reports failure without saying why.
const UNKNOWN_ERROR: &str = "Unknown error";

/// OMDb's placeholder for missing attributes.
const NOT_AVAILABLE: &str = "N/A";

/// Decoded OMDb response: the payload, or the failure the API reported.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    /// The API accepted the request
    Success(T),
    /// The API reported a logical failure
    Failure {
        /// Message supplied by the API
        message: String,
    },
}

impl<T: DeserializeOwned> ApiOutcome<T> {
    /// Classifies a raw JSON body.
    ///
    /// # Errors
    ///
    /// - `CatalogError::Transport` - Body is not an object of the expected shape
    pub fn from_value(body: Value) -> Result<Self, CatalogError> {
        if !body.is_object() {
            return Err(CatalogError::transport("response body is not a JSON object"));
        }

        let failed = body
            .get("Response")
            .and_then(Value::as_str)
            .is_some_and(|flag| flag.eq_ignore_ascii_case("false"));

        if failed {
            let message = body
                .get("Error")
                .and_then(Value::as_str)
                .filter(|message| !message.is_empty())
                .unwrap_or(UNKNOWN_ERROR)
                .to_string();
            return Ok(Self::Failure { message });
        }

        serde_json::from_value(body)
            .map(Self::Success)
            .map_err(|e| CatalogError::transport(format!("JSON parsing failed: {e}")))
    }
}

impl<T> ApiOutcome<T> {
    /// Turns a reported failure into `CatalogError::Api`.
    ///
    /// # Errors
    ///
    /// - `CatalogError::Api` - The API reported a logical failure
    pub fn into_result(self) -> Result<T, CatalogError> {
        match self {
            Self::Success(payload) => Ok(payload),
            Self::Failure { message } => Err(CatalogError::Api { message }),
        }
    }
}

/// Body of a successful `?s=` search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OmdbSearchBody {
    /// Results on the requested page
    #[serde(rename = "Search", default)]
    pub search: Option<Vec<OmdbSummary>>,
    /// Total hit count, encoded as a string
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
}

/// One entry of the `Search` array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OmdbSummary {
    /// IMDb identifier
    #[serde(rename = "imdbID", default)]
    pub imdb_id: Option<String>,
    /// Title of the media item
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    /// Release year as string
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    /// Media type (movie, series, etc.)
    #[serde(rename = "Type", default)]
    pub media_type: Option<String>,
    /// URL to poster image
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
}

/// Body of a successful `?i=` detail lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbDetailBody {
    /// IMDb identifier
    #[serde(rename = "imdbID", default)]
    pub imdb_id: Option<String>,
    /// Title of the media item
    #[serde(default)]
    pub title: Option<String>,
    /// Release year as string
    #[serde(default)]
    pub year: Option<String>,
    /// Content rating
    #[serde(default)]
    pub rated: Option<String>,
    /// Release date
    #[serde(default)]
    pub released: Option<String>,
    /// Runtime duration
    #[serde(default)]
    pub runtime: Option<String>,
    /// Genre classification
    #[serde(default)]
    pub genre: Option<String>,
    /// Director names
    #[serde(default)]
    pub director: Option<String>,
    /// Writer names
    #[serde(default)]
    pub writer: Option<String>,
    /// Main cast
    #[serde(default)]
    pub actors: Option<String>,
    /// Plot summary
    #[serde(default)]
    pub plot: Option<String>,
    /// Spoken languages
    #[serde(default)]
    pub language: Option<String>,
    /// Production countries
    #[serde(default)]
    pub country: Option<String>,
    /// Awards summary
    #[serde(default)]
    pub awards: Option<String>,
    /// URL to poster image
    #[serde(default)]
    pub poster: Option<String>,
    /// Per-source ratings
    #[serde(default)]
    pub ratings: Option<Vec<OmdbRating>>,
    /// IMDb rating as string
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: Option<String>,
    /// Media type
    #[serde(rename = "Type", default)]
    pub media_type: Option<String>,
}

/// One entry of the `Ratings` array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbRating {
    /// Rating source
    #[serde(default)]
    pub source: Option<String>,
    /// Rating value
    #[serde(default)]
    pub value: Option<String>,
}

/// Drops OMDb's "N/A" placeholder and blank strings.
fn available(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty() && v != NOT_AVAILABLE)
}

impl From<OmdbSummary> for MovieSummary {
    fn from(raw: OmdbSummary) -> Self {
        Self {
            imdb_id: raw.imdb_id.unwrap_or_default(),
            title: raw.title.unwrap_or_default(),
            year: available(raw.year),
            media_type: MediaType::from_omdb(raw.media_type.as_deref()),
            poster: available(raw.poster),
        }
    }
}

impl From<OmdbSearchBody> for ResultPage {
    fn from(raw: OmdbSearchBody) -> Self {
        let items = raw
            .search
            .unwrap_or_default()
            .into_iter()
            .map(MovieSummary::from)
            .collect();

        // OMDb sends the count as a string; anything unparsable counts as zero
        let total = raw
            .total_results
            .and_then(|t| t.trim().parse().ok())
            .unwrap_or(0);

        Self { items, total }
    }
}

impl From<OmdbDetailBody> for MovieDetail {
    fn from(raw: OmdbDetailBody) -> Self {
        let ratings = raw
            .ratings
            .unwrap_or_default()
            .into_iter()
            .filter_map(|rating| {
                Some(Rating {
                    source: available(rating.source)?,
                    value: available(rating.value)?,
                })
            })
            .collect();

        Self {
            imdb_id: raw.imdb_id.unwrap_or_default(),
            title: raw.title.unwrap_or_default(),
            year: available(raw.year),
            rated: available(raw.rated),
            released: available(raw.released),
            runtime: available(raw.runtime),
            genre: available(raw.genre),
            director: available(raw.director),
            writer: available(raw.writer),
            actors: available(raw.actors),
            plot: available(raw.plot),
            language: available(raw.language),
            country: available(raw.country),
            awards: available(raw.awards),
            poster: available(raw.poster),
            ratings,
            imdb_rating: available(raw.imdb_rating),
            media_type: raw
                .media_type
                .as_deref()
                .map(|t| MediaType::from_omdb(Some(t))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_search_success_body() {
        let body = json!({"Search": [{"imdbID": "tt1", "Title": "A"}], "totalResults": "1"});
        let outcome = ApiOutcome::<OmdbSearchBody>::from_value(body).unwrap();
        let page = ResultPage::from(outcome.into_result().unwrap());

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].imdb_id, "tt1");
        assert_eq!(page.items[0].title, "A");
        assert_eq!(page.items[0].media_type, MediaType::Unknown);
        assert_eq!(page.total, 1);
        assert_eq!(page.total_pages(), 1);
    }

    #[test]
    fn test_failure_body_carries_message() {
        let body = json!({"Response": "False", "Error": "Movie not found!"});
        let outcome = ApiOutcome::<OmdbSearchBody>::from_value(body).unwrap();
        assert!(
            matches!(&outcome, ApiOutcome::Failure { message } if message == "Movie not found!")
        );
        let error = outcome.into_result().unwrap_err();
        assert_eq!(error, CatalogError::api("Movie not found!"));
    }

    #[test]
    fn test_failure_without_message() {
        let body = json!({"Response": "False"});
        let error = ApiOutcome::<OmdbDetailBody>::from_value(body)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert_eq!(error.to_string(), "Unknown error");
    }

    #[test]
    fn test_non_object_body_is_transport_error() {
        let error = ApiOutcome::<OmdbSearchBody>::from_value(json!(["nope"])).unwrap_err();
        assert!(error.is_transport());
    }

    #[test]
    fn test_missing_search_array_is_empty_page() {
        let body = json!({"Response": "True", "totalResults": "garbage"});
        let page = ResultPage::from(
            ApiOutcome::<OmdbSearchBody>::from_value(body)
                .unwrap()
                .into_result()
                .unwrap(),
        );
        assert!(page.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_detail_filters_not_available() {
        let body = json!({
            "Title": "Heat",
            "Year": "1995",
            "Rated": "R",
            "Awards": "N/A",
            "Poster": "N/A",
            "Ratings": [
                {"Source": "Internet Movie Database", "Value": "8.3/10"},
                {"Source": "Metacritic", "Value": "N/A"}
            ],
            "imdbRating": "8.3",
            "imdbID": "tt0113277",
            "Type": "movie",
            "Response": "True"
        });
        let detail = MovieDetail::from(
            ApiOutcome::<OmdbDetailBody>::from_value(body)
                .unwrap()
                .into_result()
                .unwrap(),
        );

        assert_eq!(detail.imdb_id, "tt0113277");
        assert_eq!(detail.rated.as_deref(), Some("R"));
        assert_eq!(detail.awards, None);
        assert_eq!(detail.poster, None);
        assert_eq!(detail.ratings.len(), 1);
        assert_eq!(detail.ratings[0].value, "8.3/10");
        assert_eq!(detail.media_type, Some(MediaType::Movie));
    }
}
