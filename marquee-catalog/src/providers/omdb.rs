//! OMDb catalog provider for production use.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::MovieCatalog;
use crate::errors::CatalogError;
use crate::metadata::{ApiOutcome, OmdbDetailBody, OmdbSearchBody};
use crate::types::{MovieDetail, ResultPage, is_blank};

/// Public OMDb endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// OMDb catalog provider.
///
/// Issues plain GET requests against the OMDb endpoint. Requests carry the
/// API key when one is configured; without a key OMDb answers with a logical
/// failure ("No API key provided.") which surfaces as `CatalogError::Api`.
#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl OmdbClient {
    /// Create a client for `base_url` using a default HTTP client.
    ///
    /// # Errors
    ///
    /// - `CatalogError::Transport` - `base_url` is not a valid URL
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, CatalogError> {
        Self::with_http_client(reqwest::Client::new(), base_url, api_key)
    }

    /// Create a client reusing a preconfigured HTTP client (timeouts, user agent).
    ///
    /// # Errors
    ///
    /// - `CatalogError::Transport` - `base_url` is not a valid URL
    pub fn with_http_client(
        client: reqwest::Client,
        base_url: &str,
        api_key: Option<String>,
    ) -> Result<Self, CatalogError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CatalogError::transport(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    /// Endpoint this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Query parameters for a request, with the API key first when present.
    fn request_params(&self, params: &[(&'static str, String)]) -> Vec<(&'static str, String)> {
        let mut all = Vec::with_capacity(params.len() + 1);
        if let Some(ref api_key) = self.api_key {
            all.push(("apikey", api_key.clone()));
        }
        all.extend(params.iter().cloned());
        all
    }

    /// Performs the GET and classifies the body.
    async fn fetch<T: DeserializeOwned>(
        &self,
        params: &[(&'static str, String)],
    ) -> Result<ApiOutcome<T>, CatalogError> {
        let response = self
            .client
            .get(self.base_url.clone())
            .query(&self.request_params(params))
            .send()
            .await
            .map_err(|e| CatalogError::transport(format!("OMDb request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::transport(format!("OMDb HTTP {status}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CatalogError::transport(format!("JSON parsing failed: {e}")))?;

        ApiOutcome::from_value(body)
    }
}

#[async_trait]
impl MovieCatalog for OmdbClient {
    async fn search_by_title(&self, query: &str, page: u32) -> Result<ResultPage, CatalogError> {
        if is_blank(query) {
            return Ok(ResultPage::empty());
        }

        let query = query.trim();
        let page = page.max(1);
        tracing::debug!(query, page, "Searching OMDb");

        let params = [("s", query.to_string()), ("page", page.to_string())];
        let outcome = self.fetch::<OmdbSearchBody>(&params).await;

        match outcome.and_then(ApiOutcome::into_result) {
            Ok(body) => {
                let result = ResultPage::from(body);
                tracing::debug!(
                    query,
                    page,
                    items = result.items.len(),
                    total = result.total,
                    "OMDb search completed"
                );
                Ok(result)
            }
            Err(error) => {
                tracing::warn!(query, page, error = ?error, "OMDb search failed");
                Err(error)
            }
        }
    }

    async fn fetch_detail(&self, imdb_id: &str) -> Result<MovieDetail, CatalogError> {
        tracing::debug!(imdb_id, "Fetching OMDb detail");

        let params = [("i", imdb_id.to_string()), ("plot", "full".to_string())];
        let outcome = self.fetch::<OmdbDetailBody>(&params).await;

        match outcome.and_then(ApiOutcome::into_result) {
            Ok(body) => Ok(MovieDetail::from(body)),
            Err(error) => {
                tracing::warn!(imdb_id, error = ?error, "OMDb detail lookup failed");
                Err(error)
            }
        }
    }
}
