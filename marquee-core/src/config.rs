//! Centralized configuration for Marquee.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::path::PathBuf;
use std::time::Duration;

use marquee_catalog::OmdbClient;
use marquee_catalog::providers::omdb::DEFAULT_BASE_URL;

use crate::MarqueeError;

/// Central configuration for all Marquee components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct MarqueeConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub preferences: PreferencesConfig,
}

/// Metadata API connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// OMDb endpoint
    pub base_url: String,
    /// OMDb API key; requests without one are rejected by the API
    pub api_key: Option<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(10),
            user_agent: "marquee/0.1.0",
        }
    }
}

/// Search session behavior.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Quiet period after the last keystroke before a search fires
    pub debounce_delay: Duration,
    /// Query searched when a session starts
    pub initial_query: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_delay: Duration::from_millis(500),
            initial_query: "Avengers".to_string(),
        }
    }
}

/// Where the UI preference file lives.
#[derive(Debug, Clone)]
pub struct PreferencesConfig {
    pub path: PathBuf,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            path: base.join("marquee").join("preferences.json"),
        }
    }
}

impl MarqueeConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`MarqueeConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(key) = lookup("OMDB_API_KEY") {
            if !key.trim().is_empty() {
                config.api.api_key = Some(key);
            }
        }

        if let Some(base_url) = lookup("MARQUEE_OMDB_BASE_URL") {
            config.api.base_url = base_url;
        }

        if let Some(timeout) = lookup("MARQUEE_REQUEST_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.api.request_timeout = Duration::from_secs(seconds);
            }
        }

        if let Some(delay) = lookup("MARQUEE_DEBOUNCE_MS") {
            if let Ok(millis) = delay.parse::<u64>() {
                config.session.debounce_delay = Duration::from_millis(millis);
            }
        }

        if let Some(query) = lookup("MARQUEE_INITIAL_QUERY") {
            config.session.initial_query = query;
        }

        if let Some(path) = lookup("MARQUEE_PREFERENCES_PATH") {
            config.preferences.path = PathBuf::from(path);
        }

        config
    }

    /// Creates a configuration for tests: no key, short debounce.
    pub fn for_testing() -> Self {
        Self {
            session: SessionConfig {
                debounce_delay: Duration::from_millis(50),
                initial_query: String::new(),
            },
            ..Default::default()
        }
    }

    /// Builds the OMDb client described by the API section.
    ///
    /// # Errors
    ///
    /// - `MarqueeError::Configuration` - HTTP client could not be built
    /// - `MarqueeError::Catalog` - Base URL is invalid
    pub fn build_catalog(&self) -> Result<OmdbClient, MarqueeError> {
        let http = reqwest::Client::builder()
            .user_agent(self.api.user_agent)
            .timeout(self.api.request_timeout)
            .build()
            .map_err(|e| MarqueeError::Configuration {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(OmdbClient::with_http_client(
            http,
            &self.api.base_url,
            self.api.api_key.clone(),
        )?)
    }
}
