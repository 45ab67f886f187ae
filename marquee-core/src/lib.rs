//! Marquee Core - Search orchestration, configuration and preferences
//!
//! This crate ties the catalog to a user-facing search flow: debounced
//! query handling, pagination, detail selection, persisted UI preferences
//! and tracing setup.

pub mod config;
pub mod preferences;
pub mod session;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::MarqueeConfig;
use marquee_catalog::CatalogError;
pub use preferences::{PreferenceError, PreferenceStore, Theme};
pub use session::{SearchSession, SearchState};

/// Core errors that can bubble up from any Marquee subsystem.
#[derive(Debug, thiserror::Error)]
pub enum MarqueeError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Preference error: {0}")]
    Preferences(#[from] PreferenceError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MarqueeError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            MarqueeError::Catalog(e) => e.to_string(),
            MarqueeError::Preferences(e) => format!("Could not update preferences: {e}"),
            MarqueeError::Configuration { reason } => format!("Configuration problem: {reason}"),
            MarqueeError::Io(e) => format!("File system error: {e}"),
        }
    }
}

/// Convenience type alias for Results with MarqueeError.
pub type Result<T> = std::result::Result<T, MarqueeError>;
