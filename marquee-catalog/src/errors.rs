//! Error types for catalog lookups.

use thiserror::Error;

/// Errors that can occur while talking to the metadata API.
///
/// The display string is what the UI shows. Transport failures always
/// display the same generic message; API failures display the message the
/// API supplied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The request could not be completed or returned a non-success status.
    #[error("Network error")]
    Transport {
        /// Underlying cause, kept for logging only
        reason: String,
    },

    /// The API answered but reported a logical failure (no match, bad id).
    #[error("{message}")]
    Api {
        /// Message supplied by the API
        message: String,
    },
}

impl CatalogError {
    /// Builds a transport error from any displayable cause.
    pub fn transport(reason: impl std::fmt::Display) -> Self {
        Self::Transport {
            reason: reason.to_string(),
        }
    }

    /// Builds an API-level error carrying the API's message.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Returns true when the failure happened before a usable response arrived.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
