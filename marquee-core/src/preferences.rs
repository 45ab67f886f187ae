//! Persisted UI preferences.
//!
//! A small JSON key-value file. The only key Marquee writes today is
//! `"theme"`; unknown keys are preserved on save.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key the theme is stored under.
pub const THEME_KEY: &str = "theme";

/// Errors reading or writing the preference file.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Preference file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Invalid theme '{value}', expected 'light' or 'dark'")]
    InvalidTheme { value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Color scheme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The opposite theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(PreferenceError::InvalidTheme {
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File-backed preference store.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl PreferenceStore {
    /// Opens the store at `path`. A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// - `PreferenceError::Io` - File exists but cannot be read
    /// - `PreferenceError::Corrupt` - File is not a JSON string map
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();

        let values = match fs::read_to_string(&path) {
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|e| PreferenceError::Corrupt {
                    path: path.clone(),
                    reason: e.to_string(),
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored theme, or the default when unset or unrecognized.
    pub fn theme(&self) -> Theme {
        match self.values.get(THEME_KEY) {
            Some(value) => value.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %value, "Ignoring unrecognized stored theme");
                Theme::default()
            }),
            None => Theme::default(),
        }
    }

    /// Stores `theme` and writes the file.
    ///
    /// # Errors
    ///
    /// - `PreferenceError::Io` - File or its directory cannot be written
    pub fn set_theme(&mut self, theme: Theme) -> Result<(), PreferenceError> {
        self.values
            .insert(THEME_KEY.to_string(), theme.as_str().to_string());
        self.save()
    }

    /// Flips the theme, writes the file, and returns the new theme.
    ///
    /// # Errors
    ///
    /// - `PreferenceError::Io` - File or its directory cannot be written
    pub fn toggle_theme(&mut self) -> Result<Theme, PreferenceError> {
        let theme = self.theme().toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    fn save(&self) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents =
            serde_json::to_string_pretty(&self.values).map_err(|e| PreferenceError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        fs::write(&self.path, contents)?;

        tracing::debug!(path = %self.path.display(), "Preferences saved");
        Ok(())
    }
}
