//! Error types for the lintit-core crate.
//!
//! This module provides the [`ConfigError`] type for failures that can occur
//! while loading and validating [`Settings`](crate::Settings).

use camino::Utf8PathBuf;

/// Errors that can occur during settings loading and validation.
///
/// # Examples
///
/// ```
/// use lintit_core::ConfigError;
/// use camino::Utf8PathBuf;
///
/// let error = ConfigError::MissingFile(Utf8PathBuf::from("/ws/.lintit.json"));
/// assert!(error.to_string().contains(".lintit.json"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The settings file named explicitly does not exist.
    #[error("settings file not found: {0}")]
    MissingFile(Utf8PathBuf),

    /// A settings option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// An I/O error occurred while reading settings.
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the settings file.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    #[inline]
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}
