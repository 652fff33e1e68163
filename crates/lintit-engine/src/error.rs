//! Error types for the lintit-engine crate.
//!
//! This module provides the [`LintError`] type for errors that can occur
//! while linting files and walking source folders.

use camino::Utf8PathBuf;

/// Errors that can occur during lint runs.
///
/// # Error Recovery Strategy
///
/// - **Launch errors** ([`LintError::Launch`]): Notice, skip file, continue scan
/// - **Output errors** ([`LintError::Output`]): Notice, skip file, continue scan
/// - **Walker errors** ([`LintError::Walk`]): Fatal for folder mode
/// - **Configuration errors** ([`LintError::Config`]): Fatal
///
/// # Examples
///
/// ```
/// use lintit_engine::LintError;
/// use std::io;
///
/// let err = LintError::launch("/ws/a.c", "lint-nt", io::Error::from(io::ErrorKind::NotFound));
/// assert!(err.is_recoverable());
/// assert_eq!(err.path().map(|p| p.as_str()), Some("/ws/a.c"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    /// The analysis tool could not be started for a file.
    #[error("failed to launch {tool} for {file}: {source}")]
    Launch {
        /// The file whose pipeline failed.
        file: Utf8PathBuf,
        /// The executable that was launched.
        tool: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The tool started but its output could not be read.
    #[error("failed to read tool output for {file}: {source}")]
    Output {
        /// The file whose pipeline failed.
        file: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to walk a source folder.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Invalid engine configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl LintError {
    /// Creates a new [`LintError::Launch`] error.
    #[inline]
    pub fn launch(
        file: impl Into<Utf8PathBuf>,
        tool: impl Into<Utf8PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Launch {
            file: file.into(),
            tool: tool.into(),
            source,
        }
    }

    /// Creates a new [`LintError::Output`] error.
    #[inline]
    pub fn output(file: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Output {
            file: file.into(),
            source,
        }
    }

    /// Creates a new [`LintError::Config`] error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns `true` if the error only affects one file's pipeline.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Launch { .. } | Self::Output { .. })
    }

    /// Returns `true` if this error is fatal (the scan should stop).
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Launch { file, .. } | Self::Output { file, .. } => Some(file),
            Self::Walk(_) | Self::Config(_) => None,
        }
    }
}

impl From<lintit_core::ConfigError> for LintError {
    fn from(err: lintit_core::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_lint_error_launch() {
        let err = LintError::launch(
            "/ws/src/main.c",
            "/opt/lint/lint-nt",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.is_recoverable());
        assert!(!err.is_fatal());
        assert_eq!(err.path().map(|p| p.as_str()), Some("/ws/src/main.c"));

        let message = err.to_string();
        assert!(message.contains("/opt/lint/lint-nt"));
        assert!(message.contains("/ws/src/main.c"));
    }

    #[test]
    fn test_lint_error_output() {
        let err = LintError::output("/ws/a.c", io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(err.is_recoverable());
        assert_eq!(err.path().map(|p| p.as_str()), Some("/ws/a.c"));
    }

    #[test]
    fn test_lint_error_config() {
        let err = LintError::config("tool location is empty");
        assert!(err.is_fatal());
        assert!(err.path().is_none());
        assert_eq!(err.to_string(), "invalid configuration: tool location is empty");
    }

    #[test]
    fn test_lint_error_from_config_error() {
        let err: LintError =
            lintit_core::ConfigError::invalid_option("toolLocation", "empty").into();
        assert!(matches!(err, LintError::Config(_)));
        assert!(err.to_string().contains("toolLocation"));
    }
}
