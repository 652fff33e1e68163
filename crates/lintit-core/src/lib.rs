//! Core types, settings, and path resolution for lintit.
//!
//! This crate provides the foundational pieces shared across the workspace:
//!
//! - [`Settings`] and [`LintConfiguration`], the read-only configuration surface
//! - [`PathResolver`] for `${workspaceFolder}` substitution and separator handling
//! - Diagnostic domain types ([`Diagnostic`], [`Severity`], [`DiagnosticMap`])
//! - [`DocumentEvent`], the trigger delivered by editors and the file watcher
//! - [`ConfigError`] for settings loading failures

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod path;
pub mod types;

pub use config::{
    DEFAULT_EXTENSION, DEFAULT_TOOL_LOCATION, LEGACY_SCRIPT, LintConfiguration, SETTINGS_FILE_NAME,
    Settings, TriggerMode, WatchConfig,
};
pub use error::ConfigError;
pub use path::{PathResolver, PathStyle, WORKSPACE_FOLDER_TOKEN, strip_git_suffix};
pub use types::{
    Diagnostic, DiagnosticMap, DiagnosticRange, DocumentEvent, DocumentEventKind, Severity,
    SeverityKeyword,
};
