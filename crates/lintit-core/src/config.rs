//! Settings consumed by the lint engine.
//!
//! This module provides the read-only configuration surface:
//!
//! - [`LintConfiguration`] - One analysis profile (source folders, include folders, tool files)
//! - [`Settings`] - Root settings: tool location, trigger toggles, flat and named profiles
//! - [`WatchConfig`] - File watcher settings used by the `watch` command
//! - [`TriggerMode`] - How document events are turned into scans
//!
//! All types deserialize from camelCase JSON and fall back to [`Default`] for
//! missing keys, so a partial `.lintit.json` is always valid.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Extension accepted when a configuration does not list its own.
pub const DEFAULT_EXTENSION: &str = ".c";

/// Tool executable used when the settings do not name one.
pub const DEFAULT_TOOL_LOCATION: &str = "lint-nt";

/// Batch script invoked in legacy mode, resolved from the workspace root.
pub const LEGACY_SCRIPT: &str = "lint.bat";

/// File name looked up in the workspace root when no settings file is given.
pub const SETTINGS_FILE_NAME: &str = ".lintit.json";

/// One analysis profile.
///
/// A profile claims every file below one of its `source_folders` and supplies
/// the include folders and extra tool files passed to the analysis tool for
/// those files. Paths may start with `${workspaceFolder}`.
///
/// # Examples
///
/// ```
/// use lintit_core::LintConfiguration;
/// use camino::Utf8Path;
///
/// let json = r#"{"sourceFolders": ["${workspaceFolder}/src"], "extensions": [".c", ".h"]}"#;
/// let config: LintConfiguration = serde_json::from_str(json).unwrap();
///
/// assert!(config.accepts_extension(Utf8Path::new("/ws/src/main.H")));
/// assert!(!config.accepts_extension(Utf8Path::new("/ws/src/main.cpp")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LintConfiguration {
    /// Optional display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Folder prefixes whose files this profile governs, in priority order.
    pub source_folders: Vec<String>,

    /// Folders passed to the tool as include paths.
    pub include_folders: Vec<String>,

    /// Folders passed to the tool as library include paths.
    pub library_include_folders: Vec<String>,

    /// Extra tool input files (option files) passed before the target.
    pub lint_files: Vec<String>,

    /// Accepted file extensions. `None` means only [`DEFAULT_EXTENSION`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
}

impl LintConfiguration {
    /// Returns `true` if the file's extension is accepted by this profile.
    ///
    /// Comparison is case-insensitive and ignores a leading dot on either side.
    #[must_use]
    pub fn accepts_extension(&self, path: &Utf8Path) -> bool {
        let Some(extension) = path.extension() else {
            return false;
        };

        match &self.extensions {
            Some(accepted) => accepted.iter().any(|ext| extension_eq(ext, extension)),
            None => extension_eq(DEFAULT_EXTENSION, extension),
        }
    }

    /// Returns a copy of this profile restricted to the builtin extension.
    #[must_use]
    pub fn with_default_extension(&self) -> Self {
        Self {
            extensions: None,
            ..self.clone()
        }
    }

    /// Returns the display name, or `"default"` for unnamed profiles.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("default")
    }
}

fn extension_eq(configured: &str, actual: &str) -> bool {
    configured
        .trim_start_matches('.')
        .eq_ignore_ascii_case(actual.trim_start_matches('.'))
}

/// Configuration for the file watcher.
///
/// # Examples
///
/// ```
/// use lintit_core::WatchConfig;
///
/// let config = WatchConfig::default();
/// assert_eq!(config.debounce_ms, 100);
/// assert!(config.recursive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WatchConfig {
    /// Debounce window in milliseconds.
    pub debounce_ms: u64,

    /// Whether to watch subdirectories recursively.
    pub recursive: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            recursive: true,
        }
    }
}

/// How document events are turned into scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Every open, save, or close re-lints all open documents.
    Aggressive,
    /// Documents are linted one at a time through `lint.bat`.
    Legacy,
    /// Documents are linted one at a time through the configured tool.
    PerDocument,
}

/// Root settings for lintit.
///
/// The flat profile fields (`sourceFolders`, `includeFolders`, ...) live at the
/// top level and apply when `configurations` is empty.
///
/// # Examples
///
/// ```
/// use lintit_core::{Settings, TriggerMode};
///
/// let settings = Settings::from_json_str(r#"{"pcLintLocation": "C:/lint/lint-nt.exe"}"#).unwrap();
/// assert_eq!(settings.tool_location, "C:/lint/lint-nt.exe");
/// assert_eq!(settings.trigger_mode(), TriggerMode::PerDocument);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Path to the analysis tool executable.
    #[serde(alias = "pcLintLocation")]
    pub tool_location: String,

    /// Re-lint every open document on each document event.
    pub aggressive_mode: bool,

    /// Use the `lint.bat` script instead of the configured tool.
    pub legacy_mode: bool,

    /// Profile used when `configurations` is empty.
    #[serde(flatten)]
    pub flat: LintConfiguration,

    /// Named profiles, matched in declaration order.
    pub configurations: Vec<LintConfiguration>,

    /// File watcher settings.
    pub watch: WatchConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tool_location: DEFAULT_TOOL_LOCATION.to_owned(),
            aggressive_mode: false,
            legacy_mode: false,
            flat: LintConfiguration::default(),
            configurations: Vec::new(),
            watch: WatchConfig::default(),
        }
    }
}

impl Settings {
    /// Parses and validates settings from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from a file.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::MissingFile(path.to_owned()));
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Locates the settings for a workspace.
    ///
    /// An explicit path must exist. Otherwise `.lintit.json` in the workspace
    /// root is used when present, and defaults when it is not.
    pub fn discover(workspace_root: &Utf8Path, explicit: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate: Utf8PathBuf = workspace_root.join(SETTINGS_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Checks option values that would make every scan fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.legacy_mode && self.tool_location.trim().is_empty() {
            return Err(ConfigError::invalid_option(
                "toolLocation",
                "must name the analysis tool executable",
            ));
        }

        if self.watch.debounce_ms == 0 {
            return Err(ConfigError::invalid_option(
                "watch.debounceMs",
                "must be greater than zero",
            ));
        }

        for (index, configuration) in self.configurations.iter().enumerate() {
            if configuration
                .extensions
                .as_ref()
                .is_some_and(|extensions| extensions.iter().any(|e| e.trim().is_empty()))
            {
                return Err(ConfigError::invalid_option(
                    format!("configurations[{index}].extensions"),
                    "must not contain empty entries",
                ));
            }
        }

        Ok(())
    }

    /// Returns the trigger mode. Aggressive mode takes precedence over legacy mode.
    #[must_use]
    pub const fn trigger_mode(&self) -> TriggerMode {
        if self.aggressive_mode {
            TriggerMode::Aggressive
        } else if self.legacy_mode {
            TriggerMode::Legacy
        } else {
            TriggerMode::PerDocument
        }
    }
}
