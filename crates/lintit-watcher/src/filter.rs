//! File filtering for watch events.
//!
//! Events are filtered in the watcher thread before they reach the channel,
//! so the async consumer only sees paths that could be linted.
//!
//! # Examples
//!
//! ```
//! use lintit_watcher::{ExtensionFilter, FileFilter};
//! use camino::Utf8Path;
//!
//! let filter = ExtensionFilter::new(&[".c", ".h"]);
//!
//! assert!(filter.should_process(Utf8Path::new("src/main.c")));
//! assert!(filter.should_process(Utf8Path::new("inc/MAIN.H")));
//! assert!(!filter.should_process(Utf8Path::new("README.md")));
//! ```

use camino::Utf8Path;
use lintit_core::{DEFAULT_EXTENSION, Settings};
use smallvec::SmallVec;

/// A filter for determining which file events to process.
///
/// Filters must be [`Send`] and [`Sync`] because they run on the blocking
/// watcher thread, and `'static` to be moved into it.
///
/// # Examples
///
/// ```
/// use lintit_watcher::FileFilter;
/// use camino::Utf8Path;
///
/// struct NoGenerated;
///
/// impl FileFilter for NoGenerated {
///     fn should_process(&self, path: &Utf8Path) -> bool {
///         !path.as_str().contains("generated")
///     }
/// }
/// ```
pub trait FileFilter: Send + Sync + 'static {
    /// Returns `true` if events for `path` should be sent to the channel.
    fn should_process(&self, path: &Utf8Path) -> bool;
}

/// A filter that accepts all files.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllFilter;

impl FileFilter for AcceptAllFilter {
    #[inline]
    fn should_process(&self, _path: &Utf8Path) -> bool {
        true
    }
}

/// Accepts files whose extension is in a set.
///
/// Extensions compare case-insensitively, with or without a leading dot.
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    extensions: SmallVec<[String; 8]>,
}

impl ExtensionFilter {
    /// Creates a new extension filter.
    #[must_use]
    pub fn new(extensions: &[&str]) -> Self {
        extensions.iter().copied().map(str::to_owned).collect()
    }

    /// Builds the filter from every extension the settings can lint.
    ///
    /// A configuration without an explicit list contributes the builtin
    /// extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use lintit_watcher::{ExtensionFilter, FileFilter};
    /// use lintit_core::Settings;
    /// use camino::Utf8Path;
    ///
    /// let filter = ExtensionFilter::for_settings(&Settings::default());
    /// assert!(filter.should_process(Utf8Path::new("/ws/a.c")));
    /// assert!(!filter.should_process(Utf8Path::new("/ws/a.h")));
    /// ```
    #[must_use]
    pub fn for_settings(settings: &Settings) -> Self {
        let configurations = if settings.configurations.is_empty() {
            std::slice::from_ref(&settings.flat)
        } else {
            settings.configurations.as_slice()
        };

        let mut filter: Self = configurations
            .iter()
            .flat_map(|configuration| match &configuration.extensions {
                Some(extensions) => extensions.clone(),
                None => vec![DEFAULT_EXTENSION.to_owned()],
            })
            .collect();

        // Legacy document triggers lint the builtin extension regardless.
        if settings.legacy_mode {
            filter.insert(DEFAULT_EXTENSION);
        }
        filter
    }

    fn insert(&mut self, extension: &str) {
        let extension = normalize(extension);
        if !self.extensions.contains(&extension) {
            self.extensions.push(extension);
        }
    }

    /// Returns the accepted extensions, lowercase and without dots.
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExtensionFilter {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut filter = Self {
            extensions: SmallVec::new(),
        };
        for extension in iter {
            filter.insert(extension.as_ref());
        }
        filter
    }
}

fn normalize(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}

impl FileFilter for ExtensionFilter {
    fn should_process(&self, path: &Utf8Path) -> bool {
        path.extension()
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

/// Rejects paths inside directories with the given names.
///
/// The default skips version-control metadata (`.git`).
///
/// # Examples
///
/// ```
/// use lintit_watcher::{FileFilter, SkipDirsFilter};
/// use camino::Utf8Path;
///
/// let filter = SkipDirsFilter::default();
/// assert!(!filter.should_process(Utf8Path::new("/ws/.git/index.c")));
/// assert!(filter.should_process(Utf8Path::new("/ws/src/main.c")));
/// ```
#[derive(Debug, Clone)]
pub struct SkipDirsFilter {
    names: SmallVec<[String; 4]>,
}

impl SkipDirsFilter {
    /// Creates a filter skipping the named directories.
    #[must_use]
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().copied().map(str::to_owned).collect(),
        }
    }
}

impl Default for SkipDirsFilter {
    fn default() -> Self {
        Self::new(&[".git"])
    }
}

impl FileFilter for SkipDirsFilter {
    fn should_process(&self, path: &Utf8Path) -> bool {
        let Some(parent) = path.parent() else {
            return true;
        };
        !parent
            .components()
            .any(|component| self.names.iter().any(|name| name == component.as_str()))
    }
}

/// A composite filter that combines multiple filters with AND logic.
///
/// # Examples
///
/// ```
/// use lintit_watcher::{CompositeFilter, ExtensionFilter, FileFilter, SkipDirsFilter};
/// use camino::Utf8Path;
///
/// let filter = CompositeFilter::new()
///     .and(ExtensionFilter::new(&[".c"]))
///     .and(SkipDirsFilter::new(&["build"]));
///
/// assert!(filter.should_process(Utf8Path::new("src/app.c")));
/// assert!(!filter.should_process(Utf8Path::new("build/gen.c")));
/// ```
pub struct CompositeFilter {
    filters: Vec<Box<dyn FileFilter>>,
}

impl CompositeFilter {
    /// Creates a new empty composite filter, which accepts all files.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Adds a filter to the composite.
    #[must_use]
    pub fn and<F: FileFilter>(mut self, filter: F) -> Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl Default for CompositeFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CompositeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeFilter")
            .field("filters", &self.filters.len())
            .finish()
    }
}

impl FileFilter for CompositeFilter {
    fn should_process(&self, path: &Utf8Path) -> bool {
        self.filters.iter().all(|f| f.should_process(path))
    }
}

impl<F: FileFilter + ?Sized> FileFilter for Box<F> {
    fn should_process(&self, path: &Utf8Path) -> bool {
        (**self).should_process(path)
    }
}

impl<F: FileFilter + ?Sized> FileFilter for std::sync::Arc<F> {
    fn should_process(&self, path: &Utf8Path) -> bool {
        (**self).should_process(path)
    }
}
