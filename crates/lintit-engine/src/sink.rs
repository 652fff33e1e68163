//! Destinations for scan results.
//!
//! The coordinator never keeps diagnostics itself; it hands them to a
//! [`DiagnosticSink`]. [`DiagnosticStore`] is the in-memory implementation
//! used by the CLI and tests.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use lintit_core::{Diagnostic, DiagnosticMap};
use parking_lot::{Mutex, RwLock};

/// Receives published diagnostics and user-visible notices.
pub trait DiagnosticSink: Send + Sync {
    /// Replaces the diagnostics shown for `file`.
    fn publish(&self, file: &Utf8Path, diagnostics: Vec<Diagnostic>);

    /// Removes the diagnostics shown for `file`.
    fn clear(&self, file: &Utf8Path);

    /// Removes every diagnostic.
    fn clear_all(&self);

    /// Shows a one-line notice.
    fn notice(&self, message: &str);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for Arc<T> {
    fn publish(&self, file: &Utf8Path, diagnostics: Vec<Diagnostic>) {
        (**self).publish(file, diagnostics);
    }

    fn clear(&self, file: &Utf8Path) {
        (**self).clear(file);
    }

    fn clear_all(&self) {
        (**self).clear_all();
    }

    fn notice(&self, message: &str) {
        (**self).notice(message);
    }
}

/// Thread-safe in-memory diagnostics collection.
///
/// # Examples
///
/// ```
/// use lintit_engine::{DiagnosticSink, DiagnosticStore};
/// use camino::Utf8Path;
///
/// let store = DiagnosticStore::new();
/// store.publish(Utf8Path::new("/ws/a.c"), Vec::new());
/// assert!(store.contains(Utf8Path::new("/ws/a.c")));
///
/// store.clear(Utf8Path::new("/ws/a.c"));
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticStore {
    diagnostics: RwLock<DiagnosticMap>,
    notices: Mutex<Vec<String>>,
}

impl DiagnosticStore {
    /// Creates an empty store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the diagnostics currently shown for `file`.
    #[must_use]
    pub fn get(&self, file: &Utf8Path) -> Option<Vec<Diagnostic>> {
        self.diagnostics.read().get(file).map(<[Diagnostic]>::to_vec)
    }

    /// Returns `true` if `file` has an entry.
    #[must_use]
    pub fn contains(&self, file: &Utf8Path) -> bool {
        self.diagnostics.read().contains(file)
    }

    /// Returns the number of files with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.read().len()
    }

    /// Returns `true` if no file has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.read().is_empty()
    }

    /// Returns the files with an entry, sorted.
    #[must_use]
    pub fn files(&self) -> Vec<Utf8PathBuf> {
        let mut files: Vec<_> = self.diagnostics.read().iter().map(|(path, _)| path.clone()).collect();
        files.sort();
        files
    }

    /// Returns a copy of every entry.
    #[must_use]
    pub fn snapshot(&self) -> DiagnosticMap {
        self.diagnostics.read().clone()
    }

    /// Returns the notices shown so far, oldest first.
    #[must_use]
    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().clone()
    }
}

impl DiagnosticSink for DiagnosticStore {
    fn publish(&self, file: &Utf8Path, diagnostics: Vec<Diagnostic>) {
        self.diagnostics.write().insert(file.to_owned(), diagnostics);
    }

    fn clear(&self, file: &Utf8Path) {
        self.diagnostics.write().remove(file);
    }

    fn clear_all(&self) {
        self.diagnostics.write().clear();
    }

    fn notice(&self, message: &str) {
        self.notices.lock().push(message.to_owned());
    }
}
