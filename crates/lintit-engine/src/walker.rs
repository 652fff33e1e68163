//! Recursive traversal of source folders.
//!
//! This module provides [`SourceWalker`], which uses the `ignore` crate to
//! collect every regular file below a source folder.
//!
//! # Features
//!
//! - Descends into every sub-directory, hidden or ignored ones included
//! - Follows symbolic links; link loops are logged and skipped
//! - Converts paths to UTF-8 [`Utf8PathBuf`](camino::Utf8PathBuf); files with
//!   non-UTF-8 names are logged and skipped
//! - Yields files in a stable, name-sorted order
//!
//! # Examples
//!
//! ```no_run
//! use lintit_engine::SourceWalker;
//! use camino::Utf8Path;
//!
//! let walker = SourceWalker::new(Utf8Path::new("/ws/src"))?;
//! let sources = walker.collect_paths(|path| path.extension() == Some("c"))?;
//!
//! for path in &sources {
//!     println!("Found: {path}");
//! }
//! # Ok::<(), lintit_engine::LintError>(())
//! ```

use std::ffi::OsStr;

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use tracing::warn;

use crate::error::LintError;

/// A file walker over one source folder.
#[derive(Debug)]
pub struct SourceWalker {
    /// The root directory to walk.
    root: Utf8PathBuf,
}

impl SourceWalker {
    /// Creates a new walker for the given source folder.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::Config`] if the root path doesn't exist or
    /// isn't a directory.
    pub fn new(root: &Utf8Path) -> Result<Self, LintError> {
        if !root.exists() {
            return Err(LintError::config(format!(
                "source folder does not exist: {root}"
            )));
        }
        if !root.is_dir() {
            return Err(LintError::config(format!(
                "source folder is not a directory: {root}"
            )));
        }

        Ok(Self {
            root: root.to_owned(),
        })
    }

    /// Collects every regular file accepted by `accept`.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::Walk`] if directory traversal fails for a reason
    /// other than a symbolic link loop.
    pub fn collect_paths(
        &self,
        accept: impl Fn(&Utf8Path) -> bool,
    ) -> Result<Vec<Utf8PathBuf>, LintError> {
        let mut paths = Vec::new();

        for result in self.build_walker() {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) if is_loop(&err) => {
                    warn!(root = %self.root, error = %err, "skipping symbolic link loop");
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let Some(utf8_path) = Utf8Path::from_path(entry.path()) else {
                warn!(path = %entry.path().display(), "skipping file with non-UTF-8 name");
                continue;
            };

            if accept(utf8_path) {
                paths.push(utf8_path.to_owned());
            }
        }

        Ok(paths)
    }

    /// Builds the ignore walker with configured settings.
    fn build_walker(&self) -> ignore::Walk {
        WalkBuilder::new(&self.root)
            // Every sub-directory is a candidate, hidden or ignored
            .standard_filters(false)
            .follow_links(true)
            .sort_by_file_name(OsStr::cmp)
            .build()
    }
}

/// Returns `true` if the error, possibly wrapped, is a link loop.
fn is_loop(err: &ignore::Error) -> bool {
    match err {
        ignore::Error::Loop { .. } => true,
        ignore::Error::WithPath { err, .. }
        | ignore::Error::WithDepth { err, .. }
        | ignore::Error::WithLineNumber { err, .. } => is_loop(err),
        ignore::Error::Partial(errs) => !errs.is_empty() && errs.iter().all(is_loop),
        _ => false,
    }
}
