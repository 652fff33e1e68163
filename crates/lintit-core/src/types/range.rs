//! Line ranges addressed by diagnostics.

use serde::{Deserialize, Serialize};

/// A whole-line range within a source file.
///
/// # Field Conventions
///
/// - Lines are 0-indexed, as editors address them
/// - Both ends sit at column 0, so a range covers `start_line` up to the
///   start of `end_line`
///
/// # Examples
///
/// ```
/// use lintit_core::DiagnosticRange;
///
/// let range = DiagnosticRange::for_reported_line(42);
/// assert_eq!(range.start_line, 41);
/// assert_eq!(range.end_line, 42);
///
/// assert_eq!(DiagnosticRange::for_reported_line(0), DiagnosticRange::file_level());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiagnosticRange {
    /// First line covered (0-indexed).
    pub start_line: u32,

    /// Line at whose start the range ends (0-indexed, exclusive).
    pub end_line: u32,
}

impl DiagnosticRange {
    /// The range used for findings without a usable line: the first line.
    #[inline]
    #[must_use]
    pub const fn file_level() -> Self {
        Self {
            start_line: 0,
            end_line: 1,
        }
    }

    /// Builds the range for a 1-indexed line reported by the tool.
    ///
    /// Line 0 means "unknown line" and maps to [`file_level`](Self::file_level).
    #[inline]
    #[must_use]
    pub const fn for_reported_line(line: u32) -> Self {
        if line == 0 {
            return Self::file_level();
        }
        Self {
            start_line: line - 1,
            end_line: line,
        }
    }

    /// Returns `true` if this is the file-level range.
    #[inline]
    #[must_use]
    pub const fn is_file_level(self) -> bool {
        self.start_line == 0 && self.end_line == 1
    }
}

impl Default for DiagnosticRange {
    fn default() -> Self {
        Self::file_level()
    }
}
