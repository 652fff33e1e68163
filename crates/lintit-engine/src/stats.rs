//! Per-scan statistics.
//!
//! There is no process-wide counter: every scan returns its own
//! [`ScanSummary`] and callers add them up.
//!
//! # Examples
//!
//! ```
//! use lintit_engine::ScanSummary;
//!
//! let first = ScanSummary { files: 2, diagnostics: 5, reported_lines: 6, launch_failures: 0 };
//! let second = ScanSummary { files: 1, diagnostics: 0, reported_lines: 0, launch_failures: 1 };
//!
//! let total: ScanSummary = [first, second].into_iter().sum();
//! assert_eq!(total.files, 3);
//! assert_eq!(total.launch_failures, 1);
//! ```

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Counters describing one completed scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Files whose tool run completed.
    pub files: u64,
    /// Diagnostics extracted from the output.
    pub diagnostics: u64,
    /// Non-blank, non-separator output lines (the tool's own finding count).
    pub reported_lines: u64,
    /// Files whose tool run could not be launched or read.
    pub launch_failures: u64,
}

impl ScanSummary {
    /// Returns the number of files the scan attempted.
    #[inline]
    #[must_use]
    pub const fn attempted(&self) -> u64 {
        self.files + self.launch_failures
    }

    /// Returns `true` if every attempted file ran.
    #[inline]
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.launch_failures == 0
    }

    /// Returns `true` if the scan touched no file at all.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.attempted() == 0
    }
}

impl Add for ScanSummary {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for ScanSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.files += rhs.files;
        self.diagnostics += rhs.diagnostics;
        self.reported_lines += rhs.reported_lines;
        self.launch_failures += rhs.launch_failures;
    }
}

impl Sum for ScanSummary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let summary = ScanSummary::default();
        assert!(summary.is_empty());
        assert!(summary.is_complete());
    }

    #[test]
    fn test_add_assign() {
        let mut total = ScanSummary {
            files: 1,
            diagnostics: 2,
            reported_lines: 3,
            launch_failures: 0,
        };
        total += ScanSummary {
            files: 0,
            diagnostics: 0,
            reported_lines: 0,
            launch_failures: 2,
        };

        assert_eq!(total.attempted(), 3);
        assert!(!total.is_complete());
        assert_eq!(total.reported_lines, 3);
    }

    #[test]
    fn test_summary_serialization() {
        let json = serde_json::to_string(&ScanSummary::default()).unwrap();
        assert_eq!(
            json,
            r#"{"files":0,"diagnostics":0,"reported_lines":0,"launch_failures":0}"#
        );
    }
}
