//! Fan-in of per-file results.
//!
//! [`DiagnosticAggregator`] collects the outcome of every pipeline of a scan
//! into a single [`ScanReport`].

use camino::{Utf8Path, Utf8PathBuf};
use lintit_core::DiagnosticMap;
use serde::Serialize;

use crate::error::LintError;
use crate::parser::ParsedOutput;
use crate::stats::ScanSummary;

/// Output lines reported by the tool for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// The file that was linted.
    pub file: Utf8PathBuf,
    /// Non-blank, non-separator lines in output order.
    pub lines: Vec<String>,
}

/// A pipeline that produced no output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchFailure {
    /// The file whose pipeline failed.
    pub file: Utf8PathBuf,
    /// Human-readable cause.
    pub message: String,
}

/// Everything one scan produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Findings keyed by file. Every requested file has an entry.
    pub diagnostics: DiagnosticMap,
    /// Reported output lines per successfully linted file, in request order.
    pub files: Vec<FileReport>,
    /// Pipelines that could not run.
    pub failures: Vec<LaunchFailure>,
    /// Counters.
    pub summary: ScanSummary,
}

/// Merges per-file pipeline results.
///
/// Lists for a file that several pipelines report on are concatenated in the
/// order the results are recorded, so no finding is lost.
///
/// # Examples
///
/// ```
/// use lintit_engine::{DiagnosticAggregator, ParsedOutput};
/// use camino::Utf8Path;
///
/// let mut aggregator = DiagnosticAggregator::new();
/// aggregator.seed(Utf8Path::new("/ws/a.c"));
/// aggregator.seed(Utf8Path::new("/ws/b.c"));
/// aggregator.record(Utf8Path::new("/ws/a.c"), Ok(ParsedOutput::default()));
///
/// let report = aggregator.finish();
/// assert_eq!(report.diagnostics.len(), 2);
/// assert_eq!(report.summary.files, 1);
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticAggregator {
    report: ScanReport,
}

impl DiagnosticAggregator {
    /// Creates an empty aggregator.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures a requested file has an entry, even if it yields nothing.
    pub fn seed(&mut self, file: &Utf8Path) {
        self.report.diagnostics.seed(file);
    }

    /// Records the result of one file's pipeline.
    ///
    /// Recording does not seed `file`; a failed pipeline leaves only what
    /// [`seed`](Self::seed) put there.
    pub fn record(&mut self, file: &Utf8Path, result: Result<ParsedOutput, LintError>) {
        match result {
            Ok(parsed) => {
                let summary = &mut self.report.summary;
                summary.files += 1;
                summary.diagnostics += parsed.diagnostics.len() as u64;
                summary.reported_lines += parsed.reported_lines.len() as u64;

                for diagnostic in parsed.diagnostics {
                    self.report.diagnostics.push(diagnostic);
                }
                self.report.files.push(FileReport {
                    file: file.to_owned(),
                    lines: parsed.reported_lines,
                });
            }
            Err(err) => {
                self.report.summary.launch_failures += 1;
                self.report.failures.push(LaunchFailure {
                    file: file.to_owned(),
                    message: err.to_string(),
                });
            }
        }
    }

    /// Merges a whole diagnostic map, concatenating shared keys.
    pub fn merge(&mut self, diagnostics: DiagnosticMap) {
        self.report.summary.diagnostics += diagnostics.diagnostic_count() as u64;
        self.report.diagnostics.merge(diagnostics);
    }

    /// Returns the combined report.
    #[must_use]
    pub fn finish(self) -> ScanReport {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintit_core::{Diagnostic, SeverityKeyword};
    use std::io;

    fn diagnostic(file: &str, line: u32) -> Diagnostic {
        Diagnostic::new(
            Utf8PathBuf::from(file),
            line,
            SeverityKeyword::Warning,
            line,
            format!("Warning {line}: x"),
        )
    }

    fn parsed(diagnostics: Vec<Diagnostic>) -> ParsedOutput {
        let reported_lines = diagnostics.iter().map(ToString::to_string).collect();
        ParsedOutput {
            diagnostics,
            reported_lines,
        }
    }

    #[test]
    fn test_merge_concatenates() {
        let d1 = diagnostic("/ws/a.c", 1);
        let d2 = diagnostic("/ws/a.c", 2);

        let mut aggregator = DiagnosticAggregator::new();
        aggregator.merge(std::iter::once(d1.clone()).collect());
        aggregator.merge(std::iter::once(d2.clone()).collect());

        let report = aggregator.finish();
        assert_eq!(report.diagnostics.get(Utf8Path::new("/ws/a.c")), Some(&[d1, d2][..]));
        assert_eq!(report.summary.diagnostics, 2);
    }

    #[test]
    fn test_shared_header_findings_from_two_runs() {
        let mut aggregator = DiagnosticAggregator::new();
        aggregator.seed(Utf8Path::new("/ws/a.c"));
        aggregator.seed(Utf8Path::new("/ws/b.c"));
        aggregator.record(
            Utf8Path::new("/ws/a.c"),
            Ok(parsed(vec![diagnostic("/ws/common.h", 3), diagnostic("/ws/a.c", 9)])),
        );
        aggregator.record(
            Utf8Path::new("/ws/b.c"),
            Ok(parsed(vec![diagnostic("/ws/common.h", 4)])),
        );

        let report = aggregator.finish();
        let header: Vec<u32> = report
            .diagnostics
            .get(Utf8Path::new("/ws/common.h"))
            .unwrap()
            .iter()
            .map(|d| d.line)
            .collect();

        assert_eq!(header, vec![3, 4]);
        assert_eq!(report.diagnostics.get(Utf8Path::new("/ws/b.c")), Some(&[][..]));
        assert_eq!(report.diagnostics.len(), 3);
        assert_eq!(report.summary.files, 2);
        assert_eq!(report.summary.diagnostics, 3);
        assert_eq!(report.summary.reported_lines, 3);
        assert_eq!(report.files.len(), 2);
    }

    #[test]
    fn test_failure_keeps_seeded_entry() {
        let mut aggregator = DiagnosticAggregator::new();
        aggregator.seed(Utf8Path::new("/ws/a.c"));
        aggregator.record(
            Utf8Path::new("/ws/a.c"),
            Err(LintError::launch(
                "/ws/a.c",
                "lint-nt",
                io::Error::from(io::ErrorKind::NotFound),
            )),
        );

        let report = aggregator.finish();
        assert_eq!(report.diagnostics.get(Utf8Path::new("/ws/a.c")), Some(&[][..]));
        assert_eq!(report.summary.launch_failures, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].message.contains("lint-nt"));
        assert!(report.files.is_empty());
    }

    #[test]
    fn test_record_without_seed() {
        let mut aggregator = DiagnosticAggregator::new();
        aggregator.record(Utf8Path::new("/ws"), Ok(parsed(Vec::new())));

        let report = aggregator.finish();
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.files[0].file, "/ws");
    }
}
