//! Extraction of diagnostics from tool output.
//!
//! The tool prints one finding per line in the format requested by
//! [`FIXED_ARGUMENTS`](crate::FIXED_ARGUMENTS):
//!
//! ```text
//! <file>(<line>): <Severity> <code>: <message>
//! ```
//!
//! Blank lines and `---` separator lines are skipped. Any other line that does
//! not follow the format is ignored, so one malformed line never affects the
//! rest of the stream.
//!
//! # Examples
//!
//! ```
//! use lintit_core::{PathResolver, PathStyle, Severity};
//! use lintit_engine::OutputParser;
//! use camino::Utf8Path;
//!
//! let resolver = PathResolver::new("C:\\ws", PathStyle::Windows);
//! let parsed = OutputParser::new(&resolver).parse(
//!     "--- Module: foo.c\r\nC:\\src\\foo.c(42): Warning 123: unused variable\r\n",
//!     Utf8Path::new("C:\\src\\foo.c"),
//! );
//!
//! assert_eq!(parsed.diagnostics.len(), 1);
//! assert_eq!(parsed.diagnostics[0].severity, Severity::Warning);
//! assert_eq!(parsed.reported_lines.len(), 1);
//! ```

use camino::Utf8Path;
use lintit_core::{Diagnostic, PathResolver, SeverityKeyword};
use serde::Serialize;
use tracing::trace;

/// Marker opening separator lines in tool output.
const RULE_MARKER: &str = "---";

/// Result of parsing one tool run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedOutput {
    /// Findings in output order.
    pub diagnostics: Vec<Diagnostic>,
    /// Every non-blank, non-separator line, verbatim.
    pub reported_lines: Vec<String>,
}

/// Stateless line parser for tool output.
#[derive(Debug, Clone, Copy)]
pub struct OutputParser<'a> {
    resolver: &'a PathResolver,
}

/// Fields of one output line, borrowed from it.
#[derive(Debug, PartialEq, Eq)]
struct RawRecord<'l> {
    file: &'l str,
    line: u32,
    word: &'l str,
    keyword: SeverityKeyword,
    code_text: &'l str,
    code: u32,
    text: &'l str,
}

impl<'a> OutputParser<'a> {
    /// Creates a parser canonicalizing reported paths with `resolver`.
    #[inline]
    #[must_use]
    pub const fn new(resolver: &'a PathResolver) -> Self {
        Self { resolver }
    }

    /// Parses the complete output of one run for `originating`.
    ///
    /// Lines end at `\n` or `\r\n`.
    #[must_use]
    pub fn parse(&self, output: &str, originating: &Utf8Path) -> ParsedOutput {
        let mut parsed = ParsedOutput::default();

        for line in output.lines() {
            if line.trim().is_empty() || line.starts_with(RULE_MARKER) {
                continue;
            }

            parsed.reported_lines.push(line.to_owned());
            match self.parse_line(line, originating) {
                Some(diagnostic) => parsed.diagnostics.push(diagnostic),
                None => trace!(line, "discarding non-diagnostic output line"),
            }
        }

        parsed
    }

    /// Parses a single line, returning `None` if it is not a finding.
    ///
    /// A finding whose file field is empty or a bare root is attributed to
    /// `originating`.
    #[must_use]
    pub fn parse_line(&self, line: &str, originating: &Utf8Path) -> Option<Diagnostic> {
        let record = split_record(line)?;
        let file = self
            .resolver
            .resolve_reported(record.file)
            .unwrap_or_else(|| originating.to_owned());

        Some(Diagnostic::new(
            file,
            record.line,
            record.keyword,
            record.code,
            format!("{} {}: {}", record.word, record.code_text, record.text),
        ))
    }
}

/// Splits a line into its fields.
///
/// The file field may itself contain parentheses, so candidate `(` positions
/// are tried from the right and the first one that parses wins.
fn split_record(line: &str) -> Option<RawRecord<'_>> {
    line.rmatch_indices('(').find_map(|(open, _)| {
        let file = &line[..open];
        let tail = &line[open + 1..];

        let (line_text, rest) = tail.split_once("): ")?;
        let line_number = parse_number(line_text)?;

        let (word, rest) = rest.split_once(' ')?;
        let keyword = SeverityKeyword::parse(word)?;

        let (code_text, text) = rest.split_once(": ")?;
        let code = parse_number(code_text)?;

        Some(RawRecord {
            file,
            line: line_number,
            word,
            keyword,
            code_text,
            code,
            text,
        })
    })
}

/// Parses a non-empty run of ASCII digits.
fn parse_number(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
