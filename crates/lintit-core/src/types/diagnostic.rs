//! Findings reported by the analysis tool.

use std::fmt;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use super::range::DiagnosticRange;

/// How serious a finding is.
///
/// # Examples
///
/// ```
/// use lintit_core::{Severity, SeverityKeyword};
///
/// assert_eq!(SeverityKeyword::Error.severity(), Severity::Error);
/// assert_eq!(SeverityKeyword::Supplemental.severity(), Severity::Information);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// A defect the tool is certain about.
    Error,
    /// A probable defect.
    Warning,
    /// Notes, informational messages and supplemental context.
    Information,
}

impl Severity {
    /// Returns a short lowercase label for display.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Information => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The severity word printed by the tool.
///
/// This is a closed set; any other word makes the line a non-diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityKeyword {
    /// `Error`
    Error,
    /// `Warning`
    Warning,
    /// `Notice`
    Notice,
    /// `Note`
    Note,
    /// `Info`
    Info,
    /// `Supplemental`
    Supplemental,
}

impl SeverityKeyword {
    /// Every keyword, in the order the tool documents them.
    pub const ALL: [Self; 6] = [
        Self::Error,
        Self::Warning,
        Self::Notice,
        Self::Note,
        Self::Info,
        Self::Supplemental,
    ];

    /// Matches a word case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use lintit_core::SeverityKeyword;
    ///
    /// assert_eq!(SeverityKeyword::parse("WARNING"), Some(SeverityKeyword::Warning));
    /// assert_eq!(SeverityKeyword::parse("Fatal"), None);
    /// ```
    #[must_use]
    pub fn parse(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|keyword| keyword.as_str().eq_ignore_ascii_case(word))
    }

    /// Returns the canonical spelling.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
            Self::Notice => "Notice",
            Self::Note => "Note",
            Self::Info => "Info",
            Self::Supplemental => "Supplemental",
        }
    }

    /// Collapses the keyword onto a [`Severity`].
    #[inline]
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::Error => Severity::Error,
            Self::Warning => Severity::Warning,
            Self::Notice | Self::Note | Self::Info | Self::Supplemental => Severity::Information,
        }
    }
}

/// One finding from one line of tool output.
///
/// # Examples
///
/// ```
/// use lintit_core::{Diagnostic, Severity, SeverityKeyword};
/// use camino::Utf8PathBuf;
///
/// let diagnostic = Diagnostic::new(
///     Utf8PathBuf::from("/ws/main.c"),
///     12,
///     SeverityKeyword::Note,
///     960,
///     "Note 960: Violates MISRA",
/// );
/// assert_eq!(diagnostic.severity, Severity::Information);
/// assert_eq!(diagnostic.range.start_line, 11);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// File the finding belongs to.
    pub file: Utf8PathBuf,

    /// Reported line (1-indexed, 0 when the tool gave no line).
    pub line: u32,

    /// Collapsed severity.
    pub severity: Severity,

    /// Severity word as classified from the output.
    pub keyword: SeverityKeyword,

    /// Tool message number.
    pub code: u32,

    /// Display message: `"<severity word> <code>: <text>"`.
    pub message: String,

    /// Range the finding covers.
    pub range: DiagnosticRange,
}

impl Diagnostic {
    /// Creates a diagnostic, deriving severity and range from the keyword and line.
    #[must_use]
    pub fn new(
        file: Utf8PathBuf,
        line: u32,
        keyword: SeverityKeyword,
        code: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file,
            line,
            severity: keyword.severity(),
            keyword,
            code,
            message: message.into(),
            range: DiagnosticRange::for_reported_line(line),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}: {}", self.file, self.line, self.severity, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_parse_is_case_insensitive() {
        for keyword in SeverityKeyword::ALL {
            assert_eq!(SeverityKeyword::parse(keyword.as_str()), Some(keyword));
            assert_eq!(
                SeverityKeyword::parse(&keyword.as_str().to_lowercase()),
                Some(keyword)
            );
            assert_eq!(
                SeverityKeyword::parse(&keyword.as_str().to_uppercase()),
                Some(keyword)
            );
        }
    }

    #[test]
    fn test_keyword_parse_rejects_partial_words() {
        assert_eq!(SeverityKeyword::parse("Err"), None);
        assert_eq!(SeverityKeyword::parse("Notes"), None);
        assert_eq!(SeverityKeyword::parse(""), None);
    }

    #[test]
    fn test_keyword_severity_collapse() {
        assert_eq!(SeverityKeyword::Error.severity(), Severity::Error);
        assert_eq!(SeverityKeyword::Warning.severity(), Severity::Warning);
        assert_eq!(SeverityKeyword::Notice.severity(), Severity::Information);
        assert_eq!(SeverityKeyword::Note.severity(), Severity::Information);
        assert_eq!(SeverityKeyword::Info.severity(), Severity::Information);
        assert_eq!(SeverityKeyword::Supplemental.severity(), Severity::Information);
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic::new(
            Utf8PathBuf::from("/ws/a.c"),
            7,
            SeverityKeyword::Error,
            10,
            "Error 10: Expecting ';'",
        );
        assert_eq!(diagnostic.to_string(), "/ws/a.c:7: error: Error 10: Expecting ';'");
    }

    #[test]
    fn test_diagnostic_line_zero_is_file_level() {
        let diagnostic = Diagnostic::new(
            Utf8PathBuf::from("/ws/a.c"),
            0,
            SeverityKeyword::Info,
            766,
            "Info 766: Header file not used",
        );
        assert!(diagnostic.range.is_file_level());
    }

    #[test]
    fn test_severity_serialization() {
        assert_eq!(
            serde_json::to_string(&Severity::Information).unwrap(),
            r#""information""#
        );
    }
}
