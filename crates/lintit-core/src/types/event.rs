//! Document lifecycle events that trigger scans.

use std::fmt;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// What happened to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentEventKind {
    /// The document was opened (or is open at start-up).
    Opened,
    /// The document was saved.
    Saved,
    /// The document was closed.
    Closed,
}

impl fmt::Display for DocumentEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Opened => "opened",
            Self::Saved => "saved",
            Self::Closed => "closed",
        })
    }
}

/// A document event delivered by an editor or the file watcher.
///
/// # Examples
///
/// ```
/// use lintit_core::{DocumentEvent, DocumentEventKind};
///
/// let event = DocumentEvent::saved("/ws/src/main.c");
/// assert_eq!(event.kind, DocumentEventKind::Saved);
/// assert_eq!(event.to_string(), "saved /ws/src/main.c");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentEvent {
    /// What happened.
    pub kind: DocumentEventKind,
    /// The document, as named by the editor (may carry a `.git` suffix).
    pub path: Utf8PathBuf,
}

impl DocumentEvent {
    /// Creates an event.
    #[inline]
    pub fn new(kind: DocumentEventKind, path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    /// Creates an [`Opened`](DocumentEventKind::Opened) event.
    #[inline]
    pub fn opened(path: impl Into<Utf8PathBuf>) -> Self {
        Self::new(DocumentEventKind::Opened, path)
    }

    /// Creates a [`Saved`](DocumentEventKind::Saved) event.
    #[inline]
    pub fn saved(path: impl Into<Utf8PathBuf>) -> Self {
        Self::new(DocumentEventKind::Saved, path)
    }

    /// Creates a [`Closed`](DocumentEventKind::Closed) event.
    #[inline]
    pub fn closed(path: impl Into<Utf8PathBuf>) -> Self {
        Self::new(DocumentEventKind::Closed, path)
    }
}

impl fmt::Display for DocumentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(DocumentEvent::opened("a.c").kind, DocumentEventKind::Opened);
        assert_eq!(DocumentEvent::saved("a.c").kind, DocumentEventKind::Saved);
        assert_eq!(DocumentEvent::closed("a.c").kind, DocumentEventKind::Closed);
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_string(&DocumentEvent::closed("/ws/a.c")).unwrap();
        assert_eq!(json, r#"{"kind":"closed","path":"/ws/a.c"}"#);
    }
}
