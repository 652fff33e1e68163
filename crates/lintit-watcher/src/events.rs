//! Batches of document events produced by the watcher.
//!
//! # Event Flow
//!
//! ```text
//! File System Change
//!        │
//!        ▼
//! notify-debouncer-mini (debounce window)
//!        │
//!        ▼
//! DocumentEvent per path (Saved if it exists, Closed if it vanished)
//!        │
//!        ▼
//! DocumentEventBatch sent via channel
//! ```

use std::time::Instant;

use camino::{Utf8Path, Utf8PathBuf};
use lintit_core::{DocumentEvent, DocumentEventKind};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Classifies a changed path as a document event.
///
/// A path that still exists was saved; a path that no longer exists was
/// closed (deleted or renamed away).
///
/// # Examples
///
/// ```
/// use lintit_watcher::classify;
/// use lintit_core::DocumentEventKind;
/// use camino::Utf8Path;
///
/// let event = classify(Utf8Path::new("/definitely/gone.c"));
/// assert_eq!(event.kind, DocumentEventKind::Closed);
/// ```
#[must_use]
pub fn classify(path: &Utf8Path) -> DocumentEvent {
    if path.exists() {
        DocumentEvent::saved(path)
    } else {
        DocumentEvent::closed(path)
    }
}

/// Document events delivered together by one debounce window.
///
/// Uses [`SmallVec`] with inline storage for up to 8 events, avoiding heap
/// allocation in the common case of a single saved file.
///
/// # Examples
///
/// ```
/// use lintit_watcher::DocumentEventBatch;
/// use lintit_core::DocumentEvent;
///
/// let mut batch = DocumentEventBatch::new();
/// batch.push(DocumentEvent::saved("/ws/src/a.c"));
/// batch.push(DocumentEvent::closed("/ws/src/b.c"));
///
/// assert_eq!(batch.len(), 2);
/// assert_eq!(batch.closed().count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DocumentEventBatch {
    /// The events in arrival order.
    pub events: SmallVec<[DocumentEvent; 8]>,

    /// When the batch was assembled.
    pub received_at: Instant,
}

impl DocumentEventBatch {
    /// Creates a new empty batch.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: SmallVec::new(),
            received_at: Instant::now(),
        }
    }

    /// Adds an event to the batch.
    #[inline]
    pub fn push(&mut self, event: DocumentEvent) {
        self.events.push(event);
    }

    /// Returns the number of events in this batch.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if the batch contains no events.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns an iterator over the events.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &DocumentEvent> {
        self.events.iter()
    }

    /// Returns an iterator over the close events.
    #[inline]
    pub fn closed(&self) -> impl Iterator<Item = &DocumentEvent> {
        self.events
            .iter()
            .filter(|e| e.kind == DocumentEventKind::Closed)
    }

    /// Returns the unique paths in this batch, sorted.
    #[must_use]
    pub fn unique_paths(&self) -> Vec<&Utf8PathBuf> {
        let mut paths: Vec<&Utf8PathBuf> = self.events.iter().map(|e| &e.path).collect();
        paths.sort();
        paths.dedup();
        paths
    }
}

impl Default for DocumentEventBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoIterator for DocumentEventBatch {
    type Item = DocumentEvent;
    type IntoIter = smallvec::IntoIter<[DocumentEvent; 8]>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a DocumentEventBatch {
    type Item = &'a DocumentEvent;
    type IntoIter = std::slice::Iter<'a, DocumentEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl FromIterator<DocumentEvent> for DocumentEventBatch {
    fn from_iter<T: IntoIterator<Item = DocumentEvent>>(iter: T) -> Self {
        Self {
            events: iter.into_iter().collect(),
            received_at: Instant::now(),
        }
    }
}

/// Summary statistics for a batch of events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBatchStats {
    /// Total number of events in the batch.
    pub total_events: usize,

    /// Number of files saved.
    pub saved: usize,

    /// Number of files that vanished.
    pub closed: usize,

    /// Number of unique files affected.
    pub unique_files: usize,
}

impl EventBatchStats {
    /// Computes statistics for a batch of events.
    #[must_use]
    pub fn from_batch(batch: &DocumentEventBatch) -> Self {
        let closed = batch.closed().count();
        Self {
            total_events: batch.len(),
            saved: batch.len() - closed,
            closed,
            unique_files: batch.unique_paths().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_existing_and_vanished() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let file = root.join("main.c");
        std::fs::write(&file, "int main(void) { return 0; }\n").unwrap();

        assert_eq!(classify(&file), DocumentEvent::saved(file.clone()));

        std::fs::remove_file(&file).unwrap();
        assert_eq!(classify(&file), DocumentEvent::closed(file.clone()));
    }

    #[test]
    fn test_batch_from_iterator_keeps_order() {
        let batch: DocumentEventBatch = [
            DocumentEvent::saved("/ws/b.c"),
            DocumentEvent::saved("/ws/a.c"),
        ]
        .into_iter()
        .collect();

        let paths: Vec<_> = batch.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/ws/b.c", "/ws/a.c"]);
    }

    #[test]
    fn test_unique_paths() {
        let mut batch = DocumentEventBatch::new();
        batch.push(DocumentEvent::saved("/ws/b.c"));
        batch.push(DocumentEvent::saved("/ws/a.c"));
        batch.push(DocumentEvent::closed("/ws/b.c"));

        let unique: Vec<_> = batch.unique_paths().iter().map(|p| p.as_str()).collect();
        assert_eq!(unique, vec!["/ws/a.c", "/ws/b.c"]);
    }

    #[test]
    fn test_event_batch_stats() {
        let batch: DocumentEventBatch = [
            DocumentEvent::saved("/ws/a.c"),
            DocumentEvent::saved("/ws/a.c"),
            DocumentEvent::closed("/ws/b.c"),
        ]
        .into_iter()
        .collect();

        let stats = EventBatchStats::from_batch(&batch);
        assert_eq!(
            stats,
            EventBatchStats {
                total_events: 3,
                saved: 2,
                closed: 1,
                unique_files: 2,
            }
        );
        assert_eq!(
            serde_json::to_string(&stats).unwrap(),
            r#"{"total_events":3,"saved":2,"closed":1,"unique_files":2}"#
        );
    }
}
