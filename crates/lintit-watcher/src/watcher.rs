//! Workspace watcher with async event streaming.
//!
//! This module provides the [`FileWatcher`] type that bridges the synchronous
//! `notify` file watching crate to the async tokio runtime.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Blocking Thread (spawn_blocking)             │
//! │  ┌──────────────────┐    ┌────────────────┐    ┌────────────┐  │
//! │  │ RecommendedWatcher│ -> │ Debouncer      │ -> │ Callback   │  │
//! │  │ (notify)         │    │ (debounce_ms)  │    │ (filter,   │  │
//! │  │                  │    │                │    │  classify) │  │
//! │  └──────────────────┘    └────────────────┘    └─────┬──────┘  │
//! └──────────────────────────────────────────────────────│─────────┘
//!                                                        │
//!                                          blocking_send │
//!                                                        ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Async Runtime (tokio)                        │
//! │  ┌──────────────────┐    ┌────────────────┐                     │
//! │  │ FileWatcher      │    │ mpsc::Receiver │ -> ScanCoordinator  │
//! │  │ (shutdown ctrl)  │    │ (batches)      │                     │
//! │  └──────────────────┘    └────────────────┘                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use notify::RecursiveMode;
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use lintit_core::WatchConfig;

use crate::error::WatchError;
use crate::events::{DocumentEventBatch, classify};
use crate::filter::FileFilter;

/// Default channel capacity, in batches.
const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// A workspace watcher that streams document events to an async context.
///
/// # Lifecycle
///
/// 1. **Creation**: `FileWatcher::new()` validates the path, creates channels,
///    and spawns a blocking task with the notify watcher.
///
/// 2. **Event Reception**: `recv()` yields one [`DocumentEventBatch`] per
///    debounce window, already filtered.
///
/// 3. **Shutdown**: Call `shutdown()` for graceful shutdown, or drop the
///    watcher, which signals the task without awaiting it.
///
/// # Examples
///
/// ```no_run
/// use lintit_watcher::{ExtensionFilter, FileWatcher};
/// use lintit_core::Settings;
/// use camino::Utf8Path;
///
/// # async fn example() -> Result<(), lintit_watcher::WatchError> {
/// let settings = Settings::default();
/// let mut watcher = FileWatcher::new(
///     Utf8Path::new("/ws"),
///     &settings.watch,
///     ExtensionFilter::for_settings(&settings),
/// )
/// .await?;
///
/// while let Some(batch) = watcher.recv().await {
///     for event in &batch {
///         println!("{event}");
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct FileWatcher {
    /// Shutdown signal sender. `None` once shutdown is initiated.
    shutdown_tx: Option<oneshot::Sender<()>>,

    /// Handle to the blocking watcher task.
    task_handle: Option<JoinHandle<Result<(), WatchError>>>,

    /// Event receiver for async consumption.
    event_rx: mpsc::Receiver<DocumentEventBatch>,

    /// The canonical path being watched.
    watch_path: Utf8PathBuf,
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("watch_path", &self.watch_path)
            .field(
                "finished",
                &self.task_handle.as_ref().is_none_or(JoinHandle::is_finished),
            )
            .finish_non_exhaustive()
    }
}

impl FileWatcher {
    /// Starts watching `path`.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::PathNotFound`] if the path doesn't exist and
    /// [`WatchError::Io`] if it cannot be canonicalized.
    #[allow(clippy::unused_async)] // Async for API consistency with shutdown()
    pub async fn new<F: FileFilter>(
        path: &Utf8Path,
        config: &WatchConfig,
        filter: F,
    ) -> Result<Self, WatchError> {
        if !path.exists() {
            return Err(WatchError::path_not_found(path));
        }

        let watch_path = path.canonicalize_utf8()?;

        let (event_tx, event_rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task_path = watch_path.clone();
        let config = *config;

        let task_handle = tokio::task::spawn_blocking(move || {
            run_watcher_loop(&task_path, config, event_tx, shutdown_rx, filter)
        });

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            task_handle: Some(task_handle),
            event_rx,
            watch_path,
        })
    }

    /// Receives the next batch of events.
    ///
    /// Returns `None` when the watcher has been shut down.
    pub async fn recv(&mut self) -> Option<DocumentEventBatch> {
        self.event_rx.recv().await
    }

    /// Returns the canonical path being watched.
    #[must_use]
    pub fn watch_path(&self) -> &Utf8Path {
        &self.watch_path
    }

    /// Stops the watcher and waits for its thread to finish.
    ///
    /// # Errors
    ///
    /// Returns the error the watcher thread stopped with, or
    /// [`WatchError::ChannelClosed`] if the thread panicked.
    pub async fn shutdown(mut self) -> Result<(), WatchError> {
        if let Some(tx) = self.shutdown_tx.take() {
            // Ignore error if receiver is already dropped
            let _ = tx.send(());
        }

        if let Some(handle) = self.task_handle.take() {
            match handle.await {
                Ok(result) => result?,
                Err(_join_error) => return Err(WatchError::ChannelClosed),
            }
        }

        Ok(())
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Turns the paths of one debounce window into a filtered batch.
fn collect_batch<F: FileFilter>(
    paths: impl IntoIterator<Item = PathBuf>,
    filter: &F,
) -> DocumentEventBatch {
    let mut batch = DocumentEventBatch::new();

    for path in paths {
        let path = match Utf8PathBuf::try_from(path) {
            Ok(path) => path,
            Err(err) => {
                let err = WatchError::non_utf8_path(err.into_path_buf());
                warn!(error = %err, "skipping file event");
                continue;
            }
        };

        if path.is_dir() || !filter.should_process(&path) {
            trace!(path = %path, "filtered out file event");
            continue;
        }

        batch.push(classify(&path));
    }

    batch
}

/// Runs the notify watcher loop in a blocking context.
fn run_watcher_loop<F: FileFilter>(
    path: &Utf8Path,
    config: WatchConfig,
    event_tx: mpsc::Sender<DocumentEventBatch>,
    shutdown_rx: oneshot::Receiver<()>,
    filter: F,
) -> Result<(), WatchError> {
    let timeout = Duration::from_millis(config.debounce_ms);

    let mut debouncer: Debouncer<notify::RecommendedWatcher> =
        new_debouncer(timeout, move |res: DebounceEventResult| match res {
            Ok(events) => {
                let batch = collect_batch(events.into_iter().map(|event| event.path), &filter);
                if batch.is_empty() {
                    return;
                }
                debug!(events = batch.len(), "forwarding document events");
                if event_tx.blocking_send(batch).is_err() {
                    debug!("event channel closed, dropping batch");
                }
            }
            Err(error) => warn!(error = %error, "debouncer error"),
        })?;

    let mode = if config.recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };
    debouncer.watcher().watch(path.as_std_path(), mode)?;

    info!(path = %path, recursive = config.recursive, "file watcher started");

    // Block until shutdown signal is received
    let _ = shutdown_rx.blocking_recv();

    info!(path = %path, "file watcher stopped");

    Ok(())
}
