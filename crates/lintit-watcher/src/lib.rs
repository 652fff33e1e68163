//! Debounced workspace watcher producing document events.
//!
//! This crate detects file changes via the `notify` crate, debounces them
//! through `notify-debouncer-mini`, and streams them to a tokio context as
//! [`DocumentEvent`](lintit_core::DocumentEvent)s that the scan coordinator
//! understands.
//!
//! # Overview
//!
//! - A changed file that still exists becomes a `Saved` event
//! - A file that vanished becomes a `Closed` event
//! - Events are filtered at the source by a [`FileFilter`], normally an
//!   [`ExtensionFilter`] built from the lint settings
//! - One [`DocumentEventBatch`] is delivered per debounce window
//!
//! # Crate Dependencies
//!
//! ```text
//! lintit-cli ──► lintit-engine ──► lintit-core
//!            └─► lintit-watcher ──────►
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use lintit_watcher::{CompositeFilter, ExtensionFilter, FileWatcher, SkipDirsFilter};
//! use lintit_core::Settings;
//! use camino::Utf8Path;
//! use tokio::signal;
//!
//! # async fn example() -> Result<(), lintit_watcher::WatchError> {
//! let settings = Settings::default();
//! let filter = CompositeFilter::new()
//!     .and(ExtensionFilter::for_settings(&settings))
//!     .and(SkipDirsFilter::default());
//!
//! let mut watcher = FileWatcher::new(Utf8Path::new("/ws"), &settings.watch, filter).await?;
//!
//! loop {
//!     tokio::select! {
//!         Some(batch) = watcher.recv() => {
//!             for event in batch {
//!                 println!("{event}");
//!             }
//!         }
//!         _ = signal::ctrl_c() => break,
//!     }
//! }
//!
//! watcher.shutdown().await
//! # }
//! ```
//!
//! # Performance Considerations
//!
//! - **Debouncing**: The debounce window (100ms by default) coalesces the
//!   bursts of writes editors produce on save.
//! - **Filtering at Source**: Events are filtered in the blocking thread
//!   before being sent to the channel.
//! - **Bounded Channel**: The channel holds 100 batches by default.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod events;
pub mod filter;
pub mod watcher;

pub use error::WatchError;
pub use events::{DocumentEventBatch, EventBatchStats, classify};
pub use filter::{AcceptAllFilter, CompositeFilter, ExtensionFilter, FileFilter, SkipDirsFilter};
pub use watcher::FileWatcher;
