//! Lint-run orchestration for C projects.
//!
//! This crate decides which files an external static-analysis tool runs on,
//! builds its command lines, launches it, extracts diagnostics from its text
//! output and publishes them per file.
//!
//! # Overview
//!
//! The main entry point is [`ScanCoordinator`], which combines:
//!
//! - [`ConfigurationMatcher`]: Picks the configuration governing a file
//! - [`ArgumentBuilder`]: Turns a configuration into tool arguments
//! - [`ToolRunner`]: Launches the tool ([`ProcessRunner`] for real processes)
//! - [`OutputParser`]: Extracts diagnostics from the tool's output
//! - [`DiagnosticAggregator`]: Fans per-file results back into one report
//! - [`DiagnosticSink`]: Receives the published results
//!
//! # Example
//!
//! ```no_run
//! use lintit_core::{PathResolver, Settings};
//! use lintit_engine::{DiagnosticStore, ProcessRunner, ScanCoordinator};
//! use camino::Utf8Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let root = Utf8Path::new("/ws");
//! let settings = Settings::discover(root, None)?;
//! let coordinator = ScanCoordinator::new(
//!     settings,
//!     PathResolver::for_host(root),
//!     ProcessRunner,
//!     DiagnosticStore::new(),
//! );
//!
//! let report = coordinator.lint_source_folders().await?;
//! for file in &report.files {
//!     println!("Linting file {}:", file.file);
//!     for line in &file.lines {
//!         println!("    {line}");
//!     }
//! }
//! println!("Total lint warnings: {}", report.summary.reported_lines);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ScanCoordinator (triggers, scan scopes, sweep gate)
//!     │
//!     ├── ConfigurationMatcher (first matching source folder)
//!     │
//!     ├── SourceWalker (folder scans, ignore crate)
//!     │
//!     ├── per file, concurrently:
//!     │       │
//!     │       ├── ArgumentBuilder ──► ToolInvocation
//!     │       ├── ToolRunner (tokio::process)
//!     │       └── OutputParser ──► ParsedOutput
//!     │
//!     ├── DiagnosticAggregator ──► ScanReport
//!     │
//!     └── DiagnosticSink (publish / clear / notice)
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod aggregate;
mod args;
mod coordinator;
mod error;
mod invoker;
mod matcher;
mod parser;
mod sink;
mod stats;
mod walker;

pub use aggregate::{DiagnosticAggregator, FileReport, LaunchFailure, ScanReport};
pub use args::{ArgumentBuilder, FIXED_ARGUMENTS};
pub use coordinator::ScanCoordinator;
pub use error::LintError;
pub use invoker::{ProcessRunner, ToolInvocation, ToolRunner};
pub use matcher::ConfigurationMatcher;
pub use parser::{OutputParser, ParsedOutput};
pub use sink::{DiagnosticSink, DiagnosticStore};
pub use stats::ScanSummary;
pub use walker::SourceWalker;
