//! CLI entry point for lintit.
//!
//! This binary runs an external static-analysis tool over a C workspace and
//! reports the findings it prints, either once or continuously while files
//! change.
//!
//! # Usage
//!
//! ```bash
//! lintit [OPTIONS] <COMMAND>
//!
//! # Lint every file below the configured source folders
//! lintit --workspace /path/to/project lint
//!
//! # Lint a few files as if they were open in an editor
//! lintit check src/main.c src/uart.c
//!
//! # Re-lint files as they are saved
//! lintit watch
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{WrapErr, eyre};
use lintit_core::{
    Diagnostic, DiagnosticMap, DocumentEventKind, PathResolver, Settings, TriggerMode,
};
use lintit_engine::{
    DiagnosticSink, DiagnosticStore, ProcessRunner, ScanCoordinator, ScanReport, ScanSummary,
    ToolRunner,
};
use lintit_watcher::{
    CompositeFilter, DocumentEventBatch, EventBatchStats, ExtensionFilter, FileWatcher,
    SkipDirsFilter,
};
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Runs a static-analysis tool over C sources and reports its findings.
#[derive(Parser)]
#[command(name = "lintit", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Workspace root, substituted for `${workspaceFolder}`.
    ///
    /// Defaults to the current directory.
    #[arg(short, long, global = true, env = "LINTIT_WORKSPACE")]
    workspace: Option<Utf8PathBuf>,

    /// Settings file.
    ///
    /// Defaults to `.lintit.json` in the workspace root, if present.
    #[arg(short, long, global = true, env = "LINTIT_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Analysis tool executable (overrides the settings file).
    #[arg(long, global = true, env = "LINTIT_TOOL")]
    tool: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Lint every file below the configured source folders.
    Lint {
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Output file (defaults to stdout).
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },

    /// Lint the given files as open documents.
    Check {
        /// Files to lint.
        #[arg(required = true)]
        files: Vec<Utf8PathBuf>,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Lint files once, then again whenever they change.
    Watch {
        /// Files to treat as open (defaults to every lintable source file).
        files: Vec<Utf8PathBuf>,
    },
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable text.
    Text,
    /// JSON format.
    Json,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
/// Logs go to stderr so that reports on stdout can be piped.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},notify=warn"))
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// A resolved workspace and its settings.
struct Workspace {
    root: Utf8PathBuf,
    settings: Settings,
}

impl Workspace {
    /// Resolves the workspace root and loads its settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is not a directory or the settings are
    /// missing or invalid.
    fn load(cli: &Cli) -> color_eyre::Result<Self> {
        let root = cli
            .workspace
            .clone()
            .unwrap_or_else(|| Utf8PathBuf::from("."));

        if !root.exists() {
            return Err(eyre!("Workspace does not exist: {root}"));
        }
        if !root.is_dir() {
            return Err(eyre!("Workspace is not a directory: {root}"));
        }
        let root = root
            .canonicalize_utf8()
            .wrap_err_with(|| format!("Cannot resolve workspace {root}"))?;

        let mut settings = Settings::discover(&root, cli.config.as_deref())?;
        if let Some(tool) = &cli.tool {
            settings.tool_location.clone_from(tool);
            settings.validate()?;
        }

        info!(
            workspace = %root,
            mode = ?settings.trigger_mode(),
            configurations = settings.configurations.len(),
            "Workspace loaded"
        );
        Ok(Self { root, settings })
    }

    /// Builds a coordinator publishing to `sink`.
    fn coordinator<S: DiagnosticSink>(self, sink: S) -> ScanCoordinator<ProcessRunner, S> {
        ScanCoordinator::new(
            self.settings,
            PathResolver::for_host(self.root),
            ProcessRunner,
            sink,
        )
    }
}

/// Makes document paths absolute, resolving symbolic links where possible.
fn resolve_documents(files: &[Utf8PathBuf]) -> color_eyre::Result<Vec<Utf8PathBuf>> {
    let cwd = Utf8PathBuf::try_from(std::env::current_dir()?)?;

    Ok(files
        .iter()
        .map(|file| {
            let absolute = if file.is_absolute() {
                file.clone()
            } else {
                cwd.join(file)
            };
            absolute.canonicalize_utf8().unwrap_or(absolute)
        })
        .collect())
}

// =============================================================================
// SINKS
// =============================================================================

/// Prints findings as they are published.
#[derive(Debug, Default)]
struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn publish(&self, file: &Utf8Path, diagnostics: Vec<Diagnostic>) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();

        if diagnostics.is_empty() {
            let _ = writeln!(handle, "{file}: no findings");
        }
        for diagnostic in &diagnostics {
            let _ = writeln!(handle, "{diagnostic}");
        }
    }

    fn clear(&self, file: &Utf8Path) {
        debug!(%file, "Cleared diagnostics");
    }

    fn clear_all(&self) {
        debug!("Cleared all diagnostics");
    }

    fn notice(&self, message: &str) {
        let stderr = std::io::stderr();
        let _ = writeln!(stderr.lock(), "{message}");
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Lints every source folder and writes the folder report.
///
/// # Errors
///
/// Returns an error if a source folder cannot be walked or the report
/// cannot be written.
async fn run_lint(
    workspace: Workspace,
    format: OutputFormat,
    output: Option<&Utf8Path>,
) -> color_eyre::Result<()> {
    let legacy = workspace.settings.legacy_mode;
    // Folder scans publish nothing, so the console only shows notices.
    let coordinator = workspace.coordinator(ConsoleSink);

    let report = coordinator.lint_source_folders().await?;

    let content = match format {
        OutputFormat::Text => render_folder_report(&report, legacy),
        OutputFormat::Json => to_json(&report)?,
    };
    write_output(&content, output)
}

/// Lints the given files once and prints what the editor would show.
///
/// # Errors
///
/// Returns an error if the paths cannot be resolved or output fails.
async fn run_check(
    workspace: Workspace,
    files: &[Utf8PathBuf],
    format: OutputFormat,
) -> color_eyre::Result<()> {
    let documents = resolve_documents(files)?;
    let coordinator = workspace.coordinator(DiagnosticStore::new());

    let summary = coordinator.lint_open_documents(&documents).await;
    let diagnostics = coordinator.sink().snapshot();
    let notices = coordinator.sink().notices();

    let content = match format {
        OutputFormat::Text => render_check(diagnostics, &notices, summary),
        OutputFormat::Json => to_json(&CheckReport {
            diagnostics,
            notices,
            summary,
        })?,
    };
    write_output(&content, None)
}

/// Lints the open documents, then follows file changes until interrupted.
///
/// # Errors
///
/// Returns an error if the watcher cannot be started or stops abnormally.
async fn run_watch(workspace: Workspace, files: &[Utf8PathBuf]) -> color_eyre::Result<()> {
    let root = workspace.root.clone();
    let watch_config = workspace.settings.watch;
    let filter = CompositeFilter::new()
        .and(ExtensionFilter::for_settings(&workspace.settings))
        .and(SkipDirsFilter::default());

    let coordinator = workspace.coordinator(ConsoleSink);

    let mut open = if files.is_empty() {
        coordinator.source_files()?
    } else {
        resolve_documents(files)?
    };
    let watched: Option<FxHashSet<Utf8PathBuf>> =
        (!files.is_empty()).then(|| open.iter().cloned().collect());

    info!(documents = open.len(), "Linting open documents");
    let summary = coordinator.lint_open_documents(&open).await;
    info!(
        files = summary.files,
        diagnostics = summary.diagnostics,
        failures = summary.launch_failures,
        "Initial lint finished"
    );

    let mut watcher = FileWatcher::new(&root, &watch_config, filter).await?;
    info!(path = %watcher.watch_path(), "Watching for changes");
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            batch = watcher.recv() => {
                let Some(batch) = batch else {
                    warn!("File watcher stopped unexpectedly");
                    break;
                };
                handle_batch(&coordinator, &mut open, watched.as_ref(), batch).await;
            }
            result = &mut shutdown => {
                result?;
                info!("Shutting down");
                break;
            }
        }
    }

    watcher.shutdown().await?;
    Ok(())
}

/// Feeds one batch of watcher events to the coordinator.
///
/// With a `watched` set, changes to other files are ignored; a watched file
/// that vanished rejoins the open documents when it is saved again.
/// Otherwise any saved file joins the open documents.
async fn handle_batch<R: ToolRunner, S: DiagnosticSink>(
    coordinator: &ScanCoordinator<R, S>,
    open: &mut Vec<Utf8PathBuf>,
    watched: Option<&FxHashSet<Utf8PathBuf>>,
    batch: DocumentEventBatch,
) {
    debug!(stats = ?EventBatchStats::from_batch(&batch), "Watch batch");

    let events: Vec<_> = batch
        .into_iter()
        .filter(|event| watched.is_none_or(|watched| watched.contains(&event.path)))
        .collect();
    if events.is_empty() {
        return;
    }

    for event in &events {
        match event.kind {
            DocumentEventKind::Closed => open.retain(|document| document != &event.path),
            DocumentEventKind::Opened | DocumentEventKind::Saved => {
                if !open.contains(&event.path) {
                    open.push(event.path.clone());
                }
            }
        }
    }

    // One sweep covers the whole batch.
    let summary = if coordinator.trigger_mode() == TriggerMode::Aggressive {
        coordinator.sweep(open).await
    } else {
        let mut total = ScanSummary::default();
        for event in &events {
            total += coordinator.handle_event(event, open).await;
        }
        total
    };

    debug!(
        files = summary.files,
        diagnostics = summary.diagnostics,
        "Re-lint finished"
    );
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() -> color_eyre::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = sigterm.recv() => info!("Received SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// JSON shape of the `check` command.
#[derive(Serialize)]
struct CheckReport {
    diagnostics: DiagnosticMap,
    notices: Vec<String>,
    summary: ScanSummary,
}

/// Renders the folder report as text.
///
/// Legacy output is the script's lines verbatim.
fn render_folder_report(report: &ScanReport, legacy: bool) -> String {
    use std::fmt::Write;

    let mut output = String::new();

    if legacy {
        let mut lines = report.files.iter().flat_map(|file| &file.lines).peekable();
        if lines.peek().is_none() && report.failures.is_empty() {
            output.push_str("No lint exceptions found\n");
        }
        for line in lines {
            let _ = writeln!(output, "{line}");
        }
    } else {
        for file in &report.files {
            let _ = writeln!(output, "Linting file {}:", file.file);
            for line in &file.lines {
                let _ = writeln!(output, "  {line}");
            }
            output.push('\n');
        }
    }

    for failure in &report.failures {
        let _ = writeln!(output, "Cannot lint the file {}: {}", failure.file, failure.message);
    }

    if !legacy {
        let _ = writeln!(output, "Total lint warnings: {}", report.summary.reported_lines);
    }

    output
}

/// Renders published diagnostics as text, one finding per line, followed
/// by the notices raised while linting.
fn render_check(diagnostics: DiagnosticMap, notices: &[String], summary: ScanSummary) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    for (_, list) in diagnostics.into_sorted() {
        for diagnostic in &list {
            let _ = writeln!(output, "{diagnostic}");
        }
    }
    for notice in notices {
        let _ = writeln!(output, "{notice}");
    }

    let _ = writeln!(
        output,
        "{} diagnostics in {} files",
        summary.diagnostics, summary.files
    );
    if summary.launch_failures > 0 {
        let _ = writeln!(output, "{} files could not be linted", summary.launch_failures);
    }

    output
}

fn to_json<T: Serialize>(value: &T) -> color_eyre::Result<String> {
    let mut json = serde_json::to_string_pretty(value)
        .map_err(|e| eyre!("Failed to serialize JSON: {e}"))?;
    json.push('\n');
    Ok(json)
}

/// Writes `content` to a file, or to stdout.
fn write_output(content: &str, output: Option<&Utf8Path>) -> color_eyre::Result<()> {
    if let Some(path) = output {
        std::fs::write(path, content).wrap_err_with(|| format!("Cannot write {path}"))?;
        info!(path = %path, "Report written");
    } else {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        write!(handle, "{content}")?;
    }

    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Resolve the workspace and its settings
    let workspace = Workspace::load(&cli)?;

    // 5. Route to appropriate command
    match &cli.command {
        Commands::Lint { format, output } => run_lint(workspace, *format, output.as_deref()).await,
        Commands::Check { files, format } => run_check(workspace, files, *format).await,
        Commands::Watch { files } => run_watch(workspace, files).await,
    }
}
