//! Scan orchestration.
//!
//! [`ScanCoordinator`] turns triggers into scans. Every scan resolves its target
//! files, fans out one pipeline per file (invoke, then parse), fans the results
//! back in through a [`DiagnosticAggregator`] and hands the outcome to a
//! [`DiagnosticSink`].
//!
//! # Scopes
//!
//! - **Single document**: one file, published key by key
//! - **Sweep**: every open lintable document; clears the sink, then publishes.
//!   Sweeps hold a FIFO gate for their whole run, so two sweeps never overlap
//! - **Source folders**: every lintable file below the configured source
//!   folders, returned as a [`ScanReport`] without touching the sink
//!
//! Pipelines of one scan are polled concurrently on the calling task; no
//! engine logic runs in parallel.
//!
//! # Example
//!
//! ```no_run
//! use lintit_core::{DocumentEvent, PathResolver, Settings};
//! use lintit_engine::{DiagnosticStore, ProcessRunner, ScanCoordinator};
//! use camino::Utf8PathBuf;
//!
//! # async fn example() {
//! let coordinator = ScanCoordinator::new(
//!     Settings::default(),
//!     PathResolver::for_host("/ws"),
//!     ProcessRunner,
//!     DiagnosticStore::new(),
//! );
//!
//! let open = vec![Utf8PathBuf::from("/ws/main.c")];
//! coordinator.lint_open_documents(&open).await;
//! coordinator.handle_event(&DocumentEvent::saved("/ws/main.c"), &open).await;
//!
//! for file in coordinator.sink().files() {
//!     println!("{file}: {:?}", coordinator.sink().get(&file));
//! }
//! # }
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use futures_util::future::join_all;
use lintit_core::{
    DiagnosticMap, DocumentEvent, DocumentEventKind, LintConfiguration, PathResolver, Settings,
    TriggerMode, strip_git_suffix,
};
use rustc_hash::FxHashSet;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::aggregate::{DiagnosticAggregator, ScanReport};
use crate::args::ArgumentBuilder;
use crate::error::LintError;
use crate::invoker::{ToolInvocation, ToolRunner};
use crate::matcher::ConfigurationMatcher;
use crate::parser::{OutputParser, ParsedOutput};
use crate::sink::DiagnosticSink;
use crate::stats::ScanSummary;
use crate::walker::SourceWalker;

/// Drives lint runs for one workspace.
#[derive(Debug)]
pub struct ScanCoordinator<R, S> {
    settings: Settings,
    matcher: ConfigurationMatcher,
    tool: Utf8PathBuf,
    runner: R,
    sink: S,
    sweep_gate: Mutex<()>,
}

impl<R: ToolRunner, S: DiagnosticSink> ScanCoordinator<R, S> {
    /// Creates a coordinator for the workspace `resolver` is rooted at.
    pub fn new(settings: Settings, resolver: PathResolver, runner: R, sink: S) -> Self {
        let tool = resolver.normalize(&settings.tool_location);
        let matcher = ConfigurationMatcher::new(&settings, resolver);

        Self {
            settings,
            matcher,
            tool,
            runner,
            sink,
            sweep_gate: Mutex::new(()),
        }
    }

    /// Returns how document events are handled.
    #[inline]
    #[must_use]
    pub const fn trigger_mode(&self) -> TriggerMode {
        self.settings.trigger_mode()
    }

    /// Returns the sink results are published to.
    #[inline]
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the tool runner.
    #[inline]
    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    fn resolver(&self) -> &PathResolver {
        self.matcher.resolver()
    }

    /// Plans the tool launch for a document in the current trigger mode.
    ///
    /// Returns `None` when the document is not lintable. Legacy mode only
    /// considers the builtin extension and ignores source folders.
    #[must_use]
    pub fn plan_document(&self, document: &Utf8Path) -> Option<ToolInvocation> {
        let file = strip_git_suffix(document);

        match self.trigger_mode() {
            TriggerMode::Legacy => LintConfiguration::default()
                .accepts_extension(&file)
                .then(|| ToolInvocation::legacy(self.resolver().workspace_root(), Some(&file))),
            TriggerMode::Aggressive | TriggerMode::PerDocument => self.plan_with_tool(&file),
        }
    }

    fn plan_with_tool(&self, file: &Utf8Path) -> Option<ToolInvocation> {
        let configuration = self.matcher.lintable(file)?;
        Some(self.invocation_for(configuration, file))
    }

    fn invocation_for(&self, configuration: &LintConfiguration, file: &Utf8Path) -> ToolInvocation {
        let args = ArgumentBuilder::new(self.resolver()).build(configuration, file);
        ToolInvocation::for_file(&self.tool, args, file)
    }

    /// Dispatches a document event according to the trigger mode.
    ///
    /// `open_documents` lists the documents open after the event; a closed
    /// document is expected to be absent from it.
    pub async fn handle_event(
        &self,
        event: &DocumentEvent,
        open_documents: &[Utf8PathBuf],
    ) -> ScanSummary {
        debug!(%event, mode = ?self.trigger_mode(), "document event");

        match (self.trigger_mode(), event.kind) {
            (TriggerMode::Aggressive, _) => self.sweep(open_documents).await,
            (TriggerMode::Legacy | TriggerMode::PerDocument, DocumentEventKind::Closed) => {
                self.clear_document(&event.path);
                ScanSummary::default()
            }
            (
                TriggerMode::Legacy | TriggerMode::PerDocument,
                DocumentEventKind::Opened | DocumentEventKind::Saved,
            ) => self.lint_document(&event.path).await,
        }
    }

    /// Lints every open document once, as done at start-up.
    pub async fn lint_open_documents(&self, open_documents: &[Utf8PathBuf]) -> ScanSummary {
        if self.trigger_mode() == TriggerMode::Aggressive {
            return self.sweep(open_documents).await;
        }

        join_all(open_documents.iter().map(|document| self.lint_document(document)))
            .await
            .into_iter()
            .sum()
    }

    /// Removes a document's diagnostics from the sink.
    pub fn clear_document(&self, document: &Utf8Path) {
        self.sink.clear(&strip_git_suffix(document));
    }

    /// Runs a single-document scan and publishes its entries one by one.
    ///
    /// Entries for other files are left untouched.
    pub async fn lint_document(&self, document: &Utf8Path) -> ScanSummary {
        let Some(invocation) = self.plan_document(document) else {
            debug!(%document, "document is not lintable");
            return ScanSummary::default();
        };

        let report = self.run_all(vec![invocation]).await;
        self.publish_each(report.diagnostics);
        report.summary
    }

    /// Re-lints every lintable open document as one scan.
    ///
    /// Waits for any sweep in progress to finish first. The sink is cleared
    /// and then receives every entry of the combined result.
    pub async fn sweep(&self, open_documents: &[Utf8PathBuf]) -> ScanSummary {
        let _gate = self.sweep_gate.lock().await;

        let mut seen = FxHashSet::default();
        let invocations: Vec<_> = open_documents
            .iter()
            .map(|document| strip_git_suffix(document))
            .filter(|file| seen.insert(file.clone()))
            .filter_map(|file| self.plan_with_tool(&file))
            .collect();

        info!(
            open = open_documents.len(),
            targets = invocations.len(),
            "starting sweep"
        );
        let report = self.run_all(invocations).await;

        self.sink.clear_all();
        self.publish_each(report.diagnostics);

        info!(
            files = report.summary.files,
            diagnostics = report.summary.diagnostics,
            failures = report.summary.launch_failures,
            "sweep finished"
        );
        report.summary
    }

    /// Lints every lintable file below the configured source folders.
    ///
    /// Configurations are visited in declaration order and a file reachable
    /// from several of them is linted once, by the first. Missing source
    /// folders are skipped with a notice. Nothing is published to the sink.
    ///
    /// In legacy mode `lint.bat` runs once from the workspace root instead.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::Walk`] if a source folder cannot be traversed.
    pub async fn lint_source_folders(&self) -> Result<ScanReport, LintError> {
        if self.settings.legacy_mode {
            return Ok(self.lint_workspace_legacy().await);
        }

        let invocations: Vec<_> = self
            .walk_source_folders()?
            .into_iter()
            .map(|(configuration, file)| self.invocation_for(configuration, &file))
            .collect();
        info!(targets = invocations.len(), "linting source folders");

        let report = self.run_all(invocations).await;
        info!(
            files = report.summary.files,
            issues = report.summary.reported_lines,
            failures = report.summary.launch_failures,
            "source folders linted"
        );
        Ok(report)
    }

    /// Lists every lintable file below the configured source folders, in
    /// the order [`lint_source_folders`](Self::lint_source_folders) visits them.
    ///
    /// Missing source folders are skipped with a notice.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::Walk`] if a source folder cannot be traversed.
    pub fn source_files(&self) -> Result<Vec<Utf8PathBuf>, LintError> {
        Ok(self
            .walk_source_folders()?
            .into_iter()
            .map(|(_, file)| file)
            .collect())
    }

    /// Walks the source folders, pairing each file with the first
    /// configuration that reaches it.
    fn walk_source_folders(&self) -> Result<Vec<(&LintConfiguration, Utf8PathBuf)>, LintError> {
        let mut seen = FxHashSet::default();
        let mut targets = Vec::new();

        for configuration in self.matcher.configurations() {
            for folder in &configuration.source_folders {
                let root = self.resolver().normalize(folder);
                let walker = match SourceWalker::new(&root) {
                    Ok(walker) => walker,
                    Err(err) => {
                        warn!(folder = %root, error = %err, "skipping source folder");
                        self.sink.notice(&err.to_string());
                        continue;
                    }
                };

                for file in walker.collect_paths(|path| configuration.accepts_extension(path))? {
                    if seen.insert(file.clone()) {
                        targets.push((configuration, file));
                    }
                }
            }
        }

        Ok(targets)
    }

    async fn lint_workspace_legacy(&self) -> ScanReport {
        let invocation = ToolInvocation::legacy(self.resolver().workspace_root(), None);
        info!(script = %invocation.program, "running legacy lint script");

        let (invocation, result) = self.run_pipeline(invocation).await;
        if let Err(err) = &result {
            self.report_failure(&invocation, err);
        }

        let mut aggregator = DiagnosticAggregator::new();
        aggregator.record(&invocation.file, result);
        aggregator.finish()
    }

    async fn run_pipeline(
        &self,
        invocation: ToolInvocation,
    ) -> (ToolInvocation, Result<ParsedOutput, LintError>) {
        let result = self.runner.run(&invocation).await.map(|output| {
            OutputParser::new(self.resolver()).parse(&output, &invocation.file)
        });
        (invocation, result)
    }

    async fn run_all(&self, invocations: Vec<ToolInvocation>) -> ScanReport {
        let mut aggregator = DiagnosticAggregator::new();
        for invocation in &invocations {
            aggregator.seed(&invocation.file);
        }

        let results = join_all(
            invocations
                .into_iter()
                .map(|invocation| self.run_pipeline(invocation)),
        )
        .await;

        for (invocation, result) in results {
            if let Err(err) = &result {
                self.report_failure(&invocation, err);
            }
            aggregator.record(&invocation.file, result);
        }

        aggregator.finish()
    }

    fn report_failure(&self, invocation: &ToolInvocation, err: &LintError) {
        warn!(file = %invocation.file, error = %err, "cannot lint file");
        self.sink.notice(&format!("Cannot lint the file {}: {err}", invocation.file));
    }

    fn publish_each(&self, diagnostics: DiagnosticMap) {
        for (file, list) in diagnostics.into_sorted() {
            self.sink.publish(&file, list);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::DiagnosticStore;
    use lintit_core::{Diagnostic, PathStyle};
    use parking_lot::Mutex as SyncMutex;
    use rustc_hash::FxHashMap;
    use std::io;
    use std::sync::Arc;
    use std::time::Duration;

    type EventLog = Arc<SyncMutex<Vec<String>>>;

    /// Runner answering from a script, recording every call.
    #[derive(Default)]
    struct ScriptedRunner {
        outputs: FxHashMap<Utf8PathBuf, String>,
        failing: FxHashSet<Utf8PathBuf>,
        delay: Duration,
        log: EventLog,
        calls: SyncMutex<Vec<ToolInvocation>>,
    }

    impl ScriptedRunner {
        fn with_output(mut self, file: &str, output: &str) -> Self {
            self.outputs.insert(Utf8PathBuf::from(file), output.to_owned());
            self
        }

        fn with_failure(mut self, file: &str) -> Self {
            self.failing.insert(Utf8PathBuf::from(file));
            self
        }

        fn calls(&self) -> Vec<ToolInvocation> {
            self.calls.lock().clone()
        }
    }

    impl ToolRunner for ScriptedRunner {
        async fn run(&self, invocation: &ToolInvocation) -> Result<String, LintError> {
            self.log.lock().push(format!("start:{}", invocation.file));
            self.calls.lock().push(invocation.clone());

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.log.lock().push(format!("end:{}", invocation.file));

            if self.failing.contains(&invocation.file) {
                return Err(LintError::launch(
                    &invocation.file,
                    &invocation.program,
                    io::Error::from(io::ErrorKind::NotFound),
                ));
            }
            Ok(self
                .outputs
                .get(&invocation.file)
                .cloned()
                .unwrap_or_default())
        }
    }

    /// Store that also writes sink calls to the shared log.
    struct RecordingSink {
        store: DiagnosticStore,
        log: EventLog,
    }

    impl DiagnosticSink for RecordingSink {
        fn publish(&self, file: &Utf8Path, diagnostics: Vec<Diagnostic>) {
            self.log.lock().push(format!("publish:{file}"));
            self.store.publish(file, diagnostics);
        }

        fn clear(&self, file: &Utf8Path) {
            self.log.lock().push(format!("clear:{file}"));
            self.store.clear(file);
        }

        fn clear_all(&self) {
            self.log.lock().push("clear_all".to_owned());
            self.store.clear_all();
        }

        fn notice(&self, message: &str) {
            self.store.notice(message);
        }
    }

    fn source_settings() -> Settings {
        Settings {
            configurations: vec![LintConfiguration {
                source_folders: vec!["${workspaceFolder}/src".to_owned()],
                include_folders: vec!["${workspaceFolder}/inc".to_owned()],
                ..LintConfiguration::default()
            }],
            ..Settings::default()
        }
    }

    fn coordinator(
        settings: Settings,
        runner: ScriptedRunner,
    ) -> (ScanCoordinator<ScriptedRunner, RecordingSink>, EventLog) {
        let log = Arc::clone(&runner.log);
        let sink = RecordingSink {
            store: DiagnosticStore::new(),
            log: Arc::clone(&log),
        };
        let resolver = PathResolver::new("/ws", PathStyle::Posix);
        (ScanCoordinator::new(settings, resolver, runner, sink), log)
    }

    fn docs(paths: &[&str]) -> Vec<Utf8PathBuf> {
        paths.iter().map(Utf8PathBuf::from).collect()
    }

    fn position(log: &[String], entry: &str) -> usize {
        log.iter().position(|e| e == entry).unwrap()
    }

    #[tokio::test]
    async fn test_single_document_scan_publishes_each_key() {
        let runner = ScriptedRunner::default().with_output(
            "/ws/src/a.c",
            "/ws/inc/a.h(3): Warning 1: header\n/ws/src/a.c(9): Error 2: source\n",
        );
        let (coordinator, _log) = coordinator(source_settings(), runner);
        coordinator
            .sink()
            .store
            .publish(Utf8Path::new("/ws/src/other.c"), Vec::new());

        let summary = coordinator.lint_document(Utf8Path::new("/ws/src/a.c")).await;

        let store = &coordinator.sink().store;
        assert_eq!(summary.files, 1);
        assert_eq!(summary.diagnostics, 2);
        assert_eq!(store.get(Utf8Path::new("/ws/inc/a.h")).map(|d| d.len()), Some(1));
        assert_eq!(store.get(Utf8Path::new("/ws/src/a.c")).map(|d| d.len()), Some(1));
        // Single-document scans never clear other files.
        assert!(store.contains(Utf8Path::new("/ws/src/other.c")));
    }

    #[tokio::test]
    async fn test_invocation_arguments_and_working_directory() {
        let (coordinator, _log) = coordinator(source_settings(), ScriptedRunner::default());
        coordinator.lint_document(Utf8Path::new("/ws/src/drv/uart.c")).await;

        let calls = coordinator.runner().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "lint-nt");
        assert_eq!(calls[0].working_dir, "/ws/src/drv");
        assert_eq!(calls[0].args[6], r#"-i"/ws/inc""#);
        assert_eq!(calls[0].args.last().map(String::as_str), Some("/ws/src/drv/uart.c"));
    }

    #[tokio::test]
    async fn test_clean_file_clears_stale_findings() {
        let (coordinator, _log) = coordinator(source_settings(), ScriptedRunner::default());
        let file = Utf8Path::new("/ws/src/a.c");
        let stale = Diagnostic::new(
            file.to_owned(),
            1,
            lintit_core::SeverityKeyword::Error,
            1,
            "Error 1: stale",
        );
        coordinator.sink().store.publish(file, vec![stale]);

        coordinator.lint_document(file).await;

        assert_eq!(coordinator.sink().store.get(file), Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_disallowed_extension_is_never_invoked() {
        let (coordinator, _log) = coordinator(source_settings(), ScriptedRunner::default());

        let summary = coordinator.lint_document(Utf8Path::new("/ws/src/a.h")).await;
        coordinator.lint_document(Utf8Path::new("/ws/test/a.c")).await;
        coordinator.sweep(&docs(&["/ws/src/b.h", "/ws/src/c.txt"])).await;

        assert!(summary.is_empty());
        assert!(coordinator.runner().calls().is_empty());
    }

    #[tokio::test]
    async fn test_git_suffix_is_stripped() {
        let (coordinator, _log) = coordinator(source_settings(), ScriptedRunner::default());
        coordinator.lint_document(Utf8Path::new("/ws/src/a.c.git")).await;

        let calls = coordinator.runner().calls();
        assert_eq!(calls[0].file, "/ws/src/a.c");
        assert!(coordinator.sink().store.contains(Utf8Path::new("/ws/src/a.c")));
    }

    #[tokio::test]
    async fn test_launch_failure_does_not_abort_siblings() {
        let runner = ScriptedRunner::default()
            .with_failure("/ws/src/a.c")
            .with_output("/ws/src/b.c", "/ws/src/b.c(1): Warning 1: x\n");
        let settings = Settings {
            aggressive_mode: true,
            ..source_settings()
        };
        let (coordinator, _log) = coordinator(settings, runner);

        let summary = coordinator.sweep(&docs(&["/ws/src/a.c", "/ws/src/b.c"])).await;

        let store = &coordinator.sink().store;
        assert_eq!(summary.files, 1);
        assert_eq!(summary.launch_failures, 1);
        assert_eq!(store.get(Utf8Path::new("/ws/src/b.c")).map(|d| d.len()), Some(1));
        assert_eq!(store.get(Utf8Path::new("/ws/src/a.c")), Some(Vec::new()));

        let notices = store.notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("/ws/src/a.c"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_fans_out_before_fan_in() {
        let runner = ScriptedRunner {
            delay: Duration::from_millis(10),
            ..ScriptedRunner::default()
        };
        let (coordinator, log) = coordinator(source_settings(), runner);

        coordinator.sweep(&docs(&["/ws/src/a.c", "/ws/src/b.c"])).await;

        let log = log.lock().clone();
        assert_eq!(
            &log[..4],
            &["start:/ws/src/a.c", "start:/ws/src/b.c", "end:/ws/src/a.c", "end:/ws/src/b.c"]
        );
        assert_eq!(log[4], "clear_all");
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_sweeps_never_interleave() {
        let runner = ScriptedRunner {
            delay: Duration::from_millis(10),
            ..ScriptedRunner::default()
        };
        let (coordinator, log) = coordinator(source_settings(), runner);

        let first = docs(&["/ws/src/a.c", "/ws/src/b.c"]);
        let second = docs(&["/ws/src/c.c"]);
        tokio::join!(coordinator.sweep(&first), coordinator.sweep(&second));

        let log = log.lock().clone();
        let first_done = position(&log, "publish:/ws/src/b.c");
        let second_start = position(&log, "start:/ws/src/c.c");
        assert!(second_start > first_done, "{log:?}");
        assert_eq!(log.iter().filter(|e| *e == "clear_all").count(), 2);

        // The second sweep replaced the first one's entries.
        assert_eq!(coordinator.sink().store.files(), docs(&["/ws/src/c.c"]));
    }

    #[tokio::test]
    async fn test_sweep_lints_duplicates_once() {
        let (coordinator, _log) = coordinator(source_settings(), ScriptedRunner::default());
        coordinator
            .sweep(&docs(&["/ws/src/a.c", "/ws/src/a.c.git", "/ws/src/a.c"]))
            .await;

        assert_eq!(coordinator.runner().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_per_document_close_clears() {
        let (coordinator, log) = coordinator(source_settings(), ScriptedRunner::default());

        coordinator
            .handle_event(&DocumentEvent::opened("/ws/src/a.c"), &docs(&["/ws/src/a.c"]))
            .await;
        assert!(coordinator.sink().store.contains(Utf8Path::new("/ws/src/a.c")));

        let summary = coordinator
            .handle_event(&DocumentEvent::closed("/ws/src/a.c"), &[])
            .await;

        assert!(summary.is_empty());
        assert!(coordinator.sink().store.is_empty());
        assert!(log.lock().contains(&"clear:/ws/src/a.c".to_owned()));
        assert_eq!(coordinator.runner().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_aggressive_close_sweeps_remaining() {
        let settings = Settings {
            aggressive_mode: true,
            legacy_mode: true,
            ..source_settings()
        };
        let (coordinator, _log) = coordinator(settings, ScriptedRunner::default());

        coordinator
            .lint_open_documents(&docs(&["/ws/src/a.c", "/ws/src/b.c"]))
            .await;
        assert_eq!(coordinator.sink().store.len(), 2);

        coordinator
            .handle_event(&DocumentEvent::closed("/ws/src/a.c"), &docs(&["/ws/src/b.c"]))
            .await;

        assert_eq!(coordinator.sink().store.files(), docs(&["/ws/src/b.c"]));
        // Aggressive mode wins over legacy mode.
        assert!(coordinator.runner().calls().iter().all(|c| c.program == "lint-nt"));
    }

    #[tokio::test]
    async fn test_legacy_document_trigger() {
        let settings = Settings {
            legacy_mode: true,
            ..source_settings()
        };
        let (coordinator, _log) = coordinator(settings, ScriptedRunner::default());

        coordinator
            .handle_event(&DocumentEvent::saved("/elsewhere/a.c"), &[])
            .await;
        coordinator
            .handle_event(&DocumentEvent::saved("/ws/src/a.cpp"), &[])
            .await;

        let calls = coordinator.runner().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "/ws/lint.bat");
        assert_eq!(calls[0].args, vec!["/elsewhere/a.c"]);
        assert_eq!(calls[0].working_dir, "/ws");
    }

    #[tokio::test]
    async fn test_lint_open_documents_per_document() {
        let runner = ScriptedRunner::default()
            .with_output("/ws/src/a.c", "/ws/src/a.c(1): Note 1: x\n/ws/src/a.c(2): Note 2: y\n")
            .with_output("/ws/src/b.c", "/ws/src/b.c(1): Info 3: z\n");
        let (coordinator, log) = coordinator(source_settings(), runner);

        let summary = coordinator
            .lint_open_documents(&docs(&["/ws/src/a.c", "/ws/src/b.c", "/ws/readme.md"]))
            .await;

        assert_eq!(summary.files, 2);
        assert_eq!(summary.diagnostics, 3);
        assert!(!log.lock().contains(&"clear_all".to_owned()));
    }

    #[tokio::test]
    async fn test_lint_source_folders() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        for file in ["src/a.c", "src/b.h", "src/sub/c.c", "lib/d.c", "lib/e.h"] {
            let path = root.join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, "").unwrap();
        }

        let settings = Settings {
            configurations: vec![
                LintConfiguration {
                    name: Some("app".to_owned()),
                    source_folders: vec!["${workspaceFolder}/src".to_owned()],
                    ..LintConfiguration::default()
                },
                LintConfiguration {
                    name: Some("lib".to_owned()),
                    source_folders: vec![
                        "${workspaceFolder}/src/sub".to_owned(),
                        "${workspaceFolder}/lib".to_owned(),
                        "${workspaceFolder}/missing".to_owned(),
                    ],
                    lint_files: vec!["${workspaceFolder}/lib.lnt".to_owned()],
                    extensions: Some(vec![".c".to_owned(), ".h".to_owned()]),
                    ..LintConfiguration::default()
                },
            ],
            ..Settings::default()
        };

        let a = root.join("src/a.c");
        let runner = ScriptedRunner::default().with_output(
            a.as_str(),
            &format!("--- Module: a.c\n{a}(4): Warning 529: unused\nnot a finding\n"),
        );
        let store = DiagnosticStore::new();
        let coordinator = ScanCoordinator::new(
            settings,
            PathResolver::new(root.clone(), PathStyle::Posix),
            runner,
            store,
        );

        let report = coordinator.lint_source_folders().await.unwrap();

        let linted: Vec<_> = report
            .files
            .iter()
            .map(|f| f.file.strip_prefix(&root).unwrap().as_str().to_owned())
            .collect();
        assert_eq!(linted, vec!["src/a.c", "src/sub/c.c", "lib/d.c", "lib/e.h"]);

        // Shared file linted once, with the first configuration's arguments.
        let calls = coordinator.runner().calls();
        let sub = calls.iter().find(|c| c.file.ends_with("sub/c.c")).unwrap();
        assert!(!sub.args.iter().any(|arg| arg.contains("lib.lnt")));

        assert_eq!(report.summary.reported_lines, 2);
        assert_eq!(report.summary.diagnostics, 1);
        assert_eq!(report.files[0].lines.len(), 2);
        assert_eq!(report.diagnostics.len(), 4);

        // Folder scans report, they do not publish.
        assert!(coordinator.sink().is_empty());
        assert_eq!(coordinator.sink().notices().len(), 1);
    }

    #[test]
    fn test_source_files_follow_configuration_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        for file in ["src/b.c", "src/sub/a.c", "src/readme.txt", "lib/z.c"] {
            let path = root.join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, "").unwrap();
        }

        let settings = Settings {
            configurations: vec![
                LintConfiguration {
                    source_folders: vec!["${workspaceFolder}/lib".to_owned()],
                    ..LintConfiguration::default()
                },
                LintConfiguration {
                    source_folders: vec![
                        "${workspaceFolder}/src".to_owned(),
                        "${workspaceFolder}/src/sub".to_owned(),
                    ],
                    ..LintConfiguration::default()
                },
            ],
            ..Settings::default()
        };
        let coordinator = ScanCoordinator::new(
            settings,
            PathResolver::new(root.clone(), PathStyle::Posix),
            ScriptedRunner::default(),
            DiagnosticStore::new(),
        );

        let files: Vec<_> = coordinator
            .source_files()
            .unwrap()
            .iter()
            .map(|f| f.strip_prefix(&root).unwrap().as_str().to_owned())
            .collect();
        assert_eq!(files, vec!["lib/z.c", "src/b.c", "src/sub/a.c"]);
        assert!(coordinator.runner().calls().is_empty());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_lint_source_folders_skips_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::write(root.join("src/main.c"), "").unwrap();
        let notes = root.as_std_path().join(OsStr::from_bytes(b"src/notes\xff.txt"));
        std::fs::write(notes, "").unwrap();

        let settings = Settings {
            configurations: vec![LintConfiguration {
                source_folders: vec!["${workspaceFolder}/src".to_owned()],
                ..LintConfiguration::default()
            }],
            ..Settings::default()
        };
        let coordinator = ScanCoordinator::new(
            settings,
            PathResolver::new(root.clone(), PathStyle::Posix),
            ScriptedRunner::default(),
            DiagnosticStore::new(),
        );

        let report = coordinator.lint_source_folders().await.unwrap();

        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].file, root.join("src/main.c"));
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_lint_source_folders_legacy() {
        let settings = Settings {
            legacy_mode: true,
            ..source_settings()
        };
        let runner = ScriptedRunner::default().with_output("/ws", "line one\n---\nline two\n");
        let (coordinator, _log) = coordinator(settings, runner);

        let report = coordinator.lint_source_folders().await.unwrap();

        let calls = coordinator.runner().calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].args.is_empty());
        assert_eq!(report.files[0].lines, vec!["line one", "line two"]);
        assert!(report.diagnostics.is_empty());
    }
}
