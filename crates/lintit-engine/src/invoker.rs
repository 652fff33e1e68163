//! Running the analysis tool.
//!
//! A [`ToolInvocation`] describes one process launch. A [`ToolRunner`]
//! executes it and yields the captured standard output. [`ProcessRunner`] is
//! the production runner; tests substitute scripted runners.

use std::future::Future;
use std::process::Stdio;

use camino::{Utf8Path, Utf8PathBuf};
use lintit_core::LEGACY_SCRIPT;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::LintError;

/// One launch of the analysis tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// The file this launch is for. Also the fallback for file-less findings.
    pub file: Utf8PathBuf,
    /// Executable to launch.
    pub program: Utf8PathBuf,
    /// Arguments, passed as-is.
    pub args: Vec<String>,
    /// Working directory of the child process.
    pub working_dir: Utf8PathBuf,
}

impl ToolInvocation {
    /// Creates an invocation running `program` from the target file's directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use lintit_engine::ToolInvocation;
    /// use camino::Utf8Path;
    ///
    /// let invocation = ToolInvocation::for_file(
    ///     Utf8Path::new("/opt/lint-nt"),
    ///     vec!["/ws/src/a.c".to_owned()],
    ///     Utf8Path::new("/ws/src/a.c"),
    /// );
    /// assert_eq!(invocation.working_dir, "/ws/src");
    /// ```
    #[must_use]
    pub fn for_file(program: &Utf8Path, args: Vec<String>, target: &Utf8Path) -> Self {
        let working_dir = target
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));

        Self {
            file: target.to_owned(),
            program: program.to_owned(),
            args,
            working_dir: working_dir.to_owned(),
        }
    }

    /// Creates a legacy invocation of `lint.bat` from the workspace root.
    ///
    /// With a document the script receives it as sole argument; without one it
    /// lints whatever it is set up to lint.
    ///
    /// # Examples
    ///
    /// ```
    /// use lintit_engine::ToolInvocation;
    /// use camino::Utf8Path;
    ///
    /// let invocation = ToolInvocation::legacy(Utf8Path::new("/ws"), Some(Utf8Path::new("/ws/a.c")));
    /// assert_eq!(invocation.program, "/ws/lint.bat");
    /// assert_eq!(invocation.args, vec!["/ws/a.c"]);
    /// assert_eq!(invocation.working_dir, "/ws");
    /// ```
    #[must_use]
    pub fn legacy(workspace_root: &Utf8Path, document: Option<&Utf8Path>) -> Self {
        Self {
            file: document.map_or_else(|| workspace_root.to_owned(), Utf8Path::to_owned),
            program: workspace_root.join(LEGACY_SCRIPT),
            args: document.map(|path| vec![path.to_string()]).unwrap_or_default(),
            working_dir: workspace_root.to_owned(),
        }
    }
}

/// Executes tool invocations.
///
/// A runner returns the complete standard output of the tool. The exit status
/// is not part of the contract.
pub trait ToolRunner: Send + Sync {
    /// Runs the invocation to completion.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::Launch`] if the process cannot be started and
    /// [`LintError::Output`] if its output cannot be read.
    fn run(&self, invocation: &ToolInvocation) -> impl Future<Output = Result<String, LintError>> + Send;
}

/// Runs the tool as a child process.
///
/// Standard error is discarded and standard input is closed. Output that is
/// not valid UTF-8 is decoded lossily.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<String, LintError> {
        debug!(
            file = %invocation.file,
            program = %invocation.program,
            cwd = %invocation.working_dir,
            args = invocation.args.len(),
            "launching analysis tool"
        );

        let mut child = Command::new(invocation.program.as_std_path())
            .args(&invocation.args)
            .current_dir(invocation.working_dir.as_std_path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| LintError::launch(&invocation.file, &invocation.program, err))?;

        let mut buffer = Vec::new();
        if let Some(mut stdout) = child.stdout.take() {
            stdout
                .read_to_end(&mut buffer)
                .await
                .map_err(|err| LintError::output(&invocation.file, err))?;
        }

        let status = child
            .wait()
            .await
            .map_err(|err| LintError::output(&invocation.file, err))?;
        debug!(
            file = %invocation.file,
            code = ?status.code(),
            bytes = buffer.len(),
            "analysis tool finished"
        );

        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
