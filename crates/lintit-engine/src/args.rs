//! Command-line construction for the analysis tool.

use camino::Utf8Path;
use lintit_core::{LintConfiguration, PathResolver};

/// Arguments emitted before anything configuration-specific.
///
/// Library messages are suppressed, file names are reported in full, line
/// wrapping is disabled, and each finding is printed as
/// `<file>(<line>): <severity> <code>: <message>`.
pub const FIXED_ARGUMENTS: [&str; 6] = [
    "-elib(0)",
    "+ffn",
    "-width(0)",
    "-hf1",
    "-u",
    r#"-"format=%f(%l): %t %n: %m""#,
];

/// Derives the tool's argument vector for one target file.
///
/// The vector is a pure function of the configuration and target:
///
/// 1. [`FIXED_ARGUMENTS`]
/// 2. `-i"<folder>"` per include folder
/// 3. `+libdir("<folder>")` per library include folder
/// 4. `"<file>"` per extra tool file
/// 5. the target file
///
/// Every configured path is normalized first.
///
/// # Examples
///
/// ```
/// use lintit_core::{LintConfiguration, PathResolver, PathStyle};
/// use lintit_engine::ArgumentBuilder;
/// use camino::Utf8Path;
///
/// let resolver = PathResolver::new("/ws", PathStyle::Posix);
/// let configuration = LintConfiguration {
///     include_folders: vec!["${workspaceFolder}/inc".to_owned()],
///     ..LintConfiguration::default()
/// };
///
/// let args = ArgumentBuilder::new(&resolver).build(&configuration, Utf8Path::new("/ws/a.c"));
/// assert_eq!(args[6], r#"-i"/ws/inc""#);
/// assert_eq!(args.last().map(String::as_str), Some("/ws/a.c"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ArgumentBuilder<'a> {
    resolver: &'a PathResolver,
}

impl<'a> ArgumentBuilder<'a> {
    /// Creates a builder normalizing paths with `resolver`.
    #[inline]
    #[must_use]
    pub const fn new(resolver: &'a PathResolver) -> Self {
        Self { resolver }
    }

    /// Builds the argument vector for `target` under `configuration`.
    #[must_use]
    pub fn build(&self, configuration: &LintConfiguration, target: &Utf8Path) -> Vec<String> {
        let capacity = FIXED_ARGUMENTS.len()
            + configuration.include_folders.len()
            + configuration.library_include_folders.len()
            + configuration.lint_files.len()
            + 1;
        let mut args = Vec::with_capacity(capacity);

        args.extend(FIXED_ARGUMENTS.iter().map(ToString::to_string));
        args.extend(
            configuration
                .include_folders
                .iter()
                .map(|folder| format!("-i\"{}\"", self.resolver.normalize(folder))),
        );
        args.extend(
            configuration
                .library_include_folders
                .iter()
                .map(|folder| format!("+libdir(\"{}\")", self.resolver.normalize(folder))),
        );
        args.extend(
            configuration
                .lint_files
                .iter()
                .map(|file| format!("\"{}\"", self.resolver.normalize(file))),
        );
        args.push(target.to_string());

        args
    }
}
