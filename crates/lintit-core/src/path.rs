//! Path expression resolution.
//!
//! Configured paths may begin with `${workspaceFolder}` and may use either
//! separator. [`PathResolver`] turns them into comparable absolute paths for a
//! given [`PathStyle`], and canonicalizes file paths reported by the tool.

use camino::{Utf8Path, Utf8PathBuf};

/// Placeholder substituted with the workspace root.
pub const WORKSPACE_FOLDER_TOKEN: &str = "${workspaceFolder}";

/// Suffix of version-control views of a document.
const GIT_SUFFIX: &str = ".git";

/// Separator convention used when resolving paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathStyle {
    /// Forward slashes become backslashes.
    Windows,
    /// Separators are left untouched.
    Posix,
}

impl PathStyle {
    /// Returns the style of the running platform.
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(windows) { Self::Windows } else { Self::Posix }
    }

    const fn is_separator(self, c: char) -> bool {
        match self {
            Self::Windows => c == '\\' || c == '/',
            Self::Posix => c == '/',
        }
    }
}

/// Resolves configured path expressions against a workspace root.
///
/// Resolution never fails: an empty workspace root simply substitutes the
/// empty string for the placeholder.
///
/// # Examples
///
/// ```
/// use lintit_core::{PathResolver, PathStyle};
///
/// let resolver = PathResolver::new("C:\\ws", PathStyle::Windows);
/// assert_eq!(resolver.normalize("${workspaceFolder}/src/main.c"), "C:\\ws\\src\\main.c");
///
/// let resolver = PathResolver::new("/home/dev/ws", PathStyle::Posix);
/// assert_eq!(resolver.normalize("${workspaceFolder}/src"), "/home/dev/ws/src");
/// assert_eq!(resolver.normalize("/opt/include"), "/opt/include");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    workspace_root: Utf8PathBuf,
    style: PathStyle,
}

impl PathResolver {
    /// Creates a resolver for the given workspace root and style.
    pub fn new(workspace_root: impl Into<Utf8PathBuf>, style: PathStyle) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            style,
        }
    }

    /// Creates a resolver using the host platform's style.
    pub fn for_host(workspace_root: impl Into<Utf8PathBuf>) -> Self {
        Self::new(workspace_root, PathStyle::host())
    }

    /// Returns the workspace root.
    #[inline]
    #[must_use]
    pub fn workspace_root(&self) -> &Utf8Path {
        &self.workspace_root
    }

    /// Returns the separator style.
    #[inline]
    #[must_use]
    pub const fn style(&self) -> PathStyle {
        self.style
    }

    /// Substitutes a leading `${workspaceFolder}` and applies the separator style.
    ///
    /// Idempotent: normalizing an already normalized path returns it unchanged.
    #[must_use]
    pub fn normalize(&self, expression: &str) -> Utf8PathBuf {
        let substituted = match expression.strip_prefix(WORKSPACE_FOLDER_TOKEN) {
            Some(rest) => format!("{}{rest}", self.workspace_root),
            None => expression.to_owned(),
        };

        Utf8PathBuf::from(self.apply_separators(substituted))
    }

    /// Canonicalizes a file path reported by the analysis tool.
    ///
    /// Returns `None` when the path collapses to nothing or to a bare root
    /// (the tool could not attribute the finding to a file).
    #[must_use]
    pub fn resolve_reported(&self, reported: &str) -> Option<Utf8PathBuf> {
        let trimmed = reported.trim();
        if trimmed.chars().all(|c| self.style.is_separator(c)) {
            return None;
        }

        Some(Utf8PathBuf::from(self.apply_separators(trimmed.to_owned())))
    }

    fn apply_separators(&self, path: String) -> String {
        match self.style {
            PathStyle::Windows if path.contains('/') => path.replace('/', "\\"),
            PathStyle::Windows | PathStyle::Posix => path,
        }
    }

    /// Returns `true` if the normalized `path` starts with the normalized
    /// `folder`, ignoring case.
    #[must_use]
    pub fn is_under(&self, path: &Utf8Path, folder: &str) -> bool {
        let prefix = self.normalize(folder);
        self.apply_separators(path.as_str().to_owned())
            .to_uppercase()
            .starts_with(&prefix.as_str().to_uppercase())
    }
}

/// Maps a version-control view of a document (`main.c.git`) to the file itself.
///
/// # Examples
///
/// ```
/// use lintit_core::strip_git_suffix;
/// use camino::Utf8Path;
///
/// assert_eq!(strip_git_suffix(Utf8Path::new("/ws/main.c.git")), "/ws/main.c");
/// assert_eq!(strip_git_suffix(Utf8Path::new("/ws/main.c")), "/ws/main.c");
/// ```
#[must_use]
pub fn strip_git_suffix(path: &Utf8Path) -> Utf8PathBuf {
    match path.as_str().strip_suffix(GIT_SUFFIX) {
        Some(stripped) if !stripped.is_empty() => Utf8PathBuf::from(stripped),
        _ => path.to_owned(),
    }
}
