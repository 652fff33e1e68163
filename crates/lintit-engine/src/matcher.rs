//! Selection of the configuration governing a file.
//!
//! [`ConfigurationMatcher`] answers two questions about a path:
//!
//! - which profile's source folders claim it ([`match_file`](ConfigurationMatcher::match_file))
//! - whether it should be linted at all ([`lintable`](ConfigurationMatcher::lintable)),
//!   which additionally requires the claiming profile to accept its extension
//!
//! # Examples
//!
//! ```
//! use lintit_core::{LintConfiguration, PathResolver, PathStyle, Settings};
//! use lintit_engine::ConfigurationMatcher;
//! use camino::Utf8Path;
//!
//! let settings = Settings {
//!     configurations: vec![LintConfiguration {
//!         source_folders: vec!["${workspaceFolder}/src".to_owned()],
//!         ..LintConfiguration::default()
//!     }],
//!     ..Settings::default()
//! };
//! let matcher = ConfigurationMatcher::new(&settings, PathResolver::new("/ws", PathStyle::Posix));
//!
//! assert!(matcher.lintable(Utf8Path::new("/ws/src/main.c")).is_some());
//! assert!(matcher.lintable(Utf8Path::new("/ws/src/main.h")).is_none());
//! assert!(matcher.lintable(Utf8Path::new("/ws/test/main.c")).is_none());
//! ```

use camino::Utf8Path;
use lintit_core::{LintConfiguration, PathResolver, Settings};

/// Matches files against the ordered configuration set.
#[derive(Debug, Clone)]
pub struct ConfigurationMatcher {
    resolver: PathResolver,
    configurations: Vec<LintConfiguration>,
    implicit: bool,
}

impl ConfigurationMatcher {
    /// Builds a matcher from settings.
    ///
    /// When no named configurations are declared, the flat profile restricted
    /// to the builtin extension applies to every file.
    #[must_use]
    pub fn new(settings: &Settings, resolver: PathResolver) -> Self {
        if settings.configurations.is_empty() {
            return Self {
                resolver,
                configurations: vec![settings.flat.with_default_extension()],
                implicit: true,
            };
        }

        Self {
            resolver,
            configurations: settings.configurations.clone(),
            implicit: false,
        }
    }

    /// Returns the configurations in match order.
    #[inline]
    #[must_use]
    pub fn configurations(&self) -> &[LintConfiguration] {
        &self.configurations
    }

    /// Returns `true` if the implicit default configuration is in effect.
    #[inline]
    #[must_use]
    pub const fn is_implicit(&self) -> bool {
        self.implicit
    }

    /// Returns the resolver used for source-folder prefixes.
    #[inline]
    #[must_use]
    pub const fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Returns the first configuration whose source folders claim `path`.
    #[must_use]
    pub fn match_file(&self, path: &Utf8Path) -> Option<&LintConfiguration> {
        if self.implicit {
            return self.configurations.first();
        }

        self.configurations.iter().find(|configuration| {
            configuration
                .source_folders
                .iter()
                .any(|folder| self.resolver.is_under(path, folder))
        })
    }

    /// Returns the governing configuration if `path` should be linted.
    ///
    /// A file outside every source folder, or whose extension the claiming
    /// configuration does not accept, is not lintable.
    #[must_use]
    pub fn lintable(&self, path: &Utf8Path) -> Option<&LintConfiguration> {
        self.match_file(path)
            .filter(|configuration| configuration.accepts_extension(path))
    }
}
