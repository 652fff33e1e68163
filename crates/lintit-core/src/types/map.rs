//! Diagnostics grouped by file.

use camino::{Utf8Path, Utf8PathBuf};
use rustc_hash::FxHashMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::diagnostic::Diagnostic;

/// Mapping from file path to that file's diagnostics in parse order.
///
/// Every scanned file has an entry, possibly empty, so that publishing the
/// map clears stale findings for files that came back clean.
///
/// # Examples
///
/// ```
/// use lintit_core::DiagnosticMap;
/// use camino::Utf8Path;
///
/// let mut map = DiagnosticMap::new();
/// map.seed(Utf8Path::new("/ws/clean.c"));
///
/// assert_eq!(map.len(), 1);
/// assert_eq!(map.get(Utf8Path::new("/ws/clean.c")).map(<[_]>::len), Some(0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct DiagnosticMap {
    files: FxHashMap<Utf8PathBuf, Vec<Diagnostic>>,
}

impl DiagnosticMap {
    /// Creates an empty map.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures `path` has an entry without touching existing diagnostics.
    pub fn seed(&mut self, path: &Utf8Path) {
        if !self.files.contains_key(path) {
            self.files.insert(path.to_owned(), Vec::new());
        }
    }

    /// Appends a diagnostic to the list of its own file.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.files
            .entry(diagnostic.file.clone())
            .or_default()
            .push(diagnostic);
    }

    /// Merges another map into this one, concatenating lists for shared keys.
    pub fn merge(&mut self, other: Self) {
        for (path, diagnostics) in other.files {
            self.files.entry(path).or_default().extend(diagnostics);
        }
    }

    /// Replaces the list for `path`, returning the previous one.
    pub fn insert(&mut self, path: Utf8PathBuf, diagnostics: Vec<Diagnostic>) -> Option<Vec<Diagnostic>> {
        self.files.insert(path, diagnostics)
    }

    /// Removes the entry for `path`.
    pub fn remove(&mut self, path: &Utf8Path) -> Option<Vec<Diagnostic>> {
        self.files.remove(path)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Returns the diagnostics for a file, if it has an entry.
    #[must_use]
    pub fn get(&self, path: &Utf8Path) -> Option<&[Diagnostic]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Returns `true` if the file has an entry.
    #[inline]
    #[must_use]
    pub fn contains(&self, path: &Utf8Path) -> bool {
        self.files.contains_key(path)
    }

    /// Returns the number of files with an entry.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no file has an entry.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Returns the total number of diagnostics across all files.
    #[must_use]
    pub fn diagnostic_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    /// Iterates over entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&Utf8PathBuf, &Vec<Diagnostic>)> {
        self.files.iter()
    }

    /// Consumes the map, returning entries sorted by path.
    #[must_use]
    pub fn into_sorted(self) -> Vec<(Utf8PathBuf, Vec<Diagnostic>)> {
        let mut entries: Vec<_> = self.files.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

// Entries are written in path order so reports are stable.
impl Serialize for DiagnosticMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<_> = self.files.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (path, diagnostics) in entries {
            map.serialize_entry(path, diagnostics)?;
        }
        map.end()
    }
}

impl IntoIterator for DiagnosticMap {
    type Item = (Utf8PathBuf, Vec<Diagnostic>);
    type IntoIter = std::collections::hash_map::IntoIter<Utf8PathBuf, Vec<Diagnostic>>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

impl FromIterator<Diagnostic> for DiagnosticMap {
    fn from_iter<T: IntoIterator<Item = Diagnostic>>(iter: T) -> Self {
        let mut map = Self::new();
        for diagnostic in iter {
            map.push(diagnostic);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SeverityKeyword;

    fn diagnostic(file: &str, line: u32, code: u32) -> Diagnostic {
        Diagnostic::new(
            Utf8PathBuf::from(file),
            line,
            SeverityKeyword::Warning,
            code,
            format!("Warning {code}: test"),
        )
    }

    #[test]
    fn test_seed_does_not_overwrite() {
        let mut map = DiagnosticMap::new();
        map.push(diagnostic("/a.c", 1, 1));
        map.seed(Utf8Path::new("/a.c"));

        assert_eq!(map.get(Utf8Path::new("/a.c")).map(<[_]>::len), Some(1));
    }

    #[test]
    fn test_push_preserves_order() {
        let map: DiagnosticMap = [diagnostic("/a.c", 9, 1), diagnostic("/a.c", 2, 2)]
            .into_iter()
            .collect();

        let codes: Vec<u32> = map
            .get(Utf8Path::new("/a.c"))
            .unwrap()
            .iter()
            .map(|d| d.code)
            .collect();
        assert_eq!(codes, vec![1, 2]);
    }

    #[test]
    fn test_merge_concatenates_shared_keys() {
        let d1 = diagnostic("/a.c", 1, 1);
        let d2 = diagnostic("/a.c", 2, 2);

        let mut combined: DiagnosticMap = std::iter::once(d1.clone()).collect();
        combined.merge(std::iter::once(d2.clone()).collect());

        assert_eq!(combined.len(), 1);
        assert_eq!(combined.get(Utf8Path::new("/a.c")), Some(&[d1, d2][..]));
    }

    #[test]
    fn test_merge_keeps_findings_over_empty_seed() {
        let mut combined: DiagnosticMap = std::iter::once(diagnostic("/a.h", 3, 7)).collect();

        let mut other = DiagnosticMap::new();
        other.seed(Utf8Path::new("/a.h"));
        other.seed(Utf8Path::new("/b.c"));
        combined.merge(other);

        assert_eq!(combined.len(), 2);
        assert_eq!(combined.diagnostic_count(), 1);
        assert_eq!(combined.get(Utf8Path::new("/b.c")), Some(&[][..]));
    }

    #[test]
    fn test_insert_and_remove() {
        let mut map = DiagnosticMap::new();
        map.push(diagnostic("/a.c", 1, 1));

        let previous = map.insert(Utf8PathBuf::from("/a.c"), Vec::new());
        assert_eq!(previous.map(|list| list.len()), Some(1));
        assert_eq!(map.diagnostic_count(), 0);

        assert!(map.remove(Utf8Path::new("/a.c")).is_some());
        assert!(map.is_empty());
    }

    #[test]
    fn test_serialize_sorted_by_path() {
        let mut map = DiagnosticMap::new();
        map.seed(Utf8Path::new("/z.c"));
        map.seed(Utf8Path::new("/a.c"));

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"/a.c":[],"/z.c":[]}"#);
    }

    #[test]
    fn test_into_sorted() {
        let mut map = DiagnosticMap::new();
        map.seed(Utf8Path::new("/z.c"));
        map.seed(Utf8Path::new("/a.c"));

        let paths: Vec<_> = map.into_sorted().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec![Utf8PathBuf::from("/a.c"), Utf8PathBuf::from("/z.c")]);
    }
}
