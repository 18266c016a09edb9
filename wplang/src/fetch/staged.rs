//! In-memory staging of extracted language pack files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Files extracted from one language pack, keyed by relative path.
///
/// Owned by the fetcher until handed to the reconciler, then dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedFileSet {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl StagedFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, replacing any earlier entry at the same path.
    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn get(&self, path: &Path) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate files in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[u8])> {
        self.files
            .iter()
            .map(|(path, content)| (path.as_path(), content.as_slice()))
    }
}

impl<P: Into<PathBuf>, C: Into<Vec<u8>>> FromIterator<(P, C)> for StagedFileSet {
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let mut staged = Self::new();
        for (path, content) in iter {
            staged.insert(path, content);
        }
        staged
    }
}
