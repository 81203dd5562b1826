//! File set types produced by a scan

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use pkgsync_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

/// Metadata for one file found by a scan.
///
/// This is a value captured at scan time, not a live handle: the file may
/// have changed or vanished by the time it is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path relative to the scanned root, `/`-separated
    pub relative_path: NormalizedPath,
    /// Absolute path on disk
    pub absolute_path: PathBuf,
    /// Directory part of `relative_path`, empty for top-level files
    pub parent_dir: String,
    /// Modification time in whole seconds since the Unix epoch
    pub mod_time: i64,
}

impl FileEntry {
    /// Build an entry for `relative_path` found under `root`.
    pub fn new(root: &Path, relative_path: NormalizedPath, mod_time: i64) -> Self {
        let absolute_path = relative_path.to_native_under(root);
        let parent_dir = relative_path.dir().to_string();
        Self {
            relative_path,
            absolute_path,
            parent_dir,
            mod_time,
        }
    }

    /// The key this entry is stored under in a [`FileSet`].
    pub fn key(&self) -> &str {
        self.relative_path.as_str()
    }
}

/// The result of scanning one root: relative path to [`FileEntry`].
///
/// Entries iterate in relative-path order so diffs computed from file sets
/// are deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSet {
    root: PathBuf,
    entries: BTreeMap<String, FileEntry>,
}

impl FileSet {
    /// Create an empty file set for `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: BTreeMap::new(),
        }
    }

    /// The directory this set was scanned from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Insert an entry, replacing any previous entry with the same key.
    pub fn insert(&mut self, entry: FileEntry) -> Option<FileEntry> {
        self.entries.insert(entry.key().to_string(), entry)
    }

    pub fn get(&self, key: &str) -> Option<&FileEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Relative paths in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in relative-path order.
    pub fn iter(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.values()
    }

    /// Modification times keyed by relative path.
    ///
    /// Two scans of an unchanged tree produce equal versions.
    pub fn versions(&self) -> BTreeMap<String, i64> {
        self.entries
            .iter()
            .map(|(k, e)| (k.clone(), e.mod_time))
            .collect()
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a FileEntry;
    type IntoIter = std::collections::btree_map::Values<'a, String, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

/// Convert a timestamp to whole seconds since the Unix epoch.
///
/// Sub-second parts are truncated so roots on filesystems with different
/// timestamp resolution compare equal after a metadata-preserving copy.
pub fn mod_time_secs(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
        Err(e) => -i64::try_from(e.duration().as_secs()).unwrap_or(i64::MAX),
    }
}
