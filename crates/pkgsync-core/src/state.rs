//! Persisted snapshot of the local file set at the last push
//!
//! The snapshot is the only state that survives between runs. Push compares
//! it with the current local scan to find files that were deleted locally
//! and must be deleted remotely too.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use fs2::FileExt;
use pkgsync_fs::{ConfigStore, NormalizedPath, SyncFile};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::Result;
use crate::scan::FileSet;

/// What the snapshot remembers about one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Modification time (whole seconds) at the time of the push
    pub version: i64,
    /// Directory part of the relative path, empty for top-level files
    pub dir: String,
}

/// The local file set captured at the end of the previous push.
///
/// Serialized as `{"local_data": {"<relative path>": {"version": .., "dir": ..}}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSnapshot {
    #[serde(default)]
    local_data: BTreeMap<String, SnapshotEntry>,
}

impl SyncSnapshot {
    /// An empty snapshot, as seen before the first push.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture a scanned file set.
    pub fn from_file_set(set: &FileSet) -> Self {
        let local_data = set
            .iter()
            .map(|e| {
                (
                    e.key().to_string(),
                    SnapshotEntry {
                        version: e.mod_time,
                        dir: e.parent_dir.clone(),
                    },
                )
            })
            .collect();
        Self { local_data }
    }

    /// Add or replace one entry.
    pub fn insert(&mut self, key: impl Into<String>, entry: SnapshotEntry) {
        self.local_data.insert(key.into(), entry);
    }

    pub fn get(&self, key: &str) -> Option<&SnapshotEntry> {
        self.local_data.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.local_data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.local_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.local_data.is_empty()
    }

    /// Entries in relative-path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SnapshotEntry)> {
        self.local_data.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Loads and saves the snapshot file in the local root.
#[derive(Debug, Clone)]
pub struct SyncStateStore {
    path: NormalizedPath,
}

impl SyncStateStore {
    /// Store for the snapshot kept in `local_root`.
    pub fn new(local_root: &Path) -> Self {
        Self {
            path: NormalizedPath::new(local_root.join(SyncFile::LastRun.as_str())),
        }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Load the snapshot.
    ///
    /// A missing file yields an empty snapshot. An unreadable or corrupt
    /// file is logged and also treated as empty, which makes the next push
    /// behave like a first push (creates and updates only, no deletes).
    pub fn load(&self) -> SyncSnapshot {
        if !self.path.exists() {
            debug!(path = %self.path, "no snapshot yet");
            return SyncSnapshot::new();
        }
        match self.read() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Ignoring unreadable snapshot {}: {}", self.path, e);
                SyncSnapshot::new()
            }
        }
    }

    /// Overwrite the snapshot file atomically.
    pub fn save(&self, snapshot: &SyncSnapshot) -> Result<()> {
        ConfigStore::new().save(&self.path, snapshot)?;
        debug!(path = %self.path, files = snapshot.len(), "snapshot saved");
        Ok(())
    }

    fn read(&self) -> Result<SyncSnapshot> {
        let file = File::open(self.path.to_native())?;
        FileExt::lock_shared(&file)?;

        // Read through the locked handle
        let mut content = String::new();
        (&file).read_to_string(&mut content)?;
        let snapshot = serde_json::from_str(&content)?;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::FileEntry;
    use tempfile::tempdir;

    #[test]
    fn snapshot_serializes_local_data_layout() {
        let mut snapshot = SyncSnapshot::new();
        snapshot.insert(
            "snippets/rust.json",
            SnapshotEntry {
                version: 100,
                dir: "snippets".into(),
            },
        );

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "local_data": {
                    "snippets/rust.json": {"version": 100, "dir": "snippets"}
                }
            })
        );
    }

    #[test]
    fn snapshot_from_file_set_keeps_versions() {
        let root = Path::new("/local");
        let mut set = FileSet::new(root);
        set.insert(FileEntry::new(root, "a.json".into(), 7));
        set.insert(FileEntry::new(root, "k/b.json".into(), 9));

        let snapshot = SyncSnapshot::from_file_set(&set);

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("a.json").unwrap().version, 7);
        assert_eq!(snapshot.get("k/b.json").unwrap().dir, "k");
    }

    #[test]
    fn store_round_trips_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let store = SyncStateStore::new(dir.path());

        let mut snapshot = SyncSnapshot::new();
        snapshot.insert(
            "a.json",
            SnapshotEntry {
                version: 1,
                dir: String::new(),
            },
        );
        store.save(&snapshot).unwrap();

        assert_eq!(store.load(), snapshot);
        assert!(dir.path().join("pkgsync.last-run.json").is_file());
        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn missing_snapshot_loads_empty() {
        let dir = tempdir().unwrap();
        assert!(SyncStateStore::new(dir.path()).load().is_empty());
    }

    #[test]
    fn corrupt_snapshot_loads_empty() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("pkgsync.last-run.json"), "{not json").unwrap();
        assert!(SyncStateStore::new(dir.path()).load().is_empty());
    }

    #[test]
    fn document_without_local_data_loads_empty() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("pkgsync.last-run.json"), "{}").unwrap();
        assert!(SyncStateStore::new(dir.path()).load().is_empty());
    }
}
