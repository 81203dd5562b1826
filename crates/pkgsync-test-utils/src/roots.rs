//! [`TestRoots`]: paired local and remote roots for sync scenarios.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};

use pkgsync_core::SyncSettings;
use pkgsync_core::scan::mod_time_secs;
use tempfile::TempDir;

/// Two temporary directories standing in for the local configuration
/// directory and the remote sync folder.
///
/// # Example
///
/// ```rust,no_run
/// use pkgsync_test_utils::TestRoots;
///
/// let roots = TestRoots::new().with_sync_enabled();
/// roots.write_local("Preferences.json", "{}", 100);
/// roots.assert_remote_missing("Preferences.json");
/// ```
pub struct TestRoots {
    local: TempDir,
    remote: TempDir,
}

impl Default for TestRoots {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRoots {
    /// Create two empty roots. Sync is not enabled yet.
    pub fn new() -> Self {
        Self {
            local: TempDir::new().unwrap(),
            remote: TempDir::new().unwrap(),
        }
    }

    pub fn local(&self) -> &Path {
        self.local.path()
    }

    pub fn remote(&self) -> &Path {
        self.remote.path()
    }

    /// Write `pkgsync.toml` in the local root with sync enabled and the
    /// remote root as sync folder.
    pub fn with_sync_enabled(self) -> Self {
        self.with_settings(|_| {})
    }

    /// Like [`TestRoots::with_sync_enabled`], letting `customize` adjust the
    /// settings before they are written.
    pub fn with_settings(self, customize: impl FnOnce(&mut SyncSettings)) -> Self {
        let mut settings = SyncSettings {
            sync: true,
            sync_folder: Some(self.remote().to_path_buf()),
            ..SyncSettings::default()
        };
        customize(&mut settings);
        settings
            .save(self.local())
            .expect("TestRoots::with_settings: failed to write settings");
        self
    }

    /// Write `content` to `rel` under the local root with mod time `mtime`.
    pub fn write_local(&self, rel: &str, content: &str, mtime: u64) -> PathBuf {
        write_file(self.local(), rel, content, mtime)
    }

    /// Write `content` to `rel` under the remote root with mod time `mtime`.
    pub fn write_remote(&self, rel: &str, content: &str, mtime: u64) -> PathBuf {
        write_file(self.remote(), rel, content, mtime)
    }

    pub fn read_local(&self, rel: &str) -> String {
        read_file(self.local(), rel)
    }

    pub fn read_remote(&self, rel: &str) -> String {
        read_file(self.remote(), rel)
    }

    pub fn local_mtime(&self, rel: &str) -> i64 {
        mtime_of(&self.local().join(rel))
    }

    pub fn remote_mtime(&self, rel: &str) -> i64 {
        mtime_of(&self.remote().join(rel))
    }

    pub fn remove_local(&self, rel: &str) {
        fs::remove_file(self.local().join(rel)).unwrap();
    }

    pub fn remove_remote(&self, rel: &str) {
        fs::remove_file(self.remote().join(rel)).unwrap();
    }

    pub fn assert_local_exists(&self, rel: &str) {
        assert_exists(self.local(), rel);
    }

    pub fn assert_remote_exists(&self, rel: &str) {
        assert_exists(self.remote(), rel);
    }

    pub fn assert_local_missing(&self, rel: &str) {
        assert_missing(self.local(), rel);
    }

    pub fn assert_remote_missing(&self, rel: &str) {
        assert_missing(self.remote(), rel);
    }
}

/// Set the modification time of `path` to `secs` seconds after the epoch.
pub fn set_mtime(path: &Path, secs: u64) {
    File::options()
        .write(true)
        .open(path)
        .and_then(|f| f.set_modified(UNIX_EPOCH + Duration::from_secs(secs)))
        .unwrap_or_else(|e| panic!("Could not set mtime of {}: {}", path.display(), e));
}

/// Modification time of `path` in whole seconds, as the scanner sees it.
pub fn mtime_of(path: &Path) -> i64 {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or_else(|e| panic!("Could not stat {}: {}", path.display(), e));
    mod_time_secs(modified)
}

fn write_file(root: &Path, rel: &str, content: &str, mtime: u64) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    set_mtime(&path, mtime);
    path
}

fn read_file(root: &Path, rel: &str) -> String {
    let path = root.join(rel);
    fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
}

fn assert_exists(root: &Path, rel: &str) {
    let path = root.join(rel);
    assert!(path.exists(), "Expected file to exist: {}", path.display());
}

fn assert_missing(root: &Path, rel: &str) {
    let path = root.join(rel);
    assert!(!path.exists(), "Expected file NOT to exist: {}", path.display());
}
