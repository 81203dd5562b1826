//! User settings read from `pkgsync.toml` in the local root

use std::path::{Path, PathBuf};
use std::time::Duration;

use pkgsync_fs::{ConfigStore, NormalizedPath, SyncFile};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Result;
use crate::scan::Filters;

/// Settings that drive a sync run.
///
/// Every field has a default, so a partial file (or no file at all) is
/// valid. The file is reread at the start of every run.
///
/// ```toml
/// sync = true
/// sync_folder = "/mnt/dropbox/editor"
/// files_to_include = ["*.json", "*.toml"]
/// files_to_ignore = ["*.log"]
/// dirs_to_ignore = [".git"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Master switch
    pub sync: bool,
    /// Remote root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_folder: Option<PathBuf>,
    /// Globs a relative path must match to be synced
    pub files_to_include: Vec<String>,
    /// Globs that exclude a relative path
    pub files_to_ignore: Vec<String>,
    /// Directory names that are never entered, compared literally and
    /// then as globs
    pub dirs_to_ignore: Vec<String>,
    /// Delay between a change request and the sync it triggers
    pub debounce_secs: u64,
    /// How often `watch` rescans the local root
    pub poll_interval_secs: u64,
    /// How often `watch` pulls from the remote root
    pub pull_interval_secs: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            sync: false,
            sync_folder: None,
            files_to_include: vec!["*".to_string()],
            files_to_ignore: Vec::new(),
            dirs_to_ignore: vec![".git".to_string()],
            debounce_secs: 10,
            poll_interval_secs: 5,
            pull_interval_secs: 300,
        }
    }
}

impl SyncSettings {
    /// Location of the settings file for `local_root`.
    pub fn path(local_root: &Path) -> NormalizedPath {
        NormalizedPath::new(local_root.join(SyncFile::Settings.as_str()))
    }

    /// Load settings for `local_root`, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(local_root: &Path) -> Result<Self> {
        let path = Self::path(local_root);
        if !path.exists() {
            debug!(path = %path, "no settings file, using defaults");
            return Ok(Self::default());
        }
        Ok(ConfigStore::new().load(&path)?)
    }

    /// Write settings for `local_root`.
    pub fn save(&self, local_root: &Path) -> Result<()> {
        ConfigStore::new().save(&Self::path(local_root), self)?;
        Ok(())
    }

    /// The scan filters described by these settings.
    pub fn filters(&self) -> Filters {
        Filters {
            include: self.files_to_include.clone(),
            exclude_files: self.files_to_ignore.clone(),
            exclude_dirs: self.dirs_to_ignore.clone(),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_secs(self.debounce_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn pull_interval(&self) -> Duration {
        Duration::from_secs(self.pull_interval_secs.max(1))
    }
}
