//! File-set scanning
//!
//! Walks a sync root, prunes excluded directories before descending into
//! them, and keeps the files whose root-relative path passes the
//! include/exclude globs.

mod file_set;
mod filter;

pub use file_set::{FileEntry, FileSet, mod_time_secs};
pub use filter::{Glob, PatternSet};

use std::fs;
use std::path::Path;

use pkgsync_fs::{NormalizedPath, SyncFile};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::{Error, Result};

/// Glob filters applied by a scan.
///
/// Owned by the settings; the scanner only reads them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    /// A file is kept only if its relative path matches one of these
    pub include: Vec<String>,
    /// Files whose relative path matches any of these are dropped
    pub exclude_files: Vec<String>,
    /// Directories whose name equals, or matches as a glob, any of these
    /// are never entered
    pub exclude_dirs: Vec<String>,
}

impl Filters {
    pub fn new(
        include: impl IntoIterator<Item = impl Into<String>>,
        exclude_files: impl IntoIterator<Item = impl Into<String>>,
        exclude_dirs: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            include: include.into_iter().map(Into::into).collect(),
            exclude_files: exclude_files.into_iter().map(Into::into).collect(),
            exclude_dirs: exclude_dirs.into_iter().map(Into::into).collect(),
        }
    }
}

/// Scanner with compiled filters, reusable across roots.
#[derive(Debug, Clone)]
pub struct FileSetScanner {
    include: PatternSet,
    exclude_files: PatternSet,
    exclude_dirs: PatternSet,
}

impl FileSetScanner {
    /// Compile `filters`.
    ///
    /// The settings file and the last-run snapshot are always appended to
    /// the file exclusions.
    pub fn new(filters: &Filters) -> Result<Self> {
        let implicit = SyncFile::all().map(|f| f.as_str().to_string());
        let exclude_files = filters.exclude_files.iter().cloned().chain(implicit);

        Ok(Self {
            include: PatternSet::new(&filters.include)?,
            exclude_files: PatternSet::new(exclude_files)?,
            exclude_dirs: PatternSet::new(&filters.exclude_dirs)?,
        })
    }

    /// Scan `root` recursively.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoot`] if `root` is missing or not a
    /// directory. Unreadable entries below the root are skipped with a
    /// warning.
    pub fn scan(&self, root: &Path) -> Result<FileSet> {
        if !root.is_dir() {
            return Err(Error::InvalidRoot {
                path: root.to_path_buf(),
            });
        }

        debug!(
            root = %root.display(),
            include = ?self.include.patterns().collect::<Vec<_>>(),
            exclude_files = ?self.exclude_files.patterns().collect::<Vec<_>>(),
            exclude_dirs = ?self.exclude_dirs.patterns().collect::<Vec<_>>(),
            "scanning"
        );

        let mut set = FileSet::new(root);
        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !self.is_excluded_dir(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            let Ok(below_root) = entry.path().strip_prefix(root) else {
                continue;
            };
            if below_root.to_str().is_none() {
                warn!(
                    "Skipping {}: path is not valid UTF-8",
                    entry.path().display()
                );
                continue;
            }
            let Some(relative) = NormalizedPath::relative(entry.path(), root) else {
                continue;
            };
            if !self.accepts(relative.as_str()) {
                continue;
            }

            let metadata = if entry.file_type().is_symlink() {
                fs::metadata(entry.path())
            } else {
                entry.metadata().map_err(std::io::Error::from)
            };
            let metadata = match metadata {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) => {
                    warn!("Skipping {}: {}", entry.path().display(), e);
                    continue;
                }
            };
            let modified = match metadata.modified() {
                Ok(t) => t,
                Err(e) => {
                    warn!(
                        "Skipping {}: no modification time: {}",
                        entry.path().display(),
                        e
                    );
                    continue;
                }
            };

            set.insert(FileEntry::new(root, relative, mod_time_secs(modified)));
        }

        debug!(root = %root.display(), files = set.len(), "scan complete");
        Ok(set)
    }

    /// Whether a root-relative file path passes the filters.
    pub fn accepts(&self, relative: &str) -> bool {
        self.include.is_match(relative) && !self.exclude_files.is_match(relative)
    }

    /// Directory names are compared literally first, so an entry such as
    /// `[cache]` prunes a directory of that exact name. Otherwise the entry
    /// is used as a glob.
    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        self.exclude_dirs.patterns().any(|p| p == name) || self.exclude_dirs.is_match(&name)
    }
}

/// Scan `root` with the given pattern lists.
///
/// Convenience wrapper around [`FileSetScanner`] for one-off scans.
pub fn scan(
    root: &Path,
    include: &[String],
    exclude_files: &[String],
    exclude_dirs: &[String],
) -> Result<FileSet> {
    let filters = Filters::new(
        include.iter().cloned(),
        exclude_files.iter().cloned(),
        exclude_dirs.iter().cloned(),
    );
    FileSetScanner::new(&filters)?.scan(root)
}
