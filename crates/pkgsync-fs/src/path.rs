//! Root-relative paths with `/` separators

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A path stored with `/` separators whatever the host platform.
///
/// File sets are keyed by root-relative paths, and a key has to name the
/// same file on both sides of a sync even when the two sides were scanned
/// on different platforms. Native separators only appear at I/O
/// boundaries, through [`NormalizedPath::to_native`] and
/// [`NormalizedPath::to_native_under`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Backslashes become `/`; nothing else is rewritten.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            inner: path.as_ref().to_string_lossy().replace('\\', "/"),
        }
    }

    /// Express `path` relative to `root`.
    ///
    /// Returns `None` when `path` does not live under `root` or when it
    /// is `root` itself.
    pub fn relative(path: &Path, root: &Path) -> Option<Self> {
        let stripped = path.strip_prefix(root).ok()?;
        let segments: Vec<String> = stripped
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if segments.is_empty() {
            return None;
        }
        Some(Self {
            inner: segments.join("/"),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Resolve this relative path under `root`, one native segment at a time.
    pub fn to_native_under(&self, root: &Path) -> PathBuf {
        self.segments()
            .fold(root.to_path_buf(), |acc, segment| acc.join(segment))
    }

    /// Append `segment`. Joining onto an empty path yields `segment` alone,
    /// so `NormalizedPath::new(entry.dir()).join(name)` works for top-level
    /// files too.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let inner = match self.inner.as_str() {
            "" => segment,
            base if base.ends_with('/') => format!("{base}{segment}"),
            base => format!("{base}/{segment}"),
        };
        Self { inner }
    }

    /// Everything before the last `/`, or `""` for a top-level file.
    pub fn dir(&self) -> &str {
        let trimmed = self.trimmed();
        trimmed.rfind('/').map_or("", |idx| &trimmed[..idx])
    }

    /// The last segment, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.trimmed().rsplit('/').next().filter(|s| !s.is_empty())
    }

    /// Extension of the last segment. Dotfiles such as `.editorconfig`
    /// have none.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// UNC shares and `smb://`/`nfs://` URLs. Sync folders on these are
    /// allowed but slow to scan.
    pub fn is_network_path(&self) -> bool {
        ["//", "smb://", "nfs://"]
            .iter()
            .any(|prefix| self.inner.starts_with(prefix))
    }

    fn trimmed(&self) -> &str {
        self.inner.trim_end_matches('/')
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|s| !s.is_empty())
    }
}

/// Canonicalize a root directory without producing `\\?\` prefixes on Windows.
///
/// Falls back to the path as given when it cannot be resolved, so callers
/// still get a useful message about the missing directory.
pub fn canonical_root(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}
