//! Three-way diff between the local root, the remote root and the snapshot
//!
//! Push and pull are deliberately asymmetric. Push owns the snapshot and
//! propagates local deletions; pull only adds or refreshes local files and
//! never deletes anything.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scan::FileSet;
use crate::state::SyncSnapshot;

/// One filesystem change computed by a diff.
///
/// `target` lives in the destination root and `source` in the origin root.
/// Targets within one diff are distinct, so actions can run in any order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DiffAction {
    /// Remove `target`
    Delete { target: PathBuf },
    /// Copy `source` to a `target` that does not exist yet
    Create { target: PathBuf, source: PathBuf },
    /// Copy `source` over an older `target`
    Update { target: PathBuf, source: PathBuf },
}

impl DiffAction {
    pub fn target(&self) -> &Path {
        match self {
            Self::Delete { target } | Self::Create { target, .. } | Self::Update { target, .. } => {
                target
            }
        }
    }

    pub fn source(&self) -> Option<&Path> {
        match self {
            Self::Delete { .. } => None,
            Self::Create { source, .. } | Self::Update { source, .. } => Some(source),
        }
    }

    /// Short label used in logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Delete { .. } => "delete",
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
        }
    }
}

impl fmt::Display for DiffAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete { target } => write!(f, "delete {}", target.display()),
            Self::Create { target, source } | Self::Update { target, source } => write!(
                f,
                "{} {} --> {}",
                self.kind(),
                source.display(),
                target.display()
            ),
        }
    }
}

/// Compute the actions that bring the remote root up to date with local.
///
/// - Files in `last` but no longer in `local` are deleted remotely, unless
///   they are already gone from `remote` too.
/// - Files in `local` but not in `remote` are created, unless they were in
///   `last` and have since disappeared from `remote` (the remote side
///   removed them on purpose).
/// - Files in both are updated when the local copy is strictly newer.
pub fn push_diff(local: &FileSet, remote: &FileSet, last: &SyncSnapshot) -> Vec<DiffAction> {
    let gone_remotely: BTreeSet<&str> = last
        .iter()
        .map(|(key, _)| key)
        .filter(|key| !remote.contains(key))
        .collect();
    let deleted_locally: Vec<&str> = last
        .iter()
        .map(|(key, _)| key)
        .filter(|key| !local.contains(key))
        .collect();

    debug!(
        local = local.len(),
        remote = remote.len(),
        snapshot = last.len(),
        deleted_locally = ?deleted_locally,
        gone_remotely = ?gone_remotely,
        "computing push diff"
    );

    let mut actions = Vec::new();

    for (key, entry) in last.iter() {
        if local.contains(key) || gone_remotely.contains(key) {
            continue;
        }
        actions.push(DiffAction::Delete {
            target: target_in(remote.root(), &entry.dir, key),
        });
    }

    for entry in local {
        let key = entry.key();
        if gone_remotely.contains(key) {
            continue;
        }
        let target = target_in(remote.root(), &entry.parent_dir, key);
        match remote.get(key) {
            None => actions.push(DiffAction::Create {
                target,
                source: entry.absolute_path.clone(),
            }),
            Some(theirs) if entry.mod_time > theirs.mod_time => actions.push(DiffAction::Update {
                target,
                source: entry.absolute_path.clone(),
            }),
            Some(_) => {}
        }
    }

    actions
}

/// Compute the actions that bring the local root up to date with remote.
///
/// Every remote file that is missing locally, strictly newer than the local
/// copy, or any file at all when `override_local` is set, is copied over.
/// Local-only files are never touched.
pub fn pull_diff(local: &FileSet, remote: &FileSet, override_local: bool) -> Vec<DiffAction> {
    debug!(
        local = local.len(),
        remote = remote.len(),
        override_local,
        "computing pull diff"
    );

    remote
        .iter()
        .filter_map(|entry| {
            let key = entry.key();
            let target = target_in(local.root(), &entry.parent_dir, key);
            let source = entry.absolute_path.clone();
            match local.get(key) {
                None => Some(DiffAction::Create { target, source }),
                Some(ours) if override_local || entry.mod_time > ours.mod_time => {
                    Some(DiffAction::Update { target, source })
                }
                Some(_) => None,
            }
        })
        .collect()
}

/// Destination path for `key` under `root`, built from the stored directory
/// and the key's file name.
///
/// Keys and directories are only ever split on `/`. Any other character,
/// `\` included, is part of a file or directory name.
fn target_in(root: &Path, dir: &str, key: &str) -> PathBuf {
    let file_name = key.rsplit('/').next().unwrap_or(key);
    dir.split('/')
        .filter(|segment| !segment.is_empty())
        .chain(std::iter::once(file_name))
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_in_nested_dir() {
        let root = Path::new("/remote");
        assert_eq!(
            target_in(root, "snippets", "snippets/rust.json"),
            root.join("snippets").join("rust.json")
        );
    }

    #[test]
    fn target_in_top_level() {
        let root = Path::new("/remote");
        assert_eq!(
            target_in(root, "", "settings.json"),
            root.join("settings.json")
        );
    }

    #[cfg(unix)]
    #[test]
    fn target_in_keeps_backslash_in_file_name() {
        let root = Path::new("/remote");
        assert_eq!(
            target_in(root, "", "a\\b.json"),
            root.join("a\\b.json")
        );
        assert_eq!(
            target_in(root, "k\\v", "k\\v/c.json"),
            root.join("k\\v").join("c.json")
        );
    }

    #[test]
    fn action_accessors() {
        let action = DiffAction::Update {
            target: PathBuf::from("/r/a"),
            source: PathBuf::from("/l/a"),
        };
        assert_eq!(action.kind(), "update");
        assert_eq!(action.target(), Path::new("/r/a"));
        assert_eq!(action.source(), Some(Path::new("/l/a")));
        assert_eq!(action.to_string(), "update /l/a --> /r/a");

        let delete = DiffAction::Delete {
            target: PathBuf::from("/r/b"),
        };
        assert_eq!(delete.source(), None);
        assert_eq!(delete.to_string(), "delete /r/b");
    }

    #[test]
    fn action_serializes_with_type_tag() {
        let action = DiffAction::Delete {
            target: PathBuf::from("/r/b"),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json, serde_json::json!({"type": "delete", "target": "/r/b"}));
    }
}
