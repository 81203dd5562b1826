//! Reports returned by push and pull runs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diff::DiffAction;
use crate::executor::{ApplyFailure, ApplyReport};

/// Which way a run copies files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Local to remote
    Push,
    /// Remote to local
    Pull,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Pull => "pull",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for push and pull runs
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Compute the diff without persisting the snapshot or touching
    /// either root.
    pub dry_run: bool,
}

impl SyncOptions {
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }
}

/// Outcome of a single push or pull run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub direction: Direction,
    pub dry_run: bool,
    /// Every action the diff produced, in order
    pub actions: Vec<DiffAction>,
    /// Actions that changed the filesystem
    pub applied: usize,
    /// Actions that failed
    pub failures: Vec<ApplyFailure>,
}

impl SyncReport {
    /// Report for a run that only planned `actions`.
    pub fn planned(direction: Direction, actions: Vec<DiffAction>) -> Self {
        Self {
            direction,
            dry_run: true,
            actions,
            applied: 0,
            failures: Vec::new(),
        }
    }

    /// Report for a run that applied `actions`.
    pub fn applied(direction: Direction, actions: Vec<DiffAction>, outcome: ApplyReport) -> Self {
        Self {
            direction,
            dry_run: false,
            actions,
            applied: outcome.applied,
            failures: outcome.failures,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// True when the diff found nothing to do.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Count of actions of the given kind (`"create"`, `"update"`, `"delete"`).
    pub fn count(&self, kind: &str) -> usize {
        self.actions.iter().filter(|a| a.kind() == kind).count()
    }

    /// One-line summary suitable for a status notice.
    pub fn summary(&self) -> String {
        let verb = if self.dry_run { "would" } else { "did" };
        let mut line = format!(
            "{}: {} {} create, {} update, {} delete",
            self.direction,
            verb,
            self.count("create"),
            self.count("update"),
            self.count("delete"),
        );
        if !self.failures.is_empty() {
            line.push_str(&format!(" ({} failed)", self.failures.len()));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn create(name: &str) -> DiffAction {
        DiffAction::Create {
            target: PathBuf::from("/r").join(name),
            source: PathBuf::from("/l").join(name),
        }
    }

    #[test]
    fn summary_counts_each_kind() {
        let report = SyncReport::planned(
            Direction::Push,
            vec![
                create("a"),
                create("b"),
                DiffAction::Delete {
                    target: PathBuf::from("/r/c"),
                },
            ],
        );
        assert_eq!(report.summary(), "push: would 2 create, 0 update, 1 delete");
    }

    #[test]
    fn summary_mentions_failures() {
        let action = create("a");
        let report = SyncReport::applied(
            Direction::Pull,
            vec![action.clone()],
            ApplyReport {
                applied: 0,
                unchanged: 0,
                failures: vec![ApplyFailure {
                    action,
                    message: "denied".into(),
                }],
            },
        );
        assert!(!report.is_success());
        assert_eq!(report.summary(), "pull: did 1 create, 0 update, 0 delete (1 failed)");
    }

    #[test]
    fn direction_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Pull).unwrap(), "\"pull\"");
    }
}
