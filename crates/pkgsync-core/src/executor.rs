//! Applies diff actions to the filesystem

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use pkgsync_fs::io;

use crate::diff::DiffAction;

/// An action that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyFailure {
    pub action: DiffAction,
    pub message: String,
}

/// Outcome of applying a list of actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    /// Actions that changed the filesystem
    pub applied: usize,
    /// Deletes whose target was already gone
    pub unchanged: usize,
    /// Actions that failed; the rest of the list still ran
    pub failures: Vec<ApplyFailure>,
}

impl ApplyReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs [`DiffAction`]s one by one.
///
/// A failing action never stops the run: the failure is logged and
/// recorded, and the next scheduled sync recomputes the diff and retries.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncExecutor;

impl SyncExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Apply every action in order.
    pub fn apply(&self, actions: &[DiffAction]) -> ApplyReport {
        let mut report = ApplyReport::default();

        for action in actions {
            match apply_one(action) {
                Ok(true) => report.applied += 1,
                Ok(false) => report.unchanged += 1,
                Err(e) => {
                    warn!("Failed to {}: {}", action, e);
                    report.failures.push(ApplyFailure {
                        action: action.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        report
    }
}

/// Returns whether the filesystem changed.
fn apply_one(action: &DiffAction) -> pkgsync_fs::Result<bool> {
    match action {
        DiffAction::Delete { target } => {
            let removed = io::remove_file_if_exists(target)?;
            if removed {
                info!("Deleted {}", target.display());
            }
            Ok(removed)
        }
        DiffAction::Create { target, source } | DiffAction::Update { target, source } => {
            io::ensure_parent_dir(target)?;
            io::copy_preserving(source, target)?;
            info!("{} --> {}", source.display(), target.display());
            Ok(true)
        }
    }
}
