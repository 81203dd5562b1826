//! Push and pull runs
//!
//! A run checks the host's configuration, scans both roots, diffs them and
//! applies the result. Runs of the same direction never overlap.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use pkgsync_fs::NormalizedPath;
use tracing::{debug, info, warn};

use crate::diff::{pull_diff, push_diff};
use crate::executor::SyncExecutor;
use crate::host::SyncHost;
use crate::scan::{FileSet, FileSetScanner};
use crate::state::{SyncSnapshot, SyncStateStore};
use crate::{Error, Result};

use super::report::{Direction, SyncOptions, SyncReport};

/// Roots resolved for one run.
#[derive(Debug, Clone)]
struct Roots {
    local: PathBuf,
    remote: PathBuf,
}

/// Runs pushes and pulls against a [`SyncHost`].
pub struct SyncOrchestrator<H: SyncHost> {
    host: H,
    executor: SyncExecutor,
    push_lock: Mutex<()>,
    pull_lock: Mutex<()>,
}

impl<H: SyncHost> SyncOrchestrator<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            executor: SyncExecutor::new(),
            push_lock: Mutex::new(()),
            pull_lock: Mutex::new(()),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mirror local changes to the remote root.
    pub fn push(&self) -> Result<SyncReport> {
        self.push_with_options(SyncOptions::default())
    }

    /// Mirror local changes to the remote root.
    ///
    /// The current local scan is persisted as the new snapshot before any
    /// action is applied. If persisting fails nothing is applied.
    ///
    /// # Errors
    ///
    /// Configuration errors are reported through the host and returned
    /// without touching either root.
    pub fn push_with_options(&self, options: SyncOptions) -> Result<SyncReport> {
        let _running = lock(&self.push_lock);
        let roots = self.check_preconditions()?;
        let scanner = self.scanner()?;

        let local = scanner.scan(&roots.local)?;
        let remote = scanner.scan(&roots.remote)?;
        let store = SyncStateStore::new(&roots.local);
        let last = store.load();

        let actions = push_diff(&local, &remote, &last);
        debug!(actions = actions.len(), dry_run = options.dry_run, "push diff");

        if options.dry_run {
            return Ok(SyncReport::planned(Direction::Push, actions));
        }

        store.save(&SyncSnapshot::from_file_set(&local))?;

        let outcome = self.executor.apply(&actions);
        let report = SyncReport::applied(Direction::Push, actions, outcome);
        self.finish(&report);
        Ok(report)
    }

    /// Bring the local root up to date with the remote root.
    pub fn pull(&self, override_local: bool) -> Result<SyncReport> {
        self.pull_with_options(override_local, SyncOptions::default())
    }

    /// Bring the local root up to date with the remote root.
    ///
    /// With `override_local` every remote file is copied even when the
    /// local copy is newer. Pull never deletes local files. Host change
    /// notifications are suspended for the duration of the run.
    ///
    /// # Errors
    ///
    /// Configuration errors are reported through the host and returned
    /// without touching either root.
    pub fn pull_with_options(
        &self,
        override_local: bool,
        options: SyncOptions,
    ) -> Result<SyncReport> {
        let _running = lock(&self.pull_lock);
        let roots = self.check_preconditions()?;
        let scanner = self.scanner()?;

        let _suspended = Suspended::new(&self.host);

        let local = scanner.scan(&roots.local)?;
        let remote = scanner.scan(&roots.remote)?;

        let actions = pull_diff(&local, &remote, override_local);
        debug!(
            actions = actions.len(),
            override_local,
            dry_run = options.dry_run,
            "pull diff"
        );

        if options.dry_run {
            return Ok(SyncReport::planned(Direction::Pull, actions));
        }

        let outcome = self.executor.apply(&actions);
        let report = SyncReport::applied(Direction::Pull, actions, outcome);
        self.finish(&report);
        Ok(report)
    }

    /// Scan the local root with the host's current filters.
    pub fn scan_local(&self) -> Result<FileSet> {
        self.scanner()?.scan(&self.host.local_root())
    }

    fn scanner(&self) -> Result<FileSetScanner> {
        FileSetScanner::new(&self.host.filters())
            .inspect_err(|e| self.host.report_status(&e.to_string()))
    }

    fn check_preconditions(&self) -> Result<Roots> {
        let roots = self.resolve_roots();
        if let Err(e) = &roots {
            self.host.report_status(&e.to_string());
        }
        roots
    }

    fn resolve_roots(&self) -> Result<Roots> {
        if !self.host.is_sync_enabled() {
            return Err(Error::SyncDisabled);
        }

        let remote = self.host.remote_root().ok_or(Error::SyncFolderNotSet)?;
        if !remote.is_dir() {
            return Err(Error::InvalidSyncFolder { path: remote });
        }
        if NormalizedPath::new(&remote).is_network_path() {
            warn!(
                "Sync folder {} is a network path; runs may be slow",
                remote.display()
            );
        }

        let local = self.host.local_root();
        if !local.is_dir() {
            return Err(Error::InvalidRoot { path: local });
        }
        if same_dir(&local, &remote) {
            return Err(Error::InvalidSyncFolder { path: remote });
        }

        Ok(Roots { local, remote })
    }

    fn finish(&self, report: &SyncReport) {
        if report.is_empty() {
            debug!("{} found nothing to do", report.direction);
            return;
        }
        info!("{}", report.summary());
        self.host.report_status(&report.summary());
    }
}

/// Suspends host change notifications until dropped.
struct Suspended<'a, H: SyncHost> {
    host: &'a H,
}

impl<'a, H: SyncHost> Suspended<'a, H> {
    fn new(host: &'a H) -> Self {
        host.suspend_change_notifications();
        Self { host }
    }
}

impl<H: SyncHost> Drop for Suspended<'_, H> {
    fn drop(&mut self) {
        self.host.resume_change_notifications();
    }
}

fn lock(mutex: &Mutex<()>) -> MutexGuard<'_, ()> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn same_dir(a: &Path, b: &Path) -> bool {
    pkgsync_fs::canonical_root(a) == pkgsync_fs::canonical_root(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SettingsHost;
    use crate::settings::SyncSettings;
    use tempfile::tempdir;

    #[test]
    fn sync_folder_equal_to_local_root_is_rejected() {
        let local = tempdir().unwrap();
        SyncSettings {
            sync: true,
            sync_folder: Some(local.path().to_path_buf()),
            ..SyncSettings::default()
        }
        .save(local.path())
        .unwrap();

        let orchestrator = SyncOrchestrator::new(SettingsHost::new(local.path()));
        let err = orchestrator.push().unwrap_err();

        assert!(matches!(err, Error::InvalidSyncFolder { .. }));
        assert!(!local.path().join("pkgsync.last-run.json").exists());
    }

    #[test]
    fn disabled_sync_reports_status() {
        let local = tempdir().unwrap();
        let host = SettingsHost::new(local.path());
        let orchestrator = SyncOrchestrator::new(host);

        assert!(matches!(orchestrator.pull(false), Err(Error::SyncDisabled)));
        assert_eq!(
            orchestrator.host().last_status().as_deref(),
            Some("Sync is disabled")
        );
    }
}
