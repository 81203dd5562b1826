//! [`RecordingHost`]: an in-memory [`SyncHost`] for engine tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use pkgsync_core::{Filters, NotificationGate, SyncHost, SyncSettings};

/// A host whose configuration is set directly by the test and which records
/// every status notice and every suspend/resume call.
pub struct RecordingHost {
    local: PathBuf,
    remote: Mutex<Option<PathBuf>>,
    enabled: AtomicBool,
    filters: Mutex<Filters>,
    statuses: Mutex<Vec<String>>,
    report_delay: Mutex<Duration>,
    suspends: AtomicUsize,
    resumes: AtomicUsize,
    gate: NotificationGate,
}

impl RecordingHost {
    /// Sync enabled, default filters.
    pub fn new(local: impl Into<PathBuf>, remote: impl Into<PathBuf>) -> Self {
        Self {
            local: local.into(),
            remote: Mutex::new(Some(remote.into())),
            enabled: AtomicBool::new(true),
            filters: Mutex::new(SyncSettings::default().filters()),
            statuses: Mutex::new(Vec::new()),
            report_delay: Mutex::new(Duration::ZERO),
            suspends: AtomicUsize::new(0),
            resumes: AtomicUsize::new(0),
            gate: NotificationGate::new(),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn set_remote(&self, remote: Option<&Path>) {
        *self.remote.lock().unwrap() = remote.map(Path::to_path_buf);
    }

    pub fn set_filters(&self, filters: Filters) {
        *self.filters.lock().unwrap() = filters;
    }

    /// Stall every status report for `delay`.
    ///
    /// Runs report their summary after applying, so this keeps a run in
    /// progress after its scan and copies have finished.
    pub fn set_report_delay(&self, delay: Duration) {
        *self.report_delay.lock().unwrap() = delay;
    }

    /// Every status notice reported so far, oldest first.
    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().unwrap().clone()
    }

    pub fn suspend_count(&self) -> usize {
        self.suspends.load(Ordering::SeqCst)
    }

    pub fn resume_count(&self) -> usize {
        self.resumes.load(Ordering::SeqCst)
    }

    /// Gate toggled by suspend/resume, for pairing with a change watcher.
    pub fn gate(&self) -> &NotificationGate {
        &self.gate
    }
}

impl SyncHost for RecordingHost {
    fn is_sync_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn local_root(&self) -> PathBuf {
        self.local.clone()
    }

    fn remote_root(&self) -> Option<PathBuf> {
        self.remote.lock().unwrap().clone()
    }

    fn filters(&self) -> Filters {
        self.filters.lock().unwrap().clone()
    }

    fn report_status(&self, message: &str) {
        self.statuses.lock().unwrap().push(message.to_string());
        let delay = *self.report_delay.lock().unwrap();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    fn suspend_change_notifications(&self) {
        self.suspends.fetch_add(1, Ordering::SeqCst);
        self.gate.suspend();
    }

    fn resume_change_notifications(&self) {
        self.resumes.fetch_add(1, Ordering::SeqCst);
        self.gate.resume();
    }
}
