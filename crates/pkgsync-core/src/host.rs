//! Integration surface between the sync engine and the application hosting it
//!
//! The engine never reads settings or talks to a UI directly. It asks a
//! [`SyncHost`] for roots, filters and the enabled flag, reports short
//! status notices through it, and pauses the host's change notifications
//! while a pull writes into the local root.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use crate::scan::Filters;
use crate::settings::SyncSettings;

/// Services the sync engine needs from its host.
pub trait SyncHost: Send + Sync {
    /// Whether syncing is switched on.
    fn is_sync_enabled(&self) -> bool;

    /// The local root.
    fn local_root(&self) -> PathBuf;

    /// The remote root, if one is configured.
    fn remote_root(&self) -> Option<PathBuf>;

    /// Filters for both scans of a run.
    fn filters(&self) -> Filters;

    /// Show a short notice to the user. Must not block.
    fn report_status(&self, message: &str);

    /// Stop reacting to local changes until resumed.
    fn suspend_change_notifications(&self);

    /// Undo one [`SyncHost::suspend_change_notifications`].
    fn resume_change_notifications(&self);
}

impl<H: SyncHost + ?Sized> SyncHost for Arc<H> {
    fn is_sync_enabled(&self) -> bool {
        (**self).is_sync_enabled()
    }

    fn local_root(&self) -> PathBuf {
        (**self).local_root()
    }

    fn remote_root(&self) -> Option<PathBuf> {
        (**self).remote_root()
    }

    fn filters(&self) -> Filters {
        (**self).filters()
    }

    fn report_status(&self, message: &str) {
        (**self).report_status(message)
    }

    fn suspend_change_notifications(&self) {
        (**self).suspend_change_notifications()
    }

    fn resume_change_notifications(&self) {
        (**self).resume_change_notifications()
    }
}

/// Shared switch for change notifications.
///
/// Suspensions nest. Every resume bumps an epoch so observers can tell that
/// writes happened while they were not listening and rebaseline instead of
/// reacting to them.
#[derive(Debug, Clone, Default)]
pub struct NotificationGate {
    inner: Arc<GateInner>,
}

#[derive(Debug, Default)]
struct GateInner {
    depth: AtomicUsize,
    epoch: AtomicU64,
}

impl NotificationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suspend(&self) {
        self.inner.depth.fetch_add(1, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        let previous = self
            .inner
            .depth
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |d| d.checked_sub(1));
        if previous.is_err() {
            warn!("resume_change_notifications called without a matching suspend");
        }
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_suspended(&self) -> bool {
        self.inner.depth.load(Ordering::SeqCst) > 0
    }

    /// Number of resumes so far.
    pub fn epoch(&self) -> u64 {
        self.inner.epoch.load(Ordering::SeqCst)
    }
}

/// A host backed by the settings file in the local root.
///
/// Settings are reread on every call so edits apply to the next run.
/// Status notices go to the log and the most recent one is kept for
/// callers that want to show it.
#[derive(Debug)]
pub struct SettingsHost {
    local_root: PathBuf,
    gate: NotificationGate,
    last_status: Mutex<Option<String>>,
}

impl SettingsHost {
    pub fn new(local_root: impl Into<PathBuf>) -> Self {
        Self {
            local_root: local_root.into(),
            gate: NotificationGate::new(),
            last_status: Mutex::new(None),
        }
    }

    pub fn root(&self) -> &Path {
        &self.local_root
    }

    /// The gate toggled by suspend/resume, shared with change watchers.
    pub fn gate(&self) -> &NotificationGate {
        &self.gate
    }

    /// Current settings, or defaults (sync disabled) if the file is broken.
    pub fn settings(&self) -> SyncSettings {
        SyncSettings::load(&self.local_root).unwrap_or_else(|e| {
            warn!("Using default settings: {}", e);
            SyncSettings::default()
        })
    }

    /// The most recent status notice.
    pub fn last_status(&self) -> Option<String> {
        self.last_status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SyncHost for SettingsHost {
    fn is_sync_enabled(&self) -> bool {
        self.settings().sync
    }

    fn local_root(&self) -> PathBuf {
        self.local_root.clone()
    }

    fn remote_root(&self) -> Option<PathBuf> {
        self.settings()
            .sync_folder
            .filter(|p| !p.as_os_str().is_empty())
    }

    fn filters(&self) -> Filters {
        self.settings().filters()
    }

    fn report_status(&self, message: &str) {
        info!(target: "pkgsync::status", "{}", message);
        *self
            .last_status
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(message.to_string());
    }

    fn suspend_change_notifications(&self) {
        self.gate.suspend();
    }

    fn resume_change_notifications(&self) {
        self.gate.resume();
    }
}
