//! Polling change detection for the local root
//!
//! There is no filesystem event subscription. [`ChangeWatcher`] compares
//! successive scans and asks for a debounced push when the file set
//! changed. It stays quiet while notifications are suspended and
//! rebaselines after every resume, so files written by a pull never bounce
//! back as a push.

use std::collections::BTreeMap;

use tracing::debug;

use crate::Result;
use crate::host::{NotificationGate, SyncHost};
use crate::scan::FileSet;
use crate::sync::{RequestOutcome, SyncService};

/// Detects local changes between polls.
#[derive(Debug)]
pub struct ChangeWatcher {
    gate: NotificationGate,
    seen_epoch: u64,
    baseline: Option<BTreeMap<String, i64>>,
}

impl ChangeWatcher {
    pub fn new(gate: NotificationGate) -> Self {
        let seen_epoch = gate.epoch();
        Self {
            gate,
            seen_epoch,
            baseline: None,
        }
    }

    /// Compare `current` with the previous observation.
    ///
    /// Returns `true` when a file was added, removed or modified. The first
    /// observation, and the first one after a resume, only record a
    /// baseline.
    pub fn observe(&mut self, current: &FileSet) -> bool {
        if self.gate.is_suspended() {
            return false;
        }

        let versions = current.versions();
        let epoch = self.gate.epoch();
        if epoch != self.seen_epoch {
            debug!(epoch, "notifications resumed, rebaselining");
            self.seen_epoch = epoch;
            self.baseline = Some(versions);
            return false;
        }

        match &self.baseline {
            Some(previous) if *previous == versions => false,
            Some(_) => {
                self.baseline = Some(versions);
                true
            }
            None => {
                self.baseline = Some(versions);
                false
            }
        }
    }

    /// Scan the local root once and request a debounced push if it changed.
    ///
    /// Returns the request outcome when a push was requested.
    pub fn poll_once<H: SyncHost + 'static>(
        &mut self,
        service: &SyncService<H>,
    ) -> Result<Option<RequestOutcome>> {
        if self.gate.is_suspended() {
            return Ok(None);
        }
        let current = service.orchestrator().scan_local()?;
        if !self.observe(&current) {
            return Ok(None);
        }
        debug!(files = current.len(), "local change detected");
        service.request_push(false).map(Some)
    }
}
