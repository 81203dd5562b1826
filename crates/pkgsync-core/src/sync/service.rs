//! Trigger surface for push and pull requests

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::Result;
use crate::host::SyncHost;
use crate::scheduler::{DebounceScheduler, DebounceState};

use super::orchestrator::SyncOrchestrator;
use super::report::SyncReport;

/// What happened to a push or pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The run happened synchronously
    Completed(SyncReport),
    /// A delayed run was armed
    Scheduled,
    /// Folded into a run that is already pending or executing
    Coalesced,
}

/// Owns one debounce scheduler per direction and routes requests to them.
///
/// Callers that react to change notifications use the debounced form; user
/// commands use the immediate form, which runs synchronously and returns the
/// report.
pub struct SyncService<H: SyncHost + 'static> {
    orchestrator: Arc<SyncOrchestrator<H>>,
    push: DebounceScheduler,
    pull: DebounceScheduler,
    pull_override: Arc<AtomicBool>,
}

impl<H: SyncHost + 'static> SyncService<H> {
    pub fn new(orchestrator: Arc<SyncOrchestrator<H>>, delay: Duration) -> Self {
        let push = {
            let orchestrator = Arc::clone(&orchestrator);
            DebounceScheduler::new("push", delay, move || {
                log_outcome("push", orchestrator.push());
            })
        };

        let pull_override = Arc::new(AtomicBool::new(false));
        let pull = {
            let orchestrator = Arc::clone(&orchestrator);
            let pull_override = Arc::clone(&pull_override);
            DebounceScheduler::new("pull", delay, move || {
                let override_local = pull_override.swap(false, Ordering::SeqCst);
                log_outcome("pull", orchestrator.pull(override_local));
            })
        };

        Self {
            orchestrator,
            push,
            pull,
            pull_override,
        }
    }

    pub fn orchestrator(&self) -> &Arc<SyncOrchestrator<H>> {
        &self.orchestrator
    }

    pub fn push_state(&self) -> DebounceState {
        self.push.state()
    }

    pub fn pull_state(&self) -> DebounceState {
        self.pull.state()
    }

    /// Request a push. `immediate` runs it now and returns its report.
    pub fn request_push(&self, immediate: bool) -> Result<RequestOutcome> {
        if immediate {
            return self.orchestrator.push().map(RequestOutcome::Completed);
        }
        Ok(outcome(self.push.request()))
    }

    /// Request a pull. `immediate` runs it now and returns its report.
    ///
    /// A debounced pull overrides local files if any request folded into it
    /// asked for override.
    pub fn request_pull(&self, immediate: bool, override_local: bool) -> Result<RequestOutcome> {
        if immediate {
            return self
                .orchestrator
                .pull(override_local)
                .map(RequestOutcome::Completed);
        }
        if override_local {
            self.pull_override.store(true, Ordering::SeqCst);
        }
        Ok(outcome(self.pull.request()))
    }

    /// Wait until neither direction has a pending or running job.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let push_idle = self.push.wait_idle(timeout);
        let remaining = deadline.saturating_duration_since(Instant::now());
        push_idle && self.pull.wait_idle(remaining)
    }
}

fn outcome(armed: bool) -> RequestOutcome {
    if armed {
        RequestOutcome::Scheduled
    } else {
        RequestOutcome::Coalesced
    }
}

fn log_outcome(direction: &str, result: Result<SyncReport>) {
    match result {
        Ok(report) if report.is_success() => {
            debug!(direction, actions = report.actions.len(), "debounced run finished");
        }
        Ok(report) => warn!(
            "Debounced {} finished with {} failed action(s)",
            direction,
            report.failures.len()
        ),
        Err(e) if e.is_configuration() => debug!(direction, error = %e, "debounced run skipped"),
        Err(e) => warn!("Debounced {} failed: {}", direction, e),
    }
}
