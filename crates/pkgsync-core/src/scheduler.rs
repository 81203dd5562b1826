//! Debounced execution of sync jobs
//!
//! Each direction owns one [`DebounceScheduler`]. A request arms a single
//! delayed run; further requests while that run is pending are coalesced
//! into it. The run scans the filesystem when it starts, so it sees every
//! change made before the delay expired. A request that arrives while the
//! job is executing may describe a change the job already missed, so it
//! re-arms the delay once the job returns.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

/// Where a scheduler is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// Nothing armed; the next request starts a delay
    Idle,
    /// A delay is running; requests are coalesced
    Pending,
    /// The job is executing; a request schedules one more run after it
    Running,
}

type Job = Arc<dyn Fn() + Send + Sync + 'static>;

#[derive(Debug)]
struct Cycle {
    state: DebounceState,
    /// Set by a request that arrived while the job was running
    rerun: bool,
}

struct Shared {
    cycle: Mutex<Cycle>,
    idle: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Cycle> {
        self.cycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start_run(&self) {
        self.lock().state = DebounceState::Running;
    }

    /// Leave `Running`. Returns `true` when another run was requested in
    /// the meantime, in which case the scheduler is `Pending` again.
    fn finish_run(&self) -> bool {
        let mut cycle = self.lock();
        if std::mem::take(&mut cycle.rerun) {
            cycle.state = DebounceState::Pending;
            return true;
        }
        cycle.state = DebounceState::Idle;
        self.idle.notify_all();
        false
    }

    fn reset(&self) {
        let mut cycle = self.lock();
        cycle.state = DebounceState::Idle;
        cycle.rerun = false;
        self.idle.notify_all();
    }
}

/// Delays a job and collapses bursts of requests into one execution.
pub struct DebounceScheduler {
    name: String,
    delay: Duration,
    job: Job,
    shared: Arc<Shared>,
}

impl std::fmt::Debug for DebounceScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebounceScheduler")
            .field("name", &self.name)
            .field("delay", &self.delay)
            .field("state", &self.state())
            .finish()
    }
}

impl DebounceScheduler {
    /// Create an idle scheduler that runs `job` `delay` after a request.
    pub fn new(
        name: impl Into<String>,
        delay: Duration,
        job: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            delay,
            job: Arc::new(job),
            shared: Arc::new(Shared {
                cycle: Mutex::new(Cycle {
                    state: DebounceState::Idle,
                    rerun: false,
                }),
                idle: Condvar::new(),
            }),
        }
    }

    pub fn state(&self) -> DebounceState {
        self.shared.lock().state
    }

    /// Ask for a delayed run.
    ///
    /// Returns `true` if this request armed a new delay, `false` if it was
    /// coalesced. A request coalesced into a running job still gets its own
    /// run, one delay after the job returns.
    pub fn request(&self) -> bool {
        {
            let mut cycle = self.shared.lock();
            match cycle.state {
                DebounceState::Idle => cycle.state = DebounceState::Pending,
                DebounceState::Pending => {
                    debug!(scheduler = %self.name, "request coalesced into pending run");
                    return false;
                }
                DebounceState::Running => {
                    cycle.rerun = true;
                    debug!(scheduler = %self.name, "request queued behind running job");
                    return false;
                }
            }
        }

        let shared = Arc::clone(&self.shared);
        let job = Arc::clone(&self.job);
        let delay = self.delay;
        let name = self.name.clone();

        let spawned = thread::Builder::new()
            .name(format!("pkgsync-{}", self.name))
            .spawn(move || {
                loop {
                    thread::sleep(delay);
                    shared.start_run();
                    debug!(scheduler = %name, "running debounced job");
                    if panic::catch_unwind(AssertUnwindSafe(|| job())).is_err() {
                        warn!("Debounced {} job panicked", name);
                    }
                    if !shared.finish_run() {
                        break;
                    }
                    debug!(scheduler = %name, "re-armed by a request made while running");
                }
            });

        match spawned {
            Ok(_) => {
                debug!(scheduler = %self.name, delay = ?self.delay, "armed");
                true
            }
            Err(e) => {
                warn!("Could not start {} timer: {}", self.name, e);
                self.shared.reset();
                false
            }
        }
    }

    /// Run the job now on the calling thread, bypassing the delay.
    pub fn run_now(&self) {
        (self.job)()
    }

    /// Block until the scheduler is idle or `timeout` elapses.
    ///
    /// Returns `true` if the scheduler is idle.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let guard = self.shared.lock();
        let (guard, _) = self
            .shared
            .idle
            .wait_timeout_while(guard, timeout, |c| c.state != DebounceState::Idle)
            .unwrap_or_else(PoisonError::into_inner);
        guard.state == DebounceState::Idle
    }
}
