//! Watch command implementation

use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use colored::Colorize;
use pkgsync_core::{ChangeWatcher, RequestOutcome, SettingsHost, SyncOrchestrator, SyncService};
use tracing::{info, warn};

use crate::commands::sync::print_report;
use crate::error::Result;

/// How long to wait for in-flight runs when a bounded watch ends.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(60);

/// Run the watch command
///
/// Pulls once, then rescans the local directory every poll interval and
/// pushes changes after the debounce delay. The sync folder is pulled every
/// pull interval. Settings are read once for the intervals; everything else
/// is reread by each run.
pub fn run_watch(local: &Path, max_polls: Option<u64>) -> Result<()> {
    let host = Arc::new(SettingsHost::new(local));
    let settings = host.settings();
    let orchestrator = Arc::new(SyncOrchestrator::new(Arc::clone(&host)));
    let service = SyncService::new(orchestrator, settings.debounce());

    println!(
        "{} Watching {} (poll every {}s, push after {}s, pull every {}s)",
        "=>".blue().bold(),
        local.display(),
        settings.poll_interval().as_secs(),
        settings.debounce().as_secs(),
        settings.pull_interval().as_secs(),
    );

    match service.request_pull(true, false)? {
        RequestOutcome::Completed(report) => print_report(&report),
        outcome => info!("initial pull: {:?}", outcome),
    }

    let mut watcher = ChangeWatcher::new(host.gate().clone());
    watcher.poll_once(&service)?;

    let mut last_pull = Instant::now();
    let mut polls = 0u64;
    loop {
        if max_polls.is_some_and(|max| polls >= max) {
            break;
        }
        thread::sleep(settings.poll_interval());
        polls += 1;

        if let Err(e) = watcher.poll_once(&service) {
            warn!("Poll failed: {}", e);
        }

        if last_pull.elapsed() >= settings.pull_interval() {
            last_pull = Instant::now();
            service.request_pull(false, false)?;
        }
    }

    if !service.wait_idle(SHUTDOWN_GRACE) {
        warn!("Sync still running after {}s, exiting", SHUTDOWN_GRACE.as_secs());
    }
    println!("{} Stopped after {} poll(s).", "OK".green().bold(), polls);
    Ok(())
}
