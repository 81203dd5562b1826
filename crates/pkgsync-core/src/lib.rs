//! Sync engine for pkgsync
//!
//! Mirrors a local configuration directory with a remote directory reachable
//! through ordinary filesystem calls (a mounted share or a cloud-sync
//! folder). There is no server: both sides converge through periodic push
//! and pull runs.
//!
//! - **Scanning**: [`FileSetScanner`] walks a root with glob filters and
//!   directory pruning
//! - **Diffing**: [`push_diff`] and [`pull_diff`] compare local, remote and
//!   the last-push [`SyncSnapshot`]
//! - **Applying**: [`SyncExecutor`] copies and deletes, one action at a time
//! - **Scheduling**: [`DebounceScheduler`] collapses bursts of requests
//! - **Orchestration**: [`SyncOrchestrator`] runs push and pull against a
//!   [`SyncHost`]; [`SyncService`] is the trigger surface
//!
//! # Architecture
//!
//! ```text
//!                  pkgsync-cli
//!                       |
//!        SyncService -> SyncOrchestrator -> SyncHost
//!                       |
//!        scan -> diff -> executor    state (snapshot)
//!                       |
//!                   pkgsync-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use pkgsync_core::{SettingsHost, SyncOrchestrator};
//!
//! fn example() -> pkgsync_core::Result<()> {
//!     let orchestrator = SyncOrchestrator::new(SettingsHost::new("/home/me/.config/editor"));
//!     let report = orchestrator.push()?;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```

pub mod diff;
pub mod error;
pub mod executor;
pub mod host;
pub mod scan;
pub mod scheduler;
pub mod settings;
pub mod state;
pub mod sync;
pub mod watcher;

pub use diff::{DiffAction, pull_diff, push_diff};
pub use error::{Error, Result};
pub use executor::{ApplyFailure, ApplyReport, SyncExecutor};
pub use host::{NotificationGate, SettingsHost, SyncHost};
pub use scan::{FileEntry, FileSet, FileSetScanner, Filters, scan};
pub use scheduler::{DebounceScheduler, DebounceState};
pub use settings::SyncSettings;
pub use state::{SnapshotEntry, SyncSnapshot, SyncStateStore};
pub use sync::{Direction, RequestOutcome, SyncOptions, SyncOrchestrator, SyncReport, SyncService};
pub use watcher::ChangeWatcher;
