//! Push/pull orchestration and the debounced trigger surface

mod orchestrator;
mod report;
mod service;

pub use orchestrator::SyncOrchestrator;
pub use report::{Direction, SyncOptions, SyncReport};
pub use service::{RequestOutcome, SyncService};
