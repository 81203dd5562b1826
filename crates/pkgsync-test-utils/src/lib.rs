//! Shared test utilities for the pkgsync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`roots`]: [`TestRoots`], a local/remote pair of temporary roots with
//!   controllable modification times
//! - [`host`]: [`RecordingHost`], a [`pkgsync_core::SyncHost`] that records
//!   what the engine asked of it

pub mod host;
pub mod roots;

pub use host::RecordingHost;
pub use roots::{TestRoots, mtime_of, set_mtime};
