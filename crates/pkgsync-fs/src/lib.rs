//! Filesystem primitives for pkgsync
//!
//! Provides normalized relative paths, atomic locked writes, the
//! metadata-preserving copy used when mirroring files, and a
//! format-agnostic settings store.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::{ConfigFormat, ConfigStore};
pub use constants::SyncFile;
pub use error::{Error, Result};
pub use path::{NormalizedPath, canonical_root};
