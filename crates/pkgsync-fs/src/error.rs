//! Error types for pkgsync-fs

use std::path::PathBuf;

use crate::config::ConfigFormat;

/// Result type for pkgsync-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pkgsync-fs operations
///
/// Every variant carries the path it concerns, since callers usually log
/// the error next to a file name the user has to go and look at.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O call failed
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A settings or state file could not be parsed
    #[error("Invalid {format} in {}: {message}", path.display())]
    ConfigParse {
        path: PathBuf,
        format: ConfigFormat,
        message: String,
    },

    /// A value could not be rendered in the target format
    #[error("Cannot write {} as {format}: {message}", path.display())]
    ConfigSerialize {
        path: PathBuf,
        format: ConfigFormat,
        message: String,
    },

    /// No format is known for the file extension
    #[error("Unsupported config format: {extension:?}")]
    UnsupportedFormat { extension: String },

    /// A copy target's grandparent directory does not exist
    #[error("Parent directory of {} is missing and is more than one level deep", path.display())]
    MissingParent { path: PathBuf },

    /// The advisory lock on a file could not be taken or released
    #[error("Could not lock {}", path.display())]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
