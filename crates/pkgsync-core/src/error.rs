//! Error types for pkgsync-core

use std::path::PathBuf;

/// Result type for pkgsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pkgsync-core operations
///
/// Per-file problems during a scan or an apply are not errors: they are
/// logged and skipped. Only conditions that stop a whole run end up here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Sync is switched off in the settings
    #[error("Sync is disabled")]
    SyncDisabled,

    /// No sync folder configured
    #[error("Sync folder is not configured")]
    SyncFolderNotSet,

    /// Configured sync folder is missing or not a directory
    #[error("Invalid Sync Folder \"{}\"", path.display())]
    InvalidSyncFolder { path: PathBuf },

    /// A scan root is missing or not a directory
    #[error("Sync root {} is not a directory", path.display())]
    InvalidRoot { path: PathBuf },

    /// A filter pattern could not be compiled
    #[error("Invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Filesystem error from pkgsync-fs
    #[error(transparent)]
    Fs(#[from] pkgsync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error comes from the user's configuration rather than
    /// from the filesystem.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::SyncDisabled
                | Self::SyncFolderNotSet
                | Self::InvalidSyncFolder { .. }
                | Self::InvalidRoot { .. }
                | Self::InvalidPattern { .. }
        )
    }
}
