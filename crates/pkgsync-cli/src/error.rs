//! Errors surfaced by the `pkgsync` binary

pub type Result<T> = std::result::Result<T, CliError>;

/// Anything that makes a command exit non-zero.
///
/// Library errors pass through unchanged so their messages reach the
/// terminal as written.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] pkgsync_core::Error),

    #[error(transparent)]
    Fs(#[from] pkgsync_fs::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// `status --json` could not render its output
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    /// Bad invocation or a failed run, already phrased for the user
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
