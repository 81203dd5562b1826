//! Well-known files that live in the local sync root.

/// Files pkgsync keeps next to the synced content.
///
/// Both are always excluded from scans so the engine never mirrors its own
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncFile {
    /// User settings (`pkgsync.toml`)
    Settings,
    /// Snapshot of the local file set at the last push
    LastRun,
}

impl SyncFile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Settings => "pkgsync.toml",
            Self::LastRun => "pkgsync.last-run.json",
        }
    }

    /// Every state file, in the order scans append them to the file
    /// exclusions.
    pub fn all() -> [SyncFile; 2] {
        [Self::Settings, Self::LastRun]
    }
}
