//! Init command implementation

use std::path::{Path, PathBuf};

use colored::Colorize;
use pkgsync_core::SyncSettings;

use crate::error::{CliError, Result};

/// Write a settings file for `local`.
///
/// Sync is enabled only when a sync folder is given. An existing settings
/// file is kept unless `force` is set.
pub fn run_init(
    local: &Path,
    sync_folder: Option<PathBuf>,
    include: Vec<String>,
    ignore: Vec<String>,
    force: bool,
) -> Result<()> {
    if !local.is_dir() {
        return Err(CliError::user(format!(
            "Local directory {} does not exist",
            local.display()
        )));
    }

    let path = SyncSettings::path(local);
    if path.exists() && !force {
        return Err(CliError::user(format!(
            "{} already exists (use --force to overwrite)",
            path
        )));
    }

    let mut settings = SyncSettings::default();
    if let Some(folder) = sync_folder {
        if !folder.is_dir() {
            println!(
                "{} Sync folder {} does not exist yet",
                "WARN".yellow().bold(),
                folder.display()
            );
        }
        settings.sync = true;
        settings.sync_folder = Some(pkgsync_fs::canonical_root(&folder));
    }
    if !include.is_empty() {
        settings.files_to_include = include;
    }
    settings.files_to_ignore = ignore;

    settings.save(local)?;

    println!("{} Wrote {}", "OK".green().bold(), path.to_string().cyan());
    match &settings.sync_folder {
        Some(folder) => println!("   Syncing with {}", folder.display()),
        None => println!(
            "   Sync is disabled; set {} and {} to enable it.",
            "sync".cyan(),
            "sync_folder".cyan()
        ),
    }
    Ok(())
}
