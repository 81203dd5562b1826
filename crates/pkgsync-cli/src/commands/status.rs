//! Status command implementation

use std::path::{Path, PathBuf};

use colored::Colorize;
use pkgsync_core::{
    SettingsHost, SyncOptions, SyncOrchestrator, SyncReport, SyncSettings, SyncStateStore,
};
use serde::Serialize;

use crate::commands::sync::print_report;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct StatusOutput {
    local_root: PathBuf,
    settings_file: bool,
    sync_enabled: bool,
    sync_folder: Option<PathBuf>,
    snapshot_files: usize,
    push: Option<SyncReport>,
    pull: Option<SyncReport>,
    error: Option<String>,
}

/// Run the status command
///
/// Dry-runs both directions, so nothing on disk changes.
pub fn run_status(local: &Path, json: bool) -> Result<()> {
    let host = SettingsHost::new(local);
    let settings = host.settings();
    let snapshot = SyncStateStore::new(local).load();
    let orchestrator = SyncOrchestrator::new(host);

    let planned = orchestrator
        .push_with_options(SyncOptions::dry_run())
        .and_then(|push| {
            let pull = orchestrator.pull_with_options(false, SyncOptions::dry_run())?;
            Ok((push, pull))
        });

    let (push, pull, error) = match planned {
        Ok((push, pull)) => (Some(push), Some(pull), None),
        Err(e) => (None, None, Some(e.to_string())),
    };

    let output = StatusOutput {
        local_root: local.to_path_buf(),
        settings_file: SyncSettings::path(local).exists(),
        sync_enabled: settings.sync,
        sync_folder: settings.sync_folder,
        snapshot_files: snapshot.len(),
        push,
        pull,
        error,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_status(&output);
    Ok(())
}

fn print_status(output: &StatusOutput) {
    println!("{}", "Sync Status".bold());
    println!();
    println!("{}:    {}", "Local".dimmed(), output.local_root.display());
    match &output.sync_folder {
        Some(folder) => println!(
            "{}:   {}",
            "Remote".dimmed(),
            folder.display().to_string().cyan()
        ),
        None => println!("{}:   {}", "Remote".dimmed(), "not configured".yellow()),
    }
    let enabled = if output.sync_enabled {
        "enabled".green()
    } else {
        "disabled".yellow()
    };
    println!("{}:     {}", "Sync".dimmed(), enabled);
    println!("{}: {} file(s)", "Snapshot".dimmed(), output.snapshot_files);
    println!();

    if !output.settings_file {
        println!("Run {} to create settings.", "pkgsync init".cyan());
        return;
    }

    if let Some(error) = &output.error {
        println!("{} {}", "NOT READY".red().bold(), error);
        return;
    }

    for report in [&output.push, &output.pull].into_iter().flatten() {
        println!("{}:", report.direction.to_string().bold());
        print_report(report);
        println!();
    }
}
