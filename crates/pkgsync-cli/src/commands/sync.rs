//! Push and pull command implementations

use std::path::Path;

use colored::Colorize;
use pkgsync_core::{DiffAction, SettingsHost, SyncOptions, SyncOrchestrator, SyncReport};

use crate::error::{CliError, Result};

/// Run the push command
pub fn run_push(local: &Path, dry_run: bool) -> Result<()> {
    println!("{} Pushing {}...", "=>".blue().bold(), local.display());

    let orchestrator = SyncOrchestrator::new(SettingsHost::new(local));
    let report = orchestrator.push_with_options(SyncOptions { dry_run })?;

    print_report(&report);
    failures_to_error(&report)
}

/// Run the pull command
pub fn run_pull(local: &Path, override_local: bool, dry_run: bool) -> Result<()> {
    println!("{} Pulling into {}...", "=>".blue().bold(), local.display());

    let orchestrator = SyncOrchestrator::new(SettingsHost::new(local));
    let report = orchestrator.pull_with_options(override_local, SyncOptions { dry_run })?;

    print_report(&report);
    failures_to_error(&report)
}

/// Print the actions of a report, one per line.
pub fn print_report(report: &SyncReport) {
    if report.is_empty() {
        println!("{} Nothing to {}.", "OK".green().bold(), report.direction);
        return;
    }

    let prefix = if report.dry_run { "[dry-run] Would " } else { "" };
    for action in &report.actions {
        let (marker, verb) = match action {
            DiffAction::Create { .. } => ("+".green(), "create"),
            DiffAction::Update { .. } => ("~".yellow(), "update"),
            DiffAction::Delete { .. } => ("-".red(), "delete"),
        };
        println!(
            "   {} {}{} {}",
            marker,
            prefix,
            verb,
            action.target().display().to_string().cyan()
        );
    }

    for failure in &report.failures {
        println!(
            "   {} {}: {}",
            "!".red(),
            failure.action.target().display(),
            failure.message.dimmed()
        );
    }

    if report.is_success() {
        println!("{} {}", "OK".green().bold(), report.summary());
    }
}

fn failures_to_error(report: &SyncReport) -> Result<()> {
    if report.is_success() {
        return Ok(());
    }
    Err(CliError::user(format!(
        "{} action(s) failed; they will be retried on the next run",
        report.failures.len()
    )))
}
