//! pkgsync CLI
//!
//! Keeps an editor configuration directory in step with a shared folder.

mod cli;
mod commands;
mod error;
mod logging;

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let Cli {
        verbose,
        local,
        command,
    } = Cli::parse();
    logging::init(verbose)?;

    let local = local_root(local)?;
    tracing::debug!(local = %local.display(), ?command, "dispatching");
    dispatch(&local, command)
}

/// `--local` if given, otherwise the working directory.
fn local_root(local: Option<PathBuf>) -> Result<PathBuf> {
    let path = local.map_or_else(std::env::current_dir, Ok)?;
    Ok(pkgsync_fs::canonical_root(&path))
}

fn dispatch(local: &Path, command: Commands) -> Result<()> {
    match command {
        Commands::Init {
            sync_folder,
            include,
            ignore,
            force,
        } => commands::run_init(local, sync_folder, include, ignore, force),
        Commands::Push { dry_run } => commands::run_push(local, dry_run),
        Commands::Pull {
            override_local,
            dry_run,
        } => commands::run_pull(local, override_local, dry_run),
        Commands::Status { json } => commands::run_status(local, json),
        Commands::Watch { max_polls } => commands::run_watch(local, max_polls),
    }
}
