//! Command-line surface of `pkgsync`

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Mirror an editor configuration directory through a shared folder
#[derive(Parser, Debug)]
#[command(name = "pkgsync", version, about)]
pub struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Local configuration directory (defaults to the current directory)
    #[arg(short, long, global = true, env = "PKGSYNC_LOCAL")]
    pub local: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Write a pkgsync.toml settings file in the local directory
    ///
    /// Examples:
    ///   pkgsync init                         # Sync disabled, edit later
    ///   pkgsync init /mnt/dropbox/editor     # Enable sync to that folder
    Init {
        /// Shared folder to sync with; enables sync when given
        sync_folder: Option<PathBuf>,

        /// Glob for files to include (repeatable, default "*")
        #[arg(short, long)]
        include: Vec<String>,

        /// Glob for files to ignore (repeatable)
        #[arg(short = 'x', long)]
        ignore: Vec<String>,

        /// Overwrite an existing settings file
        #[arg(short, long)]
        force: bool,
    },

    /// Copy local changes (including deletions) to the sync folder
    Push {
        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// Copy newer files from the sync folder into the local directory
    Pull {
        /// Overwrite local files even when they are newer
        #[arg(long = "override")]
        override_local: bool,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show settings and what push and pull would change
    Status {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Pull once, then push local changes and pull periodically until interrupted
    Watch {
        /// Stop after this many polls
        #[arg(long, hide = true)]
        max_polls: Option<u64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn pull_override_flag() {
        let cli = Cli::parse_from(["pkgsync", "pull", "--override"]);
        assert_eq!(
            cli.command,
            Commands::Pull {
                override_local: true,
                dry_run: false,
            }
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["pkgsync", "push", "--dry-run", "-v", "--local", "/tmp/cfg"]);
        assert!(cli.verbose);
        assert_eq!(cli.local, Some(PathBuf::from("/tmp/cfg")));
        assert_eq!(cli.command, Commands::Push { dry_run: true });
    }

    #[test]
    fn init_with_folder_and_patterns() {
        let cli = Cli::parse_from(["pkgsync", "init", "/mnt/share", "-i", "*.json", "-x", "*.log"]);
        assert_eq!(
            cli.command,
            Commands::Init {
                sync_folder: Some(PathBuf::from("/mnt/share")),
                include: vec!["*.json".into()],
                ignore: vec!["*.log".into()],
                force: false,
            }
        );
    }
}
