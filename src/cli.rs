//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

/// Top-level CLI parser for `ght`.
#[derive(Debug, Parser)]
#[command(name = "ght", version, about = "Track assigned GitHub issues in Todoist")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create Todoist tasks for assigned issues that are not tracked yet.
    Sync {
        /// Report what would be created without changing Todoist.
        #[arg(short = 'n', long)]
        dry_run: bool,
        /// Path to the configuration file.
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_sync_defaults() {
        let cli = Cli::parse_from(["ght", "sync"]);
        match cli.command {
            Command::Sync { dry_run, config } => {
                assert!(!dry_run);
                assert_eq!(config.to_str(), Some("ght.conf.yaml"));
            }
        }
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parses_short_dry_run_and_verbosity() {
        let cli = Cli::parse_from(["ght", "-vv", "sync", "-n", "-c", "other.yaml"]);
        let Command::Sync { dry_run, config } = cli.command;
        assert!(dry_run);
        assert_eq!(config.to_str(), Some("other.yaml"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["ght", "push"]).is_err());
    }
}
