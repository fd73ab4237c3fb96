//! Core library entry for the `ght` CLI.
//!
//! `ght` mirrors the open GitHub issues assigned to the authenticated user
//! into Todoist as task trees, one tree per issue, each tagged with a
//! marker note so later runs skip issues that are already tracked.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod credentials;
pub mod error;
pub mod issue;
pub mod logging;
pub mod ports;
pub mod reconcile;
pub mod sink;
pub mod tracking;

use clap::Parser;

use crate::error::GhtError;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error when argument parsing fails or command execution fails.
/// Help and version requests come back as [`GhtError::Cli`].
pub fn run<I, T>(args: I) -> Result<(), GhtError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args)?;
    logging::init(cli.verbose);
    commands::dispatch(&cli.command)
}
