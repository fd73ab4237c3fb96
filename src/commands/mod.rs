//! Command dispatch and handlers.

pub mod sync;

use std::env;
use std::path::PathBuf;

use tracing::warn;

use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::error::GhtError;

/// Environment variable naming a directory to record cassettes into.
pub const RECORD_ENV: &str = "GHT_RECORD";

/// Dispatch a parsed command to its handler.
///
/// When `GHT_RECORD` is set to a directory path, every port interaction
/// is recorded to per-port cassette files in that directory.
///
/// # Errors
///
/// Returns an error if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), GhtError> {
    let session = match env::var(RECORD_ENV) {
        Ok(path) => Some(RecordingSession::at(PathBuf::from(path))?),
        Err(_) => None,
    };

    let result = match command {
        Command::Sync { dry_run, config } => sync::run(config, *dry_run, session.as_ref()),
    };

    // Cassettes are written even when the command failed.
    match session.map(RecordingSession::finish) {
        Some(Ok(output_dir)) => eprintln!("Recording saved to: {}", output_dir.display()),
        Some(Err(err)) => return finish_failed(result, err),
        None => {}
    }

    result
}

/// Result of a command whose recording could not be written. The command's
/// own error, if any, wins.
fn finish_failed(result: Result<(), GhtError>, finish_err: GhtError) -> Result<(), GhtError> {
    match result {
        Ok(()) => Err(finish_err),
        Err(err) => {
            warn!("Failed to save recording: {finish_err}");
            Err(err)
        }
    }
}
