//! `ght sync` command.

use std::path::Path;

use tracing::debug;

use crate::adapters::live::ApiEndpoints;
use crate::cassette::session::RecordingSession;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::credentials::Credentials;
use crate::error::GhtError;
use crate::reconcile;

/// Execute the `sync` command against the live APIs.
///
/// Token files are looked up in the working directory.
///
/// # Errors
///
/// Returns an error if configuration or credentials are missing, or the
/// sync pass fails.
pub fn run(
    config_path: &Path,
    dry_run: bool,
    session: Option<&RecordingSession>,
) -> Result<(), GhtError> {
    let config = Config::load(config_path)?;
    let credentials = Credentials::load(Path::new("."))?;
    let endpoints = ApiEndpoints::from_env();
    debug!(?endpoints, dry_run, "Starting sync");

    let ctx = match session {
        Some(session) => ServiceContext::recording(&credentials, &endpoints, session)?,
        None => ServiceContext::live(&credentials, &endpoints)?,
    };
    run_with_context(&ctx, &config, dry_run)
}

/// Execute the `sync` command with an explicit service context.
///
/// # Errors
///
/// Returns an error if the sync pass fails.
pub fn run_with_context(
    ctx: &ServiceContext,
    config: &Config,
    dry_run: bool,
) -> Result<(), GhtError> {
    let summary = reconcile::sync(ctx, config, dry_run)?;
    if dry_run {
        println!();
        println!("Dry run: {} of {} issues would get a new task", summary.created, summary.found);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_fails_before_credentials() {
        let err = run(Path::new("/nonexistent/ght.conf.yaml"), true, None).unwrap_err();
        assert!(matches!(err, GhtError::Config(_)));
    }
}
