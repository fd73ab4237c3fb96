//! API token discovery.

use std::path::Path;

use crate::error::GhtError;

/// Environment variable holding the GitHub token.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
/// Fallback file holding the GitHub token.
pub const GITHUB_TOKEN_FILE: &str = ".ghtoken";
/// File holding the Todoist token.
pub const TODOIST_TOKEN_FILE: &str = ".todoist-token";

/// Tokens for both remote systems.
#[derive(Clone)]
pub struct Credentials {
    /// GitHub personal access token.
    pub github_token: String,
    /// Todoist API token.
    pub todoist_token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("github_token", &"<redacted>")
            .field("todoist_token", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Loads both tokens, looking for token files in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`GhtError::Authentication`] if either token is missing.
    pub fn load(dir: &Path) -> Result<Self, GhtError> {
        let env_token = std::env::var(GITHUB_TOKEN_ENV).ok();
        Ok(Self {
            github_token: find_github_token(env_token, dir)?,
            todoist_token: find_todoist_token(dir)?,
        })
    }
}

/// Picks the GitHub token from the environment, then from `.ghtoken`.
///
/// # Errors
///
/// Returns [`GhtError::Authentication`] when neither source has a token.
pub fn find_github_token(env_token: Option<String>, dir: &Path) -> Result<String, GhtError> {
    if let Some(token) = env_token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
        return Ok(token);
    }
    read_token_file(&dir.join(GITHUB_TOKEN_FILE)).ok_or_else(|| {
        GhtError::Authentication(format!(
            "No GitHub token available. Set {GITHUB_TOKEN_ENV} or create {GITHUB_TOKEN_FILE} file"
        ))
    })
}

/// Reads the Todoist token from `.todoist-token`.
///
/// # Errors
///
/// Returns [`GhtError::Authentication`] when the file is missing or empty.
pub fn find_todoist_token(dir: &Path) -> Result<String, GhtError> {
    read_token_file(&dir.join(TODOIST_TOKEN_FILE)).ok_or_else(|| {
        GhtError::Authentication(format!(
            "No Todoist token available. Create {TODOIST_TOKEN_FILE} file"
        ))
    })
}

fn read_token_file(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .map(|content| content.trim().to_string())
        .filter(|token| !token.is_empty())
}
