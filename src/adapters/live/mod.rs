//! Live adapters for real external interactions.

pub mod github;
pub mod id_gen;
pub mod todoist;

use github::DEFAULT_GITHUB_API_URL;
use todoist::DEFAULT_TODOIST_API_URL;

/// Overrides the GitHub API root (GitHub Enterprise, test servers).
pub const GITHUB_API_URL_ENV: &str = "GHT_GITHUB_API_URL";
/// Overrides the Todoist API root.
pub const TODOIST_API_URL_ENV: &str = "GHT_TODOIST_API_URL";

/// API roots used by the live adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    /// GitHub REST API root.
    pub github: String,
    /// Todoist API root.
    pub todoist: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self { github: DEFAULT_GITHUB_API_URL.into(), todoist: DEFAULT_TODOIST_API_URL.into() }
    }
}

impl ApiEndpoints {
    /// Public endpoints, overridden by `GHT_GITHUB_API_URL` and
    /// `GHT_TODOIST_API_URL` when set.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            github: std::env::var(GITHUB_API_URL_ENV).unwrap_or(defaults.github),
            todoist: std::env::var(TODOIST_API_URL_ENV).unwrap_or(defaults.todoist),
        }
    }
}
