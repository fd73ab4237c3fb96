//! Issue source port for querying assigned issues.

use serde::{Deserialize, Serialize};

use crate::error::GhtError;

/// One issue as returned by the tracker's search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// Globally unique identifier assigned by the tracker.
    pub id: u64,
    /// Issue number within its repository.
    pub number: u64,
    /// Canonical web URL (`https://github.com/<org>/<repo>/issues/<n>`).
    pub html_url: String,
    /// Full, untruncated title.
    pub title: String,
}

/// Read-only access to an issue tracker.
///
/// Abstracting the tracker allows deterministic replay and testing
/// without touching the real GitHub API.
pub trait IssueSource: Send + Sync {
    /// Returns the login of the identity the token belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`GhtError::Authentication`] if the token is rejected, or
    /// [`GhtError::Upstream`] on any other failure.
    fn current_login(&self) -> Result<String, GhtError>;

    /// Lists every open issue assigned to `login`, in tracker order.
    ///
    /// # Errors
    ///
    /// Returns [`GhtError::Authentication`] if the token is rejected, or
    /// [`GhtError::Upstream`] on any other failure.
    fn search_assigned_open(&self, login: &str) -> Result<Vec<IssueRecord>, GhtError>;
}
