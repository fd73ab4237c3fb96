//! Normalized view of an assigned GitHub issue.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::GhtError;
use crate::ports::{IssueRecord, IssueSource};

/// Titles longer than this many words are shortened.
pub const MAX_TITLE_WORDS: usize = 5;

/// An issue assigned to the current user, ready for display and tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Tracker-wide identifier, persisted in marker notes.
    pub id: u64,
    /// `org/name` of the owning repository.
    pub repository: String,
    /// Issue number within the repository.
    pub number: u64,
    /// Canonical web URL.
    pub url: String,
    /// Display title, see [`truncate_title`].
    pub title: String,
}

impl Issue {
    /// Builds an issue from a search record, deriving the repository from
    /// the URL path.
    ///
    /// # Errors
    ///
    /// Returns [`GhtError::Upstream`] if the URL has no `org/repo` segments.
    pub fn from_record(record: &IssueRecord) -> Result<Self, GhtError> {
        let segments: Vec<&str> = record.html_url.split('/').collect();
        let (org, repo) = match segments.get(3..5) {
            Some([org, repo]) if !org.is_empty() && !repo.is_empty() => (*org, *repo),
            _ => {
                return Err(GhtError::Upstream(format!(
                    "Unexpected issue URL: {}",
                    record.html_url
                )))
            }
        };

        Ok(Self {
            id: record.id,
            repository: format!("{org}/{repo}"),
            number: record.number,
            url: record.html_url.clone(),
            title: truncate_title(&record.title),
        })
    }

    /// `<repository>#<number>`.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}#{}", self.repository, self.number)
    }

    /// Markdown link used as the task title.
    #[must_use]
    pub fn link(&self) -> String {
        format!("[{}]({}) - {}", self.slug(), self.url, self.title)
    }

    /// Identifier as stored in marker notes.
    #[must_use]
    pub fn marker_id(&self) -> String {
        self.id.to_string()
    }

    fn slug_order(&self, other: &Self) -> Ordering {
        self.repository.cmp(&other.repository).then(self.number.cmp(&other.number))
    }
}

/// Shortens a title to [`MAX_TITLE_WORDS`] words plus `...`.
///
/// Titles at or under the limit are returned verbatim.
#[must_use]
pub fn truncate_title(title: &str) -> String {
    let words: Vec<&str> = title.split_whitespace().collect();
    if words.len() > MAX_TITLE_WORDS {
        format!("{}...", words[..MAX_TITLE_WORDS].join(" "))
    } else {
        title.to_string()
    }
}

/// Fetches the open issues assigned to `login`, sorted by slug.
///
/// Repositories sort lexicographically and issue numbers numerically.
/// Records repeated across search pages are collapsed.
///
/// # Errors
///
/// Propagates source errors and malformed issue URLs.
pub fn list_assigned_open_issues(
    source: &dyn IssueSource,
    login: &str,
) -> Result<Vec<Issue>, GhtError> {
    let records = source.search_assigned_open(login)?;

    let mut seen = HashSet::new();
    let mut issues = Vec::with_capacity(records.len());
    for record in &records {
        if seen.insert(record.id) {
            issues.push(Issue::from_record(record)?);
        }
    }
    issues.sort_by(Issue::slug_order);
    Ok(issues)
}
