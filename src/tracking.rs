//! Issue-to-task mapping persisted as marker notes.
//!
//! Each managed task carries a comment of the form
//!
//! ```text
//! #managed-by-ght
//! ghid=123456
//! ```
//!
//! The set of live marker notes is the only record of which issues are
//! already tracked.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::GhtError;
use crate::ports::{Note, TaskBackend};

/// First line of every marker note.
pub const MARKER_HEADER: &str = "#managed-by-ght";

/// Marker key holding the issue identifier.
pub const GHID_KEY: &str = "ghid";

/// Builds the marker note content for an issue.
#[must_use]
pub fn marker_content(issue_id: &str) -> String {
    format!("{MARKER_HEADER}\n{GHID_KEY}={issue_id}")
}

/// Returns `true` if the note content starts with the marker header.
#[must_use]
pub fn is_marker(content: &str) -> bool {
    content.starts_with(MARKER_HEADER)
}

/// Parses the `key=value` lines following the header.
///
/// Lines are split on the first `=`; blank lines are ignored.
///
/// # Errors
///
/// Returns [`GhtError::MalformedMarker`] for a non-blank line without `=`.
pub fn parse_marker(content: &str) -> Result<BTreeMap<String, String>, GhtError> {
    let mut fields = BTreeMap::new();
    for line in content.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| GhtError::MalformedMarker(format!("line {line:?} has no '='")))?;
        fields.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(fields)
}

/// Issue id to task id for every tracked issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedIssues {
    by_issue: BTreeMap<String, String>,
}

impl TrackedIssues {
    /// Builds the mapping from a set of notes.
    ///
    /// Deleted and non-marker notes are ignored; malformed markers are
    /// logged and skipped. A later marker for the same issue replaces an
    /// earlier one.
    #[must_use]
    pub fn from_notes(notes: &[Note]) -> Self {
        let mut by_issue = BTreeMap::new();
        for note in notes.iter().filter(|n| !n.is_deleted && is_marker(&n.content)) {
            let fields = match parse_marker(&note.content) {
                Ok(fields) => fields,
                Err(e) => {
                    warn!(note_id = %note.id, task_id = %note.item_id, "Skipping note: {e}");
                    continue;
                }
            };
            let Some(issue_id) = fields.get(GHID_KEY) else {
                continue;
            };
            if let Some(previous) = by_issue.insert(issue_id.clone(), note.item_id.clone()) {
                if previous != note.item_id {
                    warn!(
                        issue_id = %issue_id,
                        previous_task = %previous,
                        task = %note.item_id,
                        "Issue has markers on more than one task; using the later one"
                    );
                }
            }
        }
        Self { by_issue }
    }

    /// Task tracking the given issue, if any.
    #[must_use]
    pub fn task_for(&self, issue_id: &str) -> Option<&str> {
        self.by_issue.get(issue_id).map(String::as_str)
    }

    /// Number of tracked issues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_issue.len()
    }

    /// Returns `true` if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_issue.is_empty()
    }

    fn remove(&mut self, issue_id: &str) {
        self.by_issue.remove(issue_id);
    }
}

/// Source of truth for "is this issue already tracked".
///
/// Reconciliation only depends on this trait, so the marker-note encoding
/// can be replaced by another store.
pub trait TrackedIssueStore {
    /// Loads the full mapping once for the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing state cannot be read.
    fn load_tracked_issue_ids(&self) -> Result<TrackedIssues, GhtError>;
}

/// [`TrackedIssueStore`] backed by marker notes in the task backend.
pub struct NoteMarkerStore<'a> {
    backend: &'a dyn TaskBackend,
}

impl<'a> NoteMarkerStore<'a> {
    /// Creates a store reading from `backend`.
    #[must_use]
    pub fn new(backend: &'a dyn TaskBackend) -> Self {
        Self { backend }
    }
}

impl TrackedIssueStore for NoteMarkerStore<'_> {
    fn load_tracked_issue_ids(&self) -> Result<TrackedIssues, GhtError> {
        debug!("Loading marker notes");
        let snapshot = self.backend.sync_state()?;
        let mut tracked = TrackedIssues::from_notes(&snapshot.notes);

        // Completed tasks are missing from the snapshot but still exist.
        // Lookups go out in issue-id order.
        let unconfirmed: Vec<(String, String)> = tracked
            .by_issue
            .iter()
            .filter(|(_, task_id)| snapshot.live_item(task_id).is_none())
            .map(|(issue_id, task_id)| (issue_id.clone(), task_id.clone()))
            .collect();

        for (issue_id, task_id) in unconfirmed {
            match self.backend.fetch_task(&task_id)? {
                Some(task) if !task.is_deleted => {}
                _ => {
                    debug!(issue_id = %issue_id, task_id = %task_id, "Marker points at deleted task");
                    tracked.remove(&issue_id);
                }
            }
        }

        Ok(tracked)
    }
}
