//! The `sync` pass: create a managed task for every untracked issue.
//!
//! Idempotent: an issue whose marker note points at a live task is
//! reported and left alone.

use console::style;
use tracing::info;

use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::GhtError;
use crate::issue::{list_assigned_open_issues, Issue};
use crate::sink::TaskSink;
use crate::tracking::{NoteMarkerStore, TrackedIssueStore, TrackedIssues};

/// Web URL of a Todoist task.
#[must_use]
pub fn task_url(task_id: &str) -> String {
    format!("https://todoist.com/showTask?id={task_id}")
}

/// What the sync will do for a single issue.
#[derive(Debug, PartialEq, Eq)]
pub enum SyncAction<'a> {
    /// A managed task already exists.
    AlreadyTracked {
        /// The issue.
        issue: &'a Issue,
        /// Its managed task.
        task_id: &'a str,
    },
    /// A managed task will be / was created.
    Create {
        /// The issue.
        issue: &'a Issue,
    },
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Assigned open issues found.
    pub found: usize,
    /// Issues that already had a managed task.
    pub already_tracked: usize,
    /// Issues a task was created for (or would be, in a dry run).
    pub created: usize,
}

/// Classifies each issue, keeping the issues' order.
#[must_use]
pub fn plan_sync<'a>(issues: &'a [Issue], tracked: &'a TrackedIssues) -> Vec<SyncAction<'a>> {
    issues
        .iter()
        .map(|issue| match tracked.task_for(&issue.marker_id()) {
            Some(task_id) => SyncAction::AlreadyTracked { issue, task_id },
            None => SyncAction::Create { issue },
        })
        .collect()
}

/// Runs one sync pass using marker notes as the tracking store.
///
/// # Errors
///
/// Returns the first fatal error; remaining issues are not processed.
pub fn sync(ctx: &ServiceContext, config: &Config, dry_run: bool) -> Result<SyncSummary, GhtError> {
    let store = NoteMarkerStore::new(ctx.todoist.as_ref());
    sync_with_store(ctx, &store, config, dry_run)
}

/// Runs one sync pass against an explicit tracking store.
///
/// # Errors
///
/// Returns the first fatal error; remaining issues are not processed.
pub fn sync_with_store(
    ctx: &ServiceContext,
    store: &dyn TrackedIssueStore,
    config: &Config,
    dry_run: bool,
) -> Result<SyncSummary, GhtError> {
    let login = ctx.github.current_login()?;
    let issues = list_assigned_open_issues(ctx.github.as_ref(), &login)?;

    println!("Found {} issues assigned to {login}", issues.len());
    for issue in &issues {
        println!("- {} - {}", issue.slug(), issue.title);
    }
    println!();

    let sink = TaskSink::open(ctx, config, dry_run)?;
    let tracked = store.load_tracked_issue_ids()?;
    info!(tracked = tracked.len(), "Loaded tracked issues");

    let mut summary = SyncSummary { found: issues.len(), ..SyncSummary::default() };
    for action in plan_sync(&issues, &tracked) {
        match action {
            SyncAction::AlreadyTracked { issue, task_id } => {
                println!("{}: Item already exists: {}", issue.slug(), task_url(task_id));
                summary.already_tracked += 1;
            }
            SyncAction::Create { issue } => {
                println!("{}", style(format!("{}: Creating item", issue.slug())).green());
                let created = sink.create_tracking_task(issue)?;
                info!(slug = %issue.slug(), task_id = %created.task_id, "Created managed task");
                summary.created += 1;
            }
        }
    }

    info!(
        found = summary.found,
        already_tracked = summary.already_tracked,
        created = summary.created,
        dry_run,
        "Sync finished"
    );
    Ok(summary)
}
