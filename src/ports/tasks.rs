//! Task backend port for reading and mutating Todoist state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::GhtError;

/// A Todoist project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Remote identifier.
    pub id: String,
    /// Display name, matched exactly against configuration.
    pub name: String,
    /// Soft-delete flag.
    #[serde(default)]
    pub is_deleted: bool,
}

/// A Todoist personal label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Remote identifier.
    pub id: String,
    /// Label text.
    pub name: String,
    /// Soft-delete flag.
    #[serde(default)]
    pub is_deleted: bool,
}

/// A comment attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Remote identifier.
    pub id: String,
    /// Task the note belongs to.
    pub item_id: String,
    /// Free-text content.
    pub content: String,
    /// Soft-delete flag.
    #[serde(default)]
    pub is_deleted: bool,
}

/// A Todoist task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    /// Remote identifier.
    pub id: String,
    /// Task title.
    pub content: String,
    /// Owning project.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Parent task for sub-tasks.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Completion flag.
    #[serde(default)]
    pub checked: bool,
    /// Soft-delete flag.
    #[serde(default)]
    pub is_deleted: bool,
}

/// The slice of account state `ght` needs, read in one full sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// All projects.
    #[serde(default)]
    pub projects: Vec<Project>,
    /// All labels, including soft-deleted ones.
    #[serde(default)]
    pub labels: Vec<Label>,
    /// All task comments, including soft-deleted ones.
    #[serde(default)]
    pub notes: Vec<Note>,
    /// Active tasks.
    #[serde(default)]
    pub items: Vec<TaskItem>,
}

impl StateSnapshot {
    /// Returns the live (not deleted) task with the given id, if present.
    #[must_use]
    pub fn live_item(&self, id: &str) -> Option<&TaskItem> {
        self.items.iter().find(|item| item.id == id && !item.is_deleted)
    }
}

/// A single mutation queued for a batch commit.
///
/// `temp_id` lets later commands in the same batch refer to an object
/// created earlier in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncCommand {
    /// Create a label.
    LabelAdd {
        /// Client-side id for the new label.
        temp_id: String,
        /// Label text.
        name: String,
        /// Todoist color name.
        color: String,
    },
    /// Create a task.
    ItemAdd {
        /// Client-side id for the new task.
        temp_id: String,
        /// Task title.
        content: String,
        /// Target project; omitted for sub-tasks, which inherit it.
        project_id: Option<String>,
        /// Parent task id or temp id.
        parent_id: Option<String>,
        /// Label names to attach.
        labels: Vec<String>,
    },
    /// Attach a comment to a task.
    NoteAdd {
        /// Client-side id for the new note.
        temp_id: String,
        /// Task id or temp id.
        item_id: String,
        /// Comment text.
        content: String,
    },
}

impl SyncCommand {
    /// The client-side id of the object this command creates.
    #[must_use]
    pub fn temp_id(&self) -> &str {
        match self {
            Self::LabelAdd { temp_id, .. }
            | Self::ItemAdd { temp_id, .. }
            | Self::NoteAdd { temp_id, .. } => temp_id,
        }
    }

    /// Sync API command type name.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LabelAdd { .. } => "label_add",
            Self::ItemAdd { .. } => "item_add",
            Self::NoteAdd { .. } => "note_add",
        }
    }

    /// Sync API `args` object for this command.
    #[must_use]
    pub fn args(&self) -> serde_json::Value {
        match self {
            Self::LabelAdd { name, color, .. } => json!({ "name": name, "color": color }),
            Self::ItemAdd { content, project_id, parent_id, labels, .. } => {
                let mut args = json!({ "content": content, "labels": labels });
                if let Some(project_id) = project_id {
                    args["project_id"] = json!(project_id);
                }
                if let Some(parent_id) = parent_id {
                    args["parent_id"] = json!(parent_id);
                }
                args
            }
            Self::NoteAdd { item_id, content, .. } => {
                json!({ "item_id": item_id, "content": content })
            }
        }
    }
}

/// Result of a successful batch commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    /// Maps each command's temp id to the real id assigned remotely.
    #[serde(default)]
    pub temp_id_mapping: HashMap<String, String>,
}

impl CommitReceipt {
    /// Looks up the real id assigned to `temp_id`.
    #[must_use]
    pub fn resolve(&self, temp_id: &str) -> Option<&str> {
        self.temp_id_mapping.get(temp_id).map(String::as_str)
    }
}

/// Reads and mutates task-management state.
///
/// Abstracting the backend allows deterministic replay and testing
/// without touching a real Todoist account.
pub trait TaskBackend: Send + Sync {
    /// Reads a full snapshot of projects, labels, notes and tasks.
    ///
    /// # Errors
    ///
    /// Returns [`GhtError::Authentication`] if the token is rejected, or
    /// [`GhtError::Upstream`] on any other failure.
    fn sync_state(&self) -> Result<StateSnapshot, GhtError>;

    /// Fetches one task by id. `Ok(None)` means the task no longer exists.
    ///
    /// # Errors
    ///
    /// Returns an error for failures other than "not found".
    fn fetch_task(&self, id: &str) -> Result<Option<TaskItem>, GhtError>;

    /// Applies a batch of commands atomically from the caller's view.
    ///
    /// # Errors
    ///
    /// Returns [`GhtError::Upstream`] if the request fails or any command
    /// is rejected.
    fn commit(&self, commands: &[SyncCommand]) -> Result<CommitReceipt, GhtError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_add_args_omit_missing_ids() {
        let command = SyncCommand::ItemAdd {
            temp_id: "t1".into(),
            content: "Make PR".into(),
            project_id: None,
            parent_id: Some("t0".into()),
            labels: vec![],
        };
        let args = command.args();
        assert_eq!(args["parent_id"], "t0");
        assert!(args.get("project_id").is_none());
        assert_eq!(command.kind(), "item_add");
        assert_eq!(command.temp_id(), "t1");
    }

    #[test]
    fn live_item_skips_deleted_tasks() {
        let snapshot = StateSnapshot {
            items: vec![TaskItem {
                id: "9".into(),
                content: "gone".into(),
                project_id: None,
                parent_id: None,
                checked: false,
                is_deleted: true,
            }],
            ..StateSnapshot::default()
        };
        assert!(snapshot.live_item("9").is_none());
    }

    #[test]
    fn snapshot_tolerates_missing_flags() {
        let snapshot: StateSnapshot = serde_json::from_value(json!({
            "projects": [{"id": "1", "name": "Inbox"}],
            "notes": [{"id": "n", "item_id": "5", "content": "hi"}]
        }))
        .unwrap();
        assert!(!snapshot.projects[0].is_deleted);
        assert!(!snapshot.notes[0].is_deleted);
        assert!(snapshot.labels.is_empty());
    }
}
