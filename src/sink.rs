//! Todoist side of the sync: namespace resolution and task-tree creation.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

use crate::config::{Config, DEFAULT_LABEL_KEY};
use crate::context::ServiceContext;
use crate::error::GhtError;
use crate::issue::Issue;
use crate::ports::{StateSnapshot, SyncCommand};
use crate::tracking::marker_content;

/// Color given to labels created by `ght`.
pub const DEFAULT_LABEL_COLOR: &str = "grey";

/// Stands in for remote ids during a dry run.
pub const PLACEHOLDER_ID: &str = "PLACEHOLDER";

/// A resolved project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectHandle {
    /// Remote id.
    pub id: String,
    /// Project name.
    pub name: String,
}

/// A resolved label. `id` is `None` for a label a dry run would create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelHandle {
    /// Remote id, if the label exists.
    pub id: Option<String>,
    /// Label text, which is what tasks reference.
    pub name: String,
}

/// Outcome of [`TaskSink::create_tracking_task`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCreation {
    /// Id of the new top-level task, or [`PLACEHOLDER_ID`] in a dry run.
    pub task_id: String,
    /// Commands sent (or, in a dry run, that would have been sent).
    pub commands: Vec<SyncCommand>,
}

/// Creates managed task trees in the task backend.
///
/// Project and label lookups are cached on the instance for the lifetime
/// of one sync run.
pub struct TaskSink<'a> {
    ctx: &'a ServiceContext,
    dry_run: bool,
    snapshot: StateSnapshot,
    projects: HashMap<String, ProjectHandle>,
    labels: HashMap<String, LabelHandle>,
    label_keys: BTreeMap<String, LabelHandle>,
    config: Config,
}

impl<'a> TaskSink<'a> {
    /// Loads backend state and resolves every project and label the
    /// configuration names.
    ///
    /// Projects are resolved before labels so a bad project name fails the
    /// run before any label is created.
    ///
    /// # Errors
    ///
    /// Returns [`GhtError::Config`] for an unknown project, or a backend
    /// error if state cannot be read or a label cannot be created.
    pub fn open(ctx: &'a ServiceContext, config: &Config, dry_run: bool) -> Result<Self, GhtError> {
        let snapshot = ctx.todoist.sync_state()?;
        let mut sink = Self {
            ctx,
            dry_run,
            snapshot,
            projects: HashMap::new(),
            labels: HashMap::new(),
            label_keys: BTreeMap::new(),
            config: config.clone(),
        };

        for name in config.project_names() {
            sink.resolve_project(name)?;
        }
        for (key, text) in &config.labels {
            let handle = sink.resolve_or_create_label(text)?;
            sink.label_keys.insert(key.clone(), handle);
        }

        Ok(sink)
    }

    /// Looks up a project by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`GhtError::Config`] if no live project has that name.
    pub fn resolve_project(&mut self, name: &str) -> Result<ProjectHandle, GhtError> {
        if let Some(project) = self.projects.get(name) {
            return Ok(project.clone());
        }

        let project = self
            .snapshot
            .projects
            .iter()
            .filter(|p| !p.is_deleted)
            .find(|p| p.name == name)
            .map(|p| ProjectHandle { id: p.id.clone(), name: p.name.clone() })
            .ok_or_else(|| GhtError::Config(format!("No Project '{name}'")))?;

        info!(name, id = %project.id, "Found project");
        self.projects.insert(name.to_string(), project.clone());
        Ok(project)
    }

    /// Looks up a label by exact name, creating it when missing.
    ///
    /// In a dry run a missing label is reported and a handle without an id
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the label cannot be created.
    pub fn resolve_or_create_label(&mut self, name: &str) -> Result<LabelHandle, GhtError> {
        if let Some(label) = self.labels.get(name) {
            return Ok(label.clone());
        }

        let existing = self.snapshot.labels.iter().find(|l| l.name == name && !l.is_deleted);
        let label = if let Some(existing) = existing {
            info!(name, id = %existing.id, "Found label");
            LabelHandle { id: Some(existing.id.clone()), name: name.to_string() }
        } else {
            let command = SyncCommand::LabelAdd {
                temp_id: self.next_temp_id(),
                name: name.to_string(),
                color: DEFAULT_LABEL_COLOR.to_string(),
            };
            if self.dry_run {
                println!("{}", dry_run_line(&command));
                LabelHandle { id: None, name: name.to_string() }
            } else {
                let receipt = self.ctx.todoist.commit(std::slice::from_ref(&command))?;
                let id = receipt.resolve(command.temp_id()).map(str::to_string).ok_or_else(|| {
                    GhtError::Upstream(format!("Todoist returned no id for new label '{name}'"))
                })?;
                info!(name, %id, "Made label");
                LabelHandle { id: Some(id), name: name.to_string() }
            }
        };

        self.labels.insert(name.to_string(), label.clone());
        Ok(label)
    }

    /// Project an issue's task belongs in: the mapped project for its
    /// repository, otherwise the default project.
    ///
    /// # Errors
    ///
    /// Returns [`GhtError::Config`] if the project was never resolved.
    pub fn project_for(&self, repository: &str) -> Result<&ProjectHandle, GhtError> {
        let name = self.config.project_name_for(repository);
        self.projects.get(name).ok_or_else(|| GhtError::Config(format!("No Project '{name}'")))
    }

    fn label_for_key(&self, key: &str) -> Result<&LabelHandle, GhtError> {
        self.label_keys
            .get(key)
            .ok_or_else(|| GhtError::Config(format!("No label key '{key}' in 'labels'")))
    }

    fn next_temp_id(&self) -> String {
        if self.dry_run {
            PLACEHOLDER_ID.to_string()
        } else {
            self.ctx.id_gen.generate_id()
        }
    }

    /// Creates the top-level task, its marker note and the template
    /// children for `issue`, committed as one batch.
    ///
    /// In a dry run nothing is committed and each command is printed.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the commit fails; earlier commands in the
    /// batch may already have been applied.
    pub fn create_tracking_task(&self, issue: &Issue) -> Result<TaskCreation, GhtError> {
        let project = self.project_for(&issue.repository)?;
        let default_label = self.label_for_key(DEFAULT_LABEL_KEY)?;

        let top_id = self.next_temp_id();
        let mut commands = vec![
            SyncCommand::ItemAdd {
                temp_id: top_id.clone(),
                content: issue.link(),
                project_id: Some(project.id.clone()),
                parent_id: None,
                labels: vec![default_label.name.clone()],
            },
            SyncCommand::NoteAdd {
                temp_id: self.next_temp_id(),
                item_id: top_id.clone(),
                content: marker_content(&issue.marker_id()),
            },
        ];

        for child in &self.config.children {
            let labels = child
                .label_keys()
                .iter()
                .map(|key| self.label_for_key(key).map(|label| label.name.clone()))
                .collect::<Result<Vec<_>, _>>()?;
            commands.push(SyncCommand::ItemAdd {
                temp_id: self.next_temp_id(),
                content: child.content().to_string(),
                project_id: None,
                parent_id: Some(top_id.clone()),
                labels,
            });
        }

        if self.dry_run {
            for command in &commands {
                println!("{}", dry_run_line(command));
            }
            return Ok(TaskCreation { task_id: PLACEHOLDER_ID.to_string(), commands });
        }

        debug!(slug = %issue.slug(), commands = commands.len(), "Committing task tree");
        let receipt = self.ctx.todoist.commit(&commands)?;
        let task_id = receipt.resolve(&top_id).map(str::to_string).ok_or_else(|| {
            GhtError::Upstream(format!("Todoist returned no id for task of {}", issue.slug()))
        })?;
        Ok(TaskCreation { task_id, commands })
    }
}

/// Human-readable description of a command a dry run skips.
#[must_use]
pub fn dry_run_line(command: &SyncCommand) -> String {
    match command {
        SyncCommand::LabelAdd { name, .. } => format!("would create label: '{name}'"),
        SyncCommand::ItemAdd { content, parent_id: None, labels, .. } => {
            format!("would create item: '{content}' with labels {labels:?}")
        }
        SyncCommand::ItemAdd { content, labels, .. } => {
            format!("would add child: '{content}' with labels {labels:?}")
        }
        SyncCommand::NoteAdd { content, .. } => format!("would add note: {content:?}"),
    }
}
