//! Operator configuration loaded from `ght.conf.yaml`.
//!
//! ```yaml
//! default: Inbox
//! mapping:
//!   org/repo: Work
//! labels:
//!   _default_: github
//!   waiting: waiting
//! templates:
//!   _default_:
//!     children:
//!       - Make PR
//!       - content: Review PR
//!         labels: [waiting]
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::GhtError;

/// Default config file name, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "ght.conf.yaml";

/// Label key attached to every top-level managed task.
pub const DEFAULT_LABEL_KEY: &str = "_default_";

/// Template name used for every issue.
pub const DEFAULT_TEMPLATE: &str = "_default_";

/// One child task in a template, resolved at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildTemplate {
    /// Content only, no labels.
    Plain(String),
    /// Content plus label keys from [`Config::labels`].
    Labeled(String, Vec<String>),
}

impl ChildTemplate {
    /// Task title for this child.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::Plain(content) | Self::Labeled(content, _) => content,
        }
    }

    /// Label keys to attach; empty for plain children.
    #[must_use]
    pub fn label_keys(&self) -> &[String] {
        match self {
            Self::Plain(_) => &[],
            Self::Labeled(_, keys) => keys,
        }
    }
}

/// Validated configuration for one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Project for repositories without a mapping.
    pub default_project: String,
    /// Repository (`org/name`) to project name.
    pub mapping: BTreeMap<String, String>,
    /// Symbolic label key to label text.
    pub labels: BTreeMap<String, String>,
    /// Children created under every top-level task, in order.
    pub children: Vec<ChildTemplate>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    default: String,
    #[serde(default)]
    mapping: BTreeMap<String, String>,
    #[serde(default)]
    labels: BTreeMap<String, String>,
    templates: Option<BTreeMap<String, RawTemplate>>,
}

#[derive(Debug, Deserialize)]
struct RawTemplate {
    #[serde(default)]
    children: Vec<RawChild>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawChild {
    Plain(String),
    Labeled {
        content: String,
        #[serde(default)]
        labels: Vec<String>,
    },
}

impl From<RawChild> for ChildTemplate {
    fn from(raw: RawChild) -> Self {
        match raw {
            RawChild::Plain(content) => Self::Plain(content),
            RawChild::Labeled { content, labels } if labels.is_empty() => Self::Plain(content),
            RawChild::Labeled { content, labels } => Self::Labeled(content, labels),
        }
    }
}

/// Template used when the config file has no `templates` table.
#[must_use]
pub fn builtin_children() -> Vec<ChildTemplate> {
    vec![
        ChildTemplate::Plain("Make PR".into()),
        ChildTemplate::Labeled("Review PR".into(), vec!["waiting".into()]),
        ChildTemplate::Plain("Merge PR".into()),
        ChildTemplate::Plain("Validate".into()),
    ]
}

impl Config {
    /// Reads and validates the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GhtError::Config`] if the file cannot be read, parsed or
    /// validated.
    pub fn load(path: &Path) -> Result<Self, GhtError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GhtError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml(&content).map_err(|e| match e {
            GhtError::Config(msg) => GhtError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Parses and validates configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`GhtError::Config`] for malformed YAML, a missing
    /// `_default_` label or template, or a child referencing an unknown
    /// label key.
    pub fn from_yaml(content: &str) -> Result<Self, GhtError> {
        let raw: RawConfig = serde_yaml::from_str(content)
            .map_err(|e| GhtError::Config(format!("Invalid configuration: {e}")))?;

        let children = match raw.templates {
            None => builtin_children(),
            Some(mut templates) => templates
                .remove(DEFAULT_TEMPLATE)
                .ok_or_else(|| {
                    GhtError::Config(format!("No template named '{DEFAULT_TEMPLATE}'"))
                })?
                .children
                .into_iter()
                .map(ChildTemplate::from)
                .collect(),
        };

        let config = Self {
            default_project: raw.default,
            mapping: raw.mapping,
            labels: raw.labels,
            children,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), GhtError> {
        if self.default_project.trim().is_empty() {
            return Err(GhtError::Config("'default' project name is empty".into()));
        }
        if !self.labels.contains_key(DEFAULT_LABEL_KEY) {
            return Err(GhtError::Config(format!("No label key '{DEFAULT_LABEL_KEY}' in 'labels'")));
        }
        for child in &self.children {
            for key in child.label_keys() {
                if !self.labels.contains_key(key) {
                    return Err(GhtError::Config(format!(
                        "Template child '{}' references unknown label key '{key}'",
                        child.content()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Project name for a repository, falling back to the default.
    #[must_use]
    pub fn project_name_for(&self, repository: &str) -> &str {
        self.mapping.get(repository).map_or(self.default_project.as_str(), String::as_str)
    }

    /// Every project name the run must resolve.
    #[must_use]
    pub fn project_names(&self) -> BTreeSet<&str> {
        std::iter::once(self.default_project.as_str())
            .chain(self.mapping.values().map(String::as_str))
            .collect()
    }
}
