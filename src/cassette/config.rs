//! Cassette configuration for composable per-port replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;
use crate::error::GhtError;

/// Per-port cassette file paths, matching the layout a
/// [`RecordingSession`](super::session::RecordingSession) writes.
///
/// Ports without a cassette panic when called during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the GitHub port cassette file.
    pub github: Option<PathBuf>,
    /// Path to the Todoist port cassette file.
    pub todoist: Option<PathBuf>,
    /// Path to the ID generator port cassette file.
    pub id_gen: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the GitHub port.
    pub github: Option<CassetteReplayer>,
    /// Replayer for the Todoist port.
    pub todoist: Option<CassetteReplayer>,
    /// Replayer for the ID generator port.
    pub id_gen: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Config for a directory produced by a recording session. Ports whose
    /// file is absent stay unconfigured.
    #[must_use]
    pub fn from_dir(dir: &Path) -> Self {
        let existing = |port: &str| {
            let path = dir.join(format!("{port}.cassette.yaml"));
            path.exists().then_some(path)
        };
        Self { github: existing("github"), todoist: existing("todoist"), id_gen: existing("id_gen") }
    }

    /// Load all configured per-port cassette files and create replayers.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, GhtError> {
        let load = |path: &Path| Cassette::load(path).map(|c| CassetteReplayer::new(&c));
        Ok(PortReplayers {
            github: self.github.as_deref().map(load).transpose()?,
            todoist: self.todoist.as_deref().map(load).transpose()?,
            id_gen: self.id_gen.as_deref().map(load).transpose()?,
        })
    }
}
