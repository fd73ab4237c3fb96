//! Replaying adapter for the `IssueSource` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::GhtError;
use crate::ports::{IssueRecord, IssueSource};

/// Serves recorded GitHub responses from a cassette.
pub struct ReplayingGitHub {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingGitHub {
    /// Create a replaying issue source backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl IssueSource for ReplayingGitHub {
    fn current_login(&self) -> Result<String, GhtError> {
        replay_result(next_output(&self.replayer, "github", "current_login"))
    }

    fn search_assigned_open(&self, _login: &str) -> Result<Vec<IssueRecord>, GhtError> {
        replay_result(next_output(&self.replayer, "github", "search_assigned_open"))
    }
}
