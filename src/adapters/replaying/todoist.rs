//! Replaying adapter for the `TaskBackend` port.

use std::sync::Mutex;

use super::{next_call, next_output, replay_result, unconsumed};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::GhtError;
use crate::ports::{CommitReceipt, StateSnapshot, SyncCommand, TaskBackend, TaskItem};

/// Serves recorded Todoist responses from a cassette.
///
/// A `commit` call with no recorded counterpart panics, so replaying a
/// read-only recording proves the code under test mutated nothing.
pub struct ReplayingTodoist {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingTodoist {
    /// Create a replaying backend driven by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    /// `todoist::<method>` pairs with recorded calls that were never replayed.
    #[must_use]
    pub fn unconsumed(&self) -> Vec<String> {
        unconsumed(&self.replayer)
    }
}

impl TaskBackend for ReplayingTodoist {
    fn sync_state(&self) -> Result<StateSnapshot, GhtError> {
        replay_result(next_output(&self.replayer, "todoist", "sync_state"))
    }

    fn fetch_task(&self, id: &str) -> Result<Option<TaskItem>, GhtError> {
        let (input, output) = next_call(&self.replayer, "todoist", "fetch_task");
        let recorded = input.get("id").and_then(serde_json::Value::as_str);
        assert!(
            recorded == Some(id),
            "Cassette mismatch: todoist::fetch_task called with id={id:?}, \
             but the next recorded call was for id={recorded:?}"
        );
        replay_result(output)
    }

    fn commit(&self, _commands: &[SyncCommand]) -> Result<CommitReceipt, GhtError> {
        replay_result(next_output(&self.replayer, "todoist", "commit"))
    }
}
