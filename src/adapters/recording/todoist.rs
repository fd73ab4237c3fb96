//! Recording adapter for the `TaskBackend` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::GhtError;
use crate::ports::{CommitReceipt, StateSnapshot, SyncCommand, TaskBackend, TaskItem};

/// Records Todoist calls while delegating to an inner implementation.
pub struct RecordingTodoist {
    inner: Box<dyn TaskBackend>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingTodoist {
    /// Wraps `inner`, recording every call into `recorder`.
    pub fn new(inner: Box<dyn TaskBackend>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct FetchTaskInput<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct CommitInput<'a> {
    commands: &'a [SyncCommand],
}

impl TaskBackend for RecordingTodoist {
    fn sync_state(&self) -> Result<StateSnapshot, GhtError> {
        let result = self.inner.sync_state();
        record_result(&self.recorder, "todoist", "sync_state", &(), &result);
        result
    }

    fn fetch_task(&self, id: &str) -> Result<Option<TaskItem>, GhtError> {
        let result = self.inner.fetch_task(id);
        record_result(&self.recorder, "todoist", "fetch_task", &FetchTaskInput { id }, &result);
        result
    }

    fn commit(&self, commands: &[SyncCommand]) -> Result<CommitReceipt, GhtError> {
        let result = self.inner.commit(commands);
        record_result(&self.recorder, "todoist", "commit", &CommitInput { commands }, &result);
        result
    }
}
