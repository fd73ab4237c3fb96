//! Recording adapter for the `IssueSource` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::GhtError;
use crate::ports::{IssueRecord, IssueSource};

/// Records GitHub calls while delegating to an inner implementation.
pub struct RecordingGitHub {
    inner: Box<dyn IssueSource>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingGitHub {
    /// Wraps `inner`, recording every call into `recorder`.
    pub fn new(inner: Box<dyn IssueSource>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct SearchInput<'a> {
    login: &'a str,
}

impl IssueSource for RecordingGitHub {
    fn current_login(&self) -> Result<String, GhtError> {
        let result = self.inner.current_login();
        record_result(&self.recorder, "github", "current_login", &(), &result);
        result
    }

    fn search_assigned_open(&self, login: &str) -> Result<Vec<IssueRecord>, GhtError> {
        let result = self.inner.search_assigned_open(login);
        record_result(&self.recorder, "github", "search_assigned_open", &SearchInput { login }, &result);
        result
    }
}
