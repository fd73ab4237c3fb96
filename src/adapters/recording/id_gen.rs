//! Recording adapter for the `IdGenerator` port.

use std::sync::{Arc, Mutex};

use super::record_interaction;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::IdGenerator;

/// Records generated ids while delegating to an inner implementation.
pub struct RecordingIdGenerator {
    inner: Box<dyn IdGenerator>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingIdGenerator {
    /// Wraps `inner`, recording every id into `recorder`.
    pub fn new(inner: Box<dyn IdGenerator>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl IdGenerator for RecordingIdGenerator {
    fn generate_id(&self) -> String {
        let id = self.inner.generate_id();
        record_interaction(&self.recorder, "id_gen", "generate_id", &(), &id);
        id
    }
}
