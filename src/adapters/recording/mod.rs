//! Recording adapters that capture interactions to cassettes.

pub mod github;
pub mod id_gen;
pub mod todoist;

pub use github::RecordingGitHub;
pub use id_gen::RecordingIdGenerator;
pub use todoist::RecordingTodoist;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;
use crate::error::GhtError;

/// Record an interaction with a plain (non-Result) return value.
pub(crate) fn record_interaction<I, O>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    let input_json = serde_json::to_value(input).expect("failed to serialize recording input");
    let output_json = serde_json::to_value(output).expect("failed to serialize recording output");

    let mut guard = recorder.lock().expect("recorder lock poisoned");
    guard.record(port, method, input_json, output_json);
}

/// Record a `Result<T, GhtError>` interaction.
///
/// `Ok(v)` is stored as `{"Ok": v}` and `Err(e)` as
/// `{"Err": {"kind": .., "message": ..}}` so replay rebuilds the same
/// error variant; `replaying::replay_result` reads the same shape back.
pub(crate) fn record_result<T, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, GhtError>,
) where
    T: Serialize,
    I: Serialize,
{
    let input_json = serde_json::to_value(input).expect("failed to serialize recording input");

    let output_json = match result {
        Ok(v) => {
            let inner = serde_json::to_value(v).expect("failed to serialize Ok value");
            serde_json::json!({ "Ok": inner })
        }
        Err(e) => serde_json::json!({ "Err": { "kind": e.kind(), "message": e.detail() } }),
    };

    let mut guard = recorder.lock().expect("recorder lock poisoned");
    guard.record(port, method, input_json, output_json);
}
