//! Replaying adapters that serve recorded interactions.

pub mod github;
pub mod id_gen;
pub mod todoist;

pub use github::ReplayingGitHub;
pub use id_gen::ReplayingIdGenerator;
pub use todoist::ReplayingTodoist;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::GhtError;

/// Take the recorded output of the next `port::method` call.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    next_call(replayer, port, method).1
}

/// Take the recorded `(input, output)` of the next `port::method` call.
pub(crate) fn next_call(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> (serde_json::Value, serde_json::Value) {
    let mut guard = replayer.lock().expect("replayer lock poisoned");
    let interaction = guard.next_interaction(port, method);
    (interaction.input.clone(), interaction.output.clone())
}

/// `port::method` pairs the replayer still holds unplayed interactions for.
pub(crate) fn unconsumed(replayer: &Mutex<CassetteReplayer>) -> Vec<String> {
    replayer.lock().expect("replayer lock poisoned").unconsumed()
}

/// Decode an output recorded by `recording::record_result`.
///
/// Recorded errors come back as the variant they were recorded as. A bare
/// string error carries no kind and replays as [`GhtError::Upstream`].
pub(crate) fn replay_result<T: DeserializeOwned>(output: serde_json::Value) -> Result<T, GhtError> {
    if let Some(err) = output.get("Err") {
        return Err(match err {
            serde_json::Value::String(message) => GhtError::Upstream(message.clone()),
            _ => {
                let field = |name: &str| {
                    err.get(name).and_then(serde_json::Value::as_str).unwrap_or_default().to_string()
                };
                GhtError::from_kind(&field("kind"), field("message"))
            }
        });
    }
    let value = output
        .get("Ok")
        .cloned()
        .unwrap_or_else(|| panic!("recorded result has neither Ok nor Err: {output}"));
    Ok(serde_json::from_value(value).expect("recorded Ok value has the wrong shape"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn replay_result_decodes_ok_and_err() {
        let ok: Result<String, GhtError> = replay_result(json!({"Ok": "octocat"}));
        assert_eq!(ok.unwrap(), "octocat");

        let err: Result<String, GhtError> = replay_result(json!({"Err": "boom"}));
        assert_eq!(err.unwrap_err().to_string(), "boom");
    }

    #[test]
    fn replay_result_keeps_error_kind() {
        let auth: Result<String, GhtError> = replay_result(
            json!({"Err": {"kind": "Authentication", "message": "GitHub API error (401): Bad credentials"}}),
        );
        let err = auth.unwrap_err();
        assert!(matches!(err, GhtError::Authentication(_)));
        assert_eq!(err.to_string(), "GitHub API error (401): Bad credentials");

        let config: Result<String, GhtError> =
            replay_result(json!({"Err": {"kind": "Config", "message": "No Project 'Work'"}}));
        assert!(matches!(config, Err(GhtError::Config(_))));
    }

    #[test]
    fn replay_result_decodes_null_ok_as_none() {
        let none: Result<Option<String>, GhtError> = replay_result(json!({"Ok": null}));
        assert!(none.unwrap().is_none());
    }
}
