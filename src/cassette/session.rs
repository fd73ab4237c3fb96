//! Recording session that captures every port to its own cassette file.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::recorder::CassetteRecorder;
use crate::error::GhtError;

/// Per-port recorders for one command invocation.
///
/// Cassettes are written to `<dir>/<port>.cassette.yaml`.
pub struct RecordingSession {
    /// Recorder for GitHub interactions.
    pub github: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for Todoist interactions.
    pub todoist: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for temp-id generation.
    pub id_gen: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a session writing into `output_dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn at(output_dir: impl Into<PathBuf>) -> Result<Self, GhtError> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)?;

        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let make_recorder = |port: &str| -> Arc<Mutex<CassetteRecorder>> {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            Arc::new(Mutex::new(CassetteRecorder::new(path, format!("{timestamp}-{port}"))))
        };

        Ok(Self {
            github: make_recorder("github"),
            todoist: make_recorder("todoist"),
            id_gen: make_recorder("id_gen"),
            output_dir,
        })
    }

    /// Write every cassette to disk and return the output directory.
    ///
    /// Adapters holding recorder references must be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if a recorder is still shared or a file cannot be
    /// written.
    pub fn finish(self) -> Result<PathBuf, GhtError> {
        fn finish_one(arc: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), GhtError> {
            let recorder = Arc::try_unwrap(arc)
                .map_err(|_| {
                    GhtError::Io(std::io::Error::other(format!(
                        "Recording adapter for {port} still has references"
                    )))
                })?
                .into_inner()
                .map_err(|e| {
                    GhtError::Io(std::io::Error::other(format!(
                        "Recorder lock for {port} poisoned: {e}"
                    )))
                })?;
            recorder.finish()?;
            Ok(())
        }

        finish_one(self.github, "github")?;
        finish_one(self.todoist, "todoist")?;
        finish_one(self.id_gen, "id_gen")?;

        Ok(self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_writes_one_cassette_per_port() {
        let dir = std::env::temp_dir().join("ght_recording_session_test");
        let _ = std::fs::remove_dir_all(&dir);

        let session = RecordingSession::at(&dir).unwrap();
        session.id_gen.lock().unwrap().record("id_gen", "generate_id", json!(null), json!("x"));
        let output = session.finish().unwrap();

        assert_eq!(output, dir);
        for port in ["github", "todoist", "id_gen"] {
            assert!(dir.join(format!("{port}.cassette.yaml")).exists(), "{port} cassette missing");
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn finish_fails_while_recorder_is_shared() {
        let dir = std::env::temp_dir().join("ght_recording_session_shared_test");
        let session = RecordingSession::at(&dir).unwrap();
        let _held = Arc::clone(&session.github);
        assert!(session.finish().is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
