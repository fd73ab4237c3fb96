//! Records interactions into a cassette file.

use std::path::PathBuf;

use chrono::Utc;

use super::format::{Cassette, Interaction};

/// Records interactions and writes them as a YAML cassette file.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    version: String,
    interactions: Vec<Interaction>,
    next_seq: u64,
}

impl CassetteRecorder {
    /// Create a new recorder that will write to the given path.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            interactions: Vec::new(),
            next_seq: 0,
        }
    }

    /// Record an interaction. The `seq` field is assigned automatically.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        self.interactions.push(Interaction {
            seq: self.next_seq,
            port: port.into(),
            method: method.into(),
            input,
            output,
        });
        self.next_seq += 1;
    }

    /// Finish recording and write the cassette YAML file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, std::io::Error> {
        let cassette = Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            version: self.version,
            interactions: self.interactions,
        };
        let yaml = serde_yaml::to_string(&cassette).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, yaml)?;
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_and_finish() {
        let dir = std::env::temp_dir().join("ght_cassette_recorder_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "test-recording");
        recorder.record("github", "current_login", json!(null), json!({"Ok": "octocat"}));
        recorder.record("id_gen", "generate_id", json!(null), json!("tmp-1"));

        let result_path = recorder.finish().expect("finish should succeed");
        assert_eq!(result_path, path);

        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.name, "test-recording");
        assert_eq!(cassette.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(cassette.interactions.len(), 2);
        assert_eq!(cassette.interactions[1].seq, 1);
        assert_eq!(cassette.interactions[1].port, "id_gen");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
