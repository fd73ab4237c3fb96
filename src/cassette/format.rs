//! Cassette data structures for recording and replaying port calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded call to an external port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name (`github`, `todoist`, `id_gen`).
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Arguments passed to the port.
    pub input: serde_json::Value,
    /// Value returned by the port.
    pub output: serde_json::Value,
}

/// A cassette containing a sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// `ght` version that produced the recording.
    pub version: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Reads a cassette from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &std::path::Path) -> Result<Self, crate::error::GhtError> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| {
            crate::error::GhtError::Config(format!(
                "Failed to parse cassette file {}: {e}",
                path.display()
            ))
        })
    }
}
