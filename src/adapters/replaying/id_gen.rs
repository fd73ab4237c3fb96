//! Replaying adapter for the `IdGenerator` port.

use std::sync::Mutex;

use super::next_output;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::IdGenerator;

/// Replays recorded ids from a cassette.
pub struct ReplayingIdGenerator {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingIdGenerator {
    /// Creates a new replaying ID generator from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl IdGenerator for ReplayingIdGenerator {
    fn generate_id(&self) -> String {
        let output = next_output(&self.replayer, "id_gen", "generate_id");
        output.as_str().expect("id_gen::generate_id: expected string output").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn replays_ids_in_order() {
        let interactions = ["tmp-1", "tmp-2"]
            .iter()
            .zip(0..)
            .map(|(id, seq)| Interaction {
                seq,
                port: "id_gen".into(),
                method: "generate_id".into(),
                input: json!(null),
                output: json!(id),
            })
            .collect();
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            version: "0.1.0".into(),
            interactions,
        };
        let gen = ReplayingIdGenerator::new(CassetteReplayer::new(&cassette));
        assert_eq!(gen.generate_id(), "tmp-1");
        assert_eq!(gen.generate_id(), "tmp-2");
    }
}
