//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use super::format::{Cassette, Interaction};

/// Key for indexing interactions by port and method.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// Serves a cassette's interactions in order, independently per
/// port/method pair.
pub struct CassetteReplayer {
    queues: HashMap<PortMethodKey, Vec<Interaction>>,
    cursors: HashMap<PortMethodKey, usize>,
}

impl CassetteReplayer {
    /// Create a replayer over every interaction in `cassette`.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        Self::for_port(cassette, None)
    }

    /// Create a replayer restricted to one port, or all ports for `None`.
    #[must_use]
    pub fn for_port(cassette: &Cassette, port: Option<&str>) -> Self {
        let mut queues: HashMap<PortMethodKey, Vec<Interaction>> = HashMap::new();
        for interaction in
            cassette.interactions.iter().filter(|i| port.map_or(true, |p| i.port == p))
        {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues.entry(key).or_default().push(interaction.clone());
        }
        let cursors = queues.keys().map(|k| (k.clone(), 0)).collect();
        Self { queues, cursors }
    }

    /// Return the next interaction for the given port and method.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the pair. An
    /// unrecorded call during replay means the code under test did
    /// something the recording never did.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> &Interaction {
        let key = PortMethodKey { port: port.to_string(), method: method.to_string() };

        let Some(queue) = self.queues.get(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|k| format!("{}::{}", k.port, k.method)).collect();
            available.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            );
        };

        let cursor = self.cursors.entry(key).or_insert(0);
        assert!(
            *cursor < queue.len(),
            "Cassette exhausted: all {count} interactions for port={port:?} method={method:?} \
             have been consumed. Last interaction was seq={last_seq}.",
            count = queue.len(),
            last_seq = queue.last().map_or(0, |i| i.seq),
        );

        let interaction = &queue[*cursor];
        *cursor += 1;
        interaction
    }

    /// `port::method` pairs with interactions that were never replayed.
    #[must_use]
    pub fn unconsumed(&self) -> Vec<String> {
        let mut pending: Vec<String> = self
            .queues
            .iter()
            .filter(|(key, queue)| self.cursors.get(*key).copied().unwrap_or(0) < queue.len())
            .map(|(key, _)| format!("{}::{}", key.port, key.method))
            .collect();
        pending.sort();
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, port: &str, method: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: port.into(), method: method.into(), input: json!(null), output }
    }

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            version: "0.1.0".into(),
            interactions,
        }
    }

    #[test]
    fn replays_each_pair_in_order() {
        let cassette = make_cassette(vec![
            interaction(0, "id_gen", "generate_id", json!("a")),
            interaction(1, "todoist", "sync_state", json!({"Ok": {}})),
            interaction(2, "id_gen", "generate_id", json!("b")),
        ]);
        let mut replayer = CassetteReplayer::new(&cassette);

        assert_eq!(replayer.next_interaction("id_gen", "generate_id").output, json!("a"));
        assert_eq!(replayer.next_interaction("todoist", "sync_state").seq, 1);
        assert_eq!(replayer.next_interaction("id_gen", "generate_id").output, json!("b"));
        assert!(replayer.unconsumed().is_empty());
    }

    #[test]
    fn for_port_ignores_other_ports() {
        let cassette = make_cassette(vec![
            interaction(0, "github", "current_login", json!({"Ok": "octocat"})),
            interaction(1, "todoist", "sync_state", json!({"Ok": {}})),
        ]);
        let replayer = CassetteReplayer::for_port(&cassette, Some("github"));
        assert_eq!(replayer.unconsumed(), vec!["github::current_login"]);
    }

    #[test]
    #[should_panic(expected = "Cassette exhausted")]
    fn exhausted_replayer_panics_with_descriptive_message() {
        let cassette = make_cassette(vec![interaction(0, "id_gen", "generate_id", json!("a"))]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_interaction("id_gen", "generate_id");
        let _ = replayer.next_interaction("id_gen", "generate_id");
    }

    #[test]
    #[should_panic(expected = "no interactions recorded")]
    fn unrecorded_method_panics() {
        let cassette = make_cassette(vec![]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_interaction("todoist", "commit");
    }
}
