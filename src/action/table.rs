use super::conversion::convert_legacy_entry;
use super::definition::{is_compound_key, parse_sequence};
use super::step::{ActionSequence, ActionStep};
use crate::error::ActionDefinitionError;
use ahash::AHashMap;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Builds the Action Table lookup key for an actor and event.
pub fn compound_key(actor_id: &str, event_name: &str) -> String {
    format!("{}.{}", actor_id, event_name)
}

/// Validated mapping from compound keys to action sequences.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    sequences: AHashMap<String, ActionSequence>,
    rejected: Vec<ActionDefinitionError>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a raw `actions` map.
    ///
    /// Array values are sequences keyed by `<actor_id>.<event_name>`; object values under a
    /// plain actor id are legacy single-step entries. Malformed entries, and any definition whose
    /// key is already taken, are logged, recorded in [`ActionTable::rejected`], and left out of
    /// the table. The first definition of a key wins.
    pub fn from_definitions(definitions: &Map<String, Value>) -> Self {
        let mut table = Self::new();

        for (key, value) in definitions {
            let parsed = match value {
                _ if is_compound_key(key) => {
                    parse_sequence(key, value).map(|steps| vec![(key.clone(), steps)])
                }
                Value::Object(_) => convert_legacy_entry(key, value),
                _ => Err(ActionDefinitionError::MalformedKey(key.clone())),
            };

            match parsed {
                Ok(entries) => {
                    for (key, steps) in entries {
                        table.insert_validated(key, steps);
                    }
                }
                Err(e) => table.reject(e),
            }
        }

        debug!(
            sequences = table.sequences.len(),
            rejected = table.rejected.len(),
            "action table loaded"
        );
        table
    }

    /// Inserts a validated sequence unless its key is already defined.
    pub(crate) fn insert_validated(&mut self, key: String, steps: Vec<ActionStep>) {
        if self.sequences.contains_key(&key) {
            self.reject(ActionDefinitionError::DuplicateKey { key });
        } else {
            self.insert_keyed(key, steps);
        }
    }

    pub(crate) fn reject(&mut self, error: ActionDefinitionError) {
        warn!(error = %error, "rejected action definition");
        self.rejected.push(error);
    }

    /// Adds or replaces the sequence for `actor_id.event_name`.
    pub fn insert(&mut self, actor_id: &str, event_name: &str, steps: Vec<ActionStep>) {
        self.insert_keyed(compound_key(actor_id, event_name), steps);
    }

    pub(crate) fn insert_keyed(&mut self, key: String, steps: Vec<ActionStep>) {
        let sequence = ActionSequence::new(key.as_str(), steps);
        self.sequences.insert(key, sequence);
    }

    /// Looks up the sequence for the exact compound key; no wildcard or prefix matching.
    pub fn resolve(&self, actor_id: &str, event_name: &str) -> Option<&ActionSequence> {
        self.sequences.get(&compound_key(actor_id, event_name))
    }

    pub fn get(&self, key: &str) -> Option<&ActionSequence> {
        self.sequences.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sequences.keys().map(String::as_str)
    }

    pub fn sequences(&self) -> impl Iterator<Item = &ActionSequence> {
        self.sequences.values()
    }

    /// Definitions that failed validation when the table was loaded.
    pub fn rejected(&self) -> &[ActionDefinitionError] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}
