use ahash::AHashMap;
use serde_json::{Map, Value};
use tracing::debug;

/// Mutable store of cache addresses to values, shared by the renderer and the engine.
///
/// The engine itself only reads through [`DataCache::get`] (to resolve SQL addresses) and writes
/// backend result payloads and data changes; widgets read and write their own addresses.
#[derive(Debug, Clone, Default)]
pub struct DataCache {
    values: AHashMap<String, Value>,
}

impl DataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: &str) -> Option<&Value> {
        self.values.get(address)
    }

    /// The value at `address` when it holds a string.
    pub fn text(&self, address: &str) -> Option<&str> {
        self.values.get(address).and_then(Value::as_str)
    }

    /// Stores `value` at `address`, returning the previous value.
    pub fn set(&mut self, address: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(address.into(), value)
    }

    /// Applies a single-key update pushed by the backend.
    pub fn apply_change(&mut self, address: &str, value: Value) {
        debug!(address, "data change");
        self.values.insert(address.to_string(), value);
    }

    pub fn contains(&self, address: &str) -> bool {
        self.values.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Map<String, Value>> for DataCache {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            values: map.into_iter().collect(),
        }
    }
}

impl FromIterator<(String, Value)> for DataCache {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
