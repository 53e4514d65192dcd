use crate::backend::BackendRequest;
use crate::error::LoadError;
use crate::stack::PopPolicy;
use serde::Deserialize;
use std::fs;

/// Host-tunable engine behaviour. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub pop_policy: PopPolicy,
    /// Place the first layout widget on the render stack when the context is built.
    pub push_home: bool,
    /// Completion payloads are stored in the data cache at `<query_id><result_suffix>`.
    pub result_suffix: String,
    /// Request submitted when the backend reports `instance-ready`.
    pub probe_query: Option<BackendRequest>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pop_policy: PopPolicy::Strict,
            push_home: true,
            result_suffix: "_result".to_string(),
            probe_query: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        serde_json::from_str(json).map_err(|e| LoadError::JsonParseError(e.to_string()))
    }

    pub fn from_file(path: &str) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// Cache address that receives the payload of a completed request.
    pub fn result_address(&self, query_id: &str) -> String {
        format!("{}{}", query_id, self.result_suffix)
    }
}
