use super::definition::is_compound_key;
use super::step::ActionStep;
use super::table::ActionTable;
use crate::error::{ActionDefinitionError, ArtifactError};
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;

/// A validated action table in a form that can be written to disk and loaded without
/// re-parsing the document's JSON definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledActionTable {
    pub entries: Vec<(String, Vec<ActionStep>)>,
}

impl CompiledActionTable {
    /// Writes the table to `path` in the bincode format.
    pub fn save(&self, path: &str) -> Result<(), ArtifactError> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).map_err(|e| io_error("write", path, e))
    }

    /// Reads a table previously written by [`CompiledActionTable::save`].
    pub fn from_file(path: &str) -> Result<Self, ArtifactError> {
        let bytes = fs::read(path).map_err(|e| io_error("read", path, e))?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        encode_to_vec(self, standard())
            .map_err(|e| ArtifactError::Generic(format!("Could not encode action table: {}", e)))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        decode_from_slice(bytes, standard())
            .map(|(table, _)| table)
            .map_err(|e| ArtifactError::Generic(format!("Could not decode action table: {}", e)))
    }
}

fn io_error(action: &str, path: &str, error: std::io::Error) -> ArtifactError {
    ArtifactError::Generic(format!("Could not {} action table '{}': {}", action, path, error))
}

impl ActionTable {
    /// Snapshots the validated sequences, sorted by key so the output is stable.
    pub fn compile(&self) -> CompiledActionTable {
        let mut entries: Vec<(String, Vec<ActionStep>)> = self
            .sequences()
            .map(|sequence| (sequence.key().to_string(), sequence.steps().to_vec()))
            .collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        CompiledActionTable { entries }
    }

    /// Rebuilds a table from an artifact.
    ///
    /// Artifacts come from disk, so entries are checked again: a malformed key, an empty step
    /// list, an empty step or a repeated key is rejected the same way as at document load.
    pub fn from_compiled(compiled: CompiledActionTable) -> Self {
        let mut table = Self::new();
        for (key, steps) in compiled.entries {
            match check_compiled_entry(&key, &steps) {
                Ok(()) => table.insert_validated(key, steps),
                Err(e) => table.reject(e),
            }
        }
        table
    }
}

fn check_compiled_entry(key: &str, steps: &[ActionStep]) -> Result<(), ActionDefinitionError> {
    if !is_compound_key(key) {
        return Err(ActionDefinitionError::MalformedKey(key.to_string()));
    }
    if steps.is_empty() {
        return Err(ActionDefinitionError::EmptySequence {
            key: key.to_string(),
        });
    }
    match steps.iter().position(ActionStep::is_empty) {
        Some(index) => Err(ActionDefinitionError::EmptyStep {
            key: key.to_string(),
            index,
        }),
        None => Ok(()),
    }
}
