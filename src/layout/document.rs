use super::widget::Widget;
use crate::error::LoadError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;

/// The single startup load: widgets, initial data cache contents, and raw action definitions.
///
/// Actions are kept as raw JSON here; `ActionTable::from_definitions` validates them.
#[derive(Debug, Clone, Default)]
pub struct LayoutDocument {
    pub layout: Vec<Widget>,
    pub data: Map<String, Value>,
    pub actions: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    layout: Vec<Widget>,
    #[serde(default)]
    data: Map<String, Value>,
    #[serde(default)]
    actions: Option<Map<String, Value>>,
}

impl LayoutDocument {
    /// Parses a layout document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let raw: RawDocument =
            serde_json::from_str(json).map_err(|e| LoadError::JsonParseError(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Builds a layout document from an already parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, LoadError> {
        let raw: RawDocument =
            serde_json::from_value(value).map_err(|e| LoadError::JsonParseError(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Loads a layout document from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    fn from_raw(mut raw: RawDocument) -> Result<Self, LoadError> {
        // Older documents carry the action map inside the data cache.
        let actions = match raw.actions {
            Some(actions) => actions,
            None => match raw.data.remove("actions") {
                Some(Value::Object(actions)) => actions,
                Some(_) => {
                    return Err(LoadError::InvalidShape {
                        field: "data.actions",
                        expected: "an object",
                    });
                }
                None => Map::new(),
            },
        };

        Ok(Self {
            layout: raw.layout,
            data: raw.data,
            actions,
        })
    }
}
