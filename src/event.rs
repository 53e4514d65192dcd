use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event name dispatched for a button click.
pub const CLICK: &str = "click";
/// Event name dispatched after a widget's value change is confirmed.
pub const VALUE_CHANGE: &str = "value-change";
/// Backend event kind announcing that the backend instance is ready.
pub const INSTANCE_READY: &str = "instance-ready";

/// An event reported by the backend access layer.
///
/// `kind` is a request kind when the backend reports that an operation started (`"scan"`,
/// `"query"`), or a completion kind when it finished (`"scan-result"`, `"query-result"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendEvent {
    pub kind: String,
    #[serde(default)]
    pub query_id: String,
    #[serde(default)]
    pub error: bool,
    /// Kind-specific payload, opaque to the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl BackendEvent {
    pub fn new(kind: impl Into<String>, query_id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            query_id: query_id.into(),
            error: false,
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn failed(mut self) -> Self {
        self.error = true;
        self
    }
}

/// An interaction reported by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum UiEvent {
    Click {
        widget_id: String,
    },
    /// A widget committed a new value for a cache address.
    ValueChange {
        widget_id: String,
        address: String,
        value: Value,
    },
}

impl UiEvent {
    pub fn widget_id(&self) -> &str {
        match self {
            Self::Click { widget_id } | Self::ValueChange { widget_id, .. } => widget_id,
        }
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Click { .. } => CLICK,
            Self::ValueChange { .. } => VALUE_CHANGE,
        }
    }
}

/// A single cache key update pushed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataChange {
    pub address: String,
    pub value: Value,
}
