use thiserror::Error;

/// Errors that can occur while loading a layout document.
#[derive(Error, Debug, Clone)]
pub enum LoadError {
    #[error("Failed to parse layout document: {0}")]
    JsonParseError(String),

    #[error("Could not read '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Layout document field '{field}' has the wrong shape: expected {expected}")]
    InvalidShape {
        field: &'static str,
        expected: &'static str,
    },
}

/// A malformed entry found while validating the action table.
///
/// Each of these rejects only the entry (or step) it names; the rest of the table still loads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionDefinitionError {
    #[error("Action key '{0}' is not of the form '<actor_id>.<event_name>'")]
    MalformedKey(String),

    #[error("Action '{key}' must be an array of steps")]
    NotAnArray { key: String },

    #[error("Action '{key}' has no steps")]
    EmptySequence { key: String },

    #[error("Step {index} of action '{key}' is invalid: {message}")]
    InvalidStep {
        key: String,
        index: usize,
        message: String,
    },

    #[error("Step {index} of action '{key}' is missing required field '{field}'")]
    MissingField {
        key: String,
        index: usize,
        field: &'static str,
    },

    #[error("Step {index} of action '{key}' has no pop, push or backend operation")]
    EmptyStep { key: String, index: usize },

    #[error("Legacy action '{actor}' does not list any nd_events")]
    LegacyMissingEvents { actor: String },

    #[error("Action '{key}' is defined more than once; keeping the first definition")]
    DuplicateKey { key: String },
}

/// Errors raised while applying queued mutations to the render stack.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    #[error(
        "Pop of '{requested}' does not match top of stack '{top_kind}' (id: {})",
        .top_id.as_deref().unwrap_or("none")
    )]
    PopMismatch {
        requested: String,
        top_kind: String,
        top_id: Option<String>,
    },

    #[error("Pop of '{requested}' refused: render stack is empty")]
    EmptyStack { requested: String },
}

/// Errors raised while executing an action step.
///
/// None of these abort a dispatch; the failing effect is skipped and recorded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("No pushable widget with id '{widget_id}'")]
    UnknownPushable { widget_id: String },

    #[error("SQL address '{address}' does not resolve in the data cache")]
    UnresolvedSqlRef { address: String },

    #[error("SQL address '{address}' does not hold text")]
    SqlRefNotText { address: String },

    #[error("Step index {index} is out of range for action '{key}' of length {len}")]
    IndexOutOfRange { key: String, index: usize, len: usize },

    #[error("Backend rejected request: {0}")]
    Backend(#[from] BackendError),
}

/// Errors reported by a backend access layer when a request cannot be submitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Backend is not available: {0}")]
    Unavailable(String),

    #[error("Backend rejected request '{query_id}': {message}")]
    Rejected { query_id: String, message: String },
}

/// Errors raised while writing or reading a compiled action table.
#[derive(Error, Debug, Clone)]
pub enum ArtifactError {
    #[error("Action table artifact error: {0}")]
    Generic(String),
}
