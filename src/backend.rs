use crate::error::BackendError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A request handed to the backend access layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendRequest {
    pub kind: String,
    pub query_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
}

/// The boundary to whatever executes backend operations (a database client, an RPC channel).
///
/// Submission is fire-and-forget: completion arrives later as a separate event through
/// `Frame::on_backend_event`.
pub trait BackendAccess {
    fn submit(&mut self, request: BackendRequest) -> Result<(), BackendError>;

    /// Called after the UI writes a cache address, so the backend can react to it.
    fn notify_change(&mut self, _address: &str, _old: Option<&Value>, _new: &Value) {}
}

impl<B: BackendAccess + ?Sized> BackendAccess for Box<B> {
    fn submit(&mut self, request: BackendRequest) -> Result<(), BackendError> {
        (**self).submit(request)
    }

    fn notify_change(&mut self, address: &str, old: Option<&Value>, new: &Value) {
        (**self).notify_change(address, old, new);
    }
}

/// A backend that records what it is given instead of executing it.
///
/// Useful for hosts that forward requests in batches and for replaying event scripts.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    pub requests: Vec<BackendRequest>,
    pub changes: Vec<(String, Value)>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every request recorded so far.
    pub fn take_requests(&mut self) -> Vec<BackendRequest> {
        std::mem::take(&mut self.requests)
    }
}

impl BackendAccess for RecordingBackend {
    fn submit(&mut self, request: BackendRequest) -> Result<(), BackendError> {
        self.requests.push(request);
        Ok(())
    }

    fn notify_change(&mut self, address: &str, _old: Option<&Value>, new: &Value) {
        self.changes.push((address.to_string(), new.clone()));
    }
}
