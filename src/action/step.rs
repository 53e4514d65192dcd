use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A backend request template carried by an action step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendOp {
    /// Request kind, e.g. `"scan"`, `"query"` or `"batch-request"`.
    pub kind: String,
    /// Correlation id; the backend echoes it on every event about this request.
    pub query_id: String,
    /// Data cache address holding the SQL text, resolved at dispatch time.
    pub sql_ref: Option<String>,
}

impl BackendOp {
    pub fn new(kind: impl Into<String>, query_id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            query_id: query_id.into(),
            sql_ref: None,
        }
    }

    pub fn with_sql_ref(mut self, address: impl Into<String>) -> Self {
        self.sql_ref = Some(address.into());
        self
    }
}

/// One validated step of an action sequence.
///
/// Any combination of effects may be present; they apply pop, then push, then backend op.
/// A step with no effect at all is rejected when the table is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStep {
    pub pop_rname: Option<String>,
    pub push_widget_id: Option<String>,
    pub backend_op: Option<BackendOp>,
}

impl ActionStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pop(mut self, name_or_id: impl Into<String>) -> Self {
        self.pop_rname = Some(name_or_id.into());
        self
    }

    pub fn with_push(mut self, widget_id: impl Into<String>) -> Self {
        self.push_widget_id = Some(widget_id.into());
        self
    }

    pub fn with_backend_op(mut self, op: BackendOp) -> Self {
        self.backend_op = Some(op);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pop_rname.is_none() && self.push_widget_id.is_none() && self.backend_op.is_none()
    }
}

impl fmt::Display for ActionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(name) = &self.pop_rname {
            parts.push(format!("pop({})", name));
        }
        if let Some(id) = &self.push_widget_id {
            parts.push(format!("push({})", id));
        }
        if let Some(op) = &self.backend_op {
            match &op.sql_ref {
                Some(sql_ref) => parts.push(format!("{}({}, ${})", op.kind, op.query_id, sql_ref)),
                None => parts.push(format!("{}({})", op.kind, op.query_id)),
            }
        }
        write!(f, "{}", parts.join(" + "))
    }
}

/// An ordered, immutable list of steps addressed by its compound key.
///
/// Cloning is cheap: in-flight entries share the steps with the action table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSequence {
    key: Arc<str>,
    steps: Arc<[ActionStep]>,
}

impl ActionSequence {
    pub fn new(key: impl Into<Arc<str>>, steps: Vec<ActionStep>) -> Self {
        Self {
            key: key.into(),
            steps: steps.into(),
        }
    }

    /// The compound key this sequence was loaded under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn steps(&self) -> &[ActionStep] {
        &self.steps
    }

    pub fn get(&self, index: usize) -> Option<&ActionStep> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
