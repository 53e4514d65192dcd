use super::step::{ActionStep, BackendOp};
use crate::error::ActionDefinitionError;
use serde::Deserialize;
use serde_json::Value;

/// A step as it appears in the layout document, before validation.
///
/// Field aliases accept the older `ui_pop` / `ui_push` / `db` spelling.
#[derive(Debug, Default, Deserialize)]
pub(super) struct RawActionStep {
    #[serde(default, alias = "ui_pop")]
    pub(super) pop_rname: Option<String>,
    #[serde(default, alias = "ui_push")]
    pub(super) push_widget_id: Option<String>,
    #[serde(default, alias = "db")]
    pub(super) backend_op: Option<RawBackendOp>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawBackendOp {
    #[serde(default, alias = "action")]
    pub(super) kind: Option<String>,
    #[serde(default)]
    pub(super) query_id: Option<String>,
    #[serde(default, alias = "sql_cname")]
    pub(super) sql_ref: Option<String>,
}

impl RawActionStep {
    /// Validates the raw step, mapping the backend op kind through `map_kind`.
    pub(super) fn validate(
        self,
        key: &str,
        index: usize,
        map_kind: impl Fn(String) -> String,
    ) -> Result<ActionStep, ActionDefinitionError> {
        let backend_op = match self.backend_op {
            Some(raw) => {
                let kind = non_empty(raw.kind).ok_or_else(|| missing(key, index, "backend_op.kind"))?;
                let query_id = non_empty(raw.query_id)
                    .ok_or_else(|| missing(key, index, "backend_op.query_id"))?;
                Some(BackendOp {
                    kind: map_kind(kind),
                    query_id,
                    sql_ref: non_empty(raw.sql_ref),
                })
            }
            None => None,
        };

        let step = ActionStep {
            pop_rname: self.pop_rname,
            push_widget_id: non_empty(self.push_widget_id),
            backend_op,
        };
        if step.is_empty() {
            return Err(ActionDefinitionError::EmptyStep {
                key: key.to_string(),
                index,
            });
        }
        Ok(step)
    }
}

/// Parses and validates one array-form action entry.
pub(super) fn parse_sequence(
    key: &str,
    value: &Value,
) -> Result<Vec<ActionStep>, ActionDefinitionError> {
    let Value::Array(items) = value else {
        return Err(ActionDefinitionError::NotAnArray {
            key: key.to_string(),
        });
    };
    if items.is_empty() {
        return Err(ActionDefinitionError::EmptySequence {
            key: key.to_string(),
        });
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let raw = RawActionStep::deserialize(item).map_err(|e| {
                ActionDefinitionError::InvalidStep {
                    key: key.to_string(),
                    index,
                    message: e.to_string(),
                }
            })?;
            raw.validate(key, index, |kind| kind)
        })
        .collect()
}

/// True when `key` has the `<actor_id>.<event_name>` shape with both halves non-empty.
pub(super) fn is_compound_key(key: &str) -> bool {
    match key.rsplit_once('.') {
        Some((actor, event)) => !actor.is_empty() && !event.is_empty(),
        None => false,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn missing(key: &str, index: usize, field: &'static str) -> ActionDefinitionError {
    ActionDefinitionError::MissingField {
        key: key.to_string(),
        index,
        field,
    }
}
