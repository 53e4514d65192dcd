use super::definition::RawActionStep;
use super::step::ActionStep;
use super::table::{ActionTable, compound_key};
use crate::error::ActionDefinitionError;
use crate::layout::LayoutDocument;
use serde::Deserialize;
use serde_json::{Map, Value};

/// A trait for sources that can be turned into a validated [`ActionTable`].
///
/// Hosts with their own action format implement this to feed the engine; the crate provides
/// implementations for raw JSON action maps and for a whole [`LayoutDocument`].
///
/// # Example
///
/// ```rust
/// use nodom::action::{ActionStep, ActionTable, BackendOp, IntoActionTable};
///
/// struct ScanButton {
///     id: String,
/// }
///
/// impl IntoActionTable for ScanButton {
///     fn into_action_table(self) -> ActionTable {
///         let mut table = ActionTable::new();
///         table.insert(
///             &self.id,
///             "click",
///             vec![ActionStep::new()
///                 .with_push("loading_modal")
///                 .with_backend_op(BackendOp::new("scan", "q1").with_sql_ref("scan_sql"))],
///         );
///         table
///     }
/// }
///
/// let table = ScanButton { id: "scanbtn".into() }.into_action_table();
/// assert!(table.resolve("scanbtn", "click").is_some());
/// ```
pub trait IntoActionTable {
    fn into_action_table(self) -> ActionTable;
}

impl IntoActionTable for &Map<String, Value> {
    fn into_action_table(self) -> ActionTable {
        ActionTable::from_definitions(self)
    }
}

impl IntoActionTable for &LayoutDocument {
    fn into_action_table(self) -> ActionTable {
        ActionTable::from_definitions(&self.actions)
    }
}

/// An action entry in the older single-step format, keyed by actor id alone.
#[derive(Deserialize)]
struct LegacyEntry {
    #[serde(default)]
    nd_events: Vec<String>,
    #[serde(flatten)]
    step: RawActionStep,
}

/// Maps event and request names used by older documents to the engine's names.
pub fn legacy_event_name(name: &str) -> &str {
    match name {
        "Button" => "click",
        "ParquetScan" => "scan",
        "ParquetScanResult" => "scan-result",
        "Query" => "query",
        "QueryResult" => "query-result",
        "BatchRequest" => "batch-request",
        "BatchResponse" => "batch-response",
        other => other,
    }
}

/// Converts one legacy entry into a single-step sequence per listed event.
pub(super) fn convert_legacy_entry(
    actor: &str,
    value: &Value,
) -> Result<Vec<(String, Vec<ActionStep>)>, ActionDefinitionError> {
    let entry = LegacyEntry::deserialize(value).map_err(|e| ActionDefinitionError::InvalidStep {
        key: actor.to_string(),
        index: 0,
        message: e.to_string(),
    })?;
    if entry.nd_events.is_empty() {
        return Err(ActionDefinitionError::LegacyMissingEvents {
            actor: actor.to_string(),
        });
    }

    let step = entry
        .step
        .validate(actor, 0, |kind| legacy_event_name(&kind).to_string())?;

    Ok(entry
        .nd_events
        .iter()
        .map(|event| {
            (
                compound_key(actor, legacy_event_name(event)),
                vec![step.clone()],
            )
        })
        .collect())
}
