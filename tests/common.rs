//! Common test utilities for building layout documents, action tables and harnesses.
use nodom::error::BackendError;
use nodom::prelude::*;
use nodom::sequencer::DispatchEnv;
use serde_json::json;
use std::sync::Arc;

/// The single-step scan button: push the loading modal and submit a scan.
#[allow(dead_code)]
pub fn create_scan_document() -> LayoutDocument {
    LayoutDocument::from_value(json!({
        "layout": [
            { "render_kind": "Home" },
            { "render_kind": "DuckParquetLoadingModal", "widget_id": "loading_modal" }
        ],
        "data": { "scan_sql": "SELECT 1" },
        "actions": {
            "scanbtn.click": [
                { "push_widget_id": "loading_modal",
                  "backend_op": { "kind": "scan", "query_id": "q1", "sql_ref": "scan_sql" } }
            ]
        }
    }))
    .expect("scan document should parse")
}

/// A three-step pipeline: scan, then summary query, then a batch fetch.
///
/// Step 0 raises the loading modal, step 1 drops it, step 2 raises the summary modal.
#[allow(dead_code)]
pub fn create_pipeline_document() -> LayoutDocument {
    LayoutDocument::from_value(json!({
        "layout": [
            { "render_kind": "Home",
              "config": { "title": "Depth" },
              "children": [
                  { "render_kind": "Button", "widget_id": "scanbtn", "config": { "text": "Scan" } }
              ] },
            { "render_kind": "DuckParquetLoadingModal", "widget_id": "loading_modal" },
            { "render_kind": "DuckTableSummaryModal", "widget_id": "summary_modal" }
        ],
        "data": {
            "scan_sql": "CREATE TABLE depth AS SELECT * FROM parquet_scan([])",
            "summary_sql": "SUMMARIZE SELECT * FROM depth",
            "depth_sql": "SELECT * FROM depth LIMIT 10"
        },
        "actions": {
            "scanbtn.click": [
                { "push_widget_id": "loading_modal",
                  "backend_op": { "kind": "scan", "query_id": "q_scan", "sql_ref": "scan_sql" } },
                { "pop_rname": "DuckParquetLoadingModal",
                  "backend_op": { "kind": "query", "query_id": "q_summary", "sql_ref": "summary_sql" } },
                { "push_widget_id": "summary_modal",
                  "backend_op": { "kind": "batch-request", "query_id": "q_depth", "sql_ref": "depth_sql" } }
            ]
        }
    }))
    .expect("pipeline document should parse")
}

/// The pipeline expressed in the older single-step-per-actor format.
#[allow(dead_code)]
pub fn create_legacy_document() -> LayoutDocument {
    LayoutDocument::from_value(json!({
        "layout": [
            { "rname": "Home", "cspec": { "title": "FGB" } },
            { "rname": "DuckParquetLoadingModal", "widget_id": "parquet_loading_modal" },
            { "rname": "DuckTableSummaryModal", "widget_id": "depth_summary_modal" }
        ],
        "data": {
            "scan_sql": "SELECT 1",
            "summary_sql": "SUMMARIZE SELECT * FROM depth",
            "actions": {
                "Scan": {
                    "nd_events": ["Button"],
                    "ui_push": "parquet_loading_modal",
                    "db": { "action": "ParquetScan", "sql_cname": "scan_sql", "query_id": "scan_qid" }
                },
                "scan_qid": {
                    "nd_events": ["ParquetScanResult"],
                    "ui_pop": "DuckParquetLoadingModal",
                    "db": { "action": "Query", "sql_cname": "summary_sql", "query_id": "summary_qid" }
                },
                "Summary": {
                    "nd_events": ["Button"],
                    "ui_push": "depth_summary_modal"
                }
            }
        }
    }))
    .expect("legacy document should parse")
}

#[allow(dead_code)]
pub fn create_context(document: LayoutDocument) -> Context<RecordingBackend> {
    Context::builder(document, RecordingBackend::new()).build()
}

#[allow(dead_code)]
pub fn request(kind: &str, query_id: &str, sql: Option<&str>) -> BackendRequest {
    BackendRequest {
        kind: kind.to_string(),
        query_id: query_id.to_string(),
        sql: sql.map(str::to_string),
    }
}

/// A backend that refuses every request.
#[allow(dead_code)]
pub struct OfflineBackend;

impl BackendAccess for OfflineBackend {
    fn submit(&mut self, _request: BackendRequest) -> std::result::Result<(), BackendError> {
        Err(BackendError::Unavailable("offline".to_string()))
    }
}

/// Standalone engine state for driving a [`Sequencer`] without a [`Context`].
#[allow(dead_code)]
pub struct Harness {
    pub pushables: Pushables,
    pub cache: DataCache,
    pub pending: PendingMutations,
    pub backend: RecordingBackend,
}

#[allow(dead_code)]
impl Harness {
    pub fn new(widgets: Vec<Widget>, data: Vec<(&str, serde_json::Value)>) -> Self {
        let layout: Vec<Arc<Widget>> = widgets.into_iter().map(Arc::new).collect();
        Self {
            pushables: Pushables::from_layout(&layout),
            cache: data
                .into_iter()
                .map(|(address, value)| (address.to_string(), value))
                .collect(),
            pending: PendingMutations::new(),
            backend: RecordingBackend::new(),
        }
    }

    pub fn dispatch(
        &mut self,
        sequencer: &mut Sequencer,
        actor_id: &str,
        event_name: &str,
    ) -> DispatchOutcome {
        let mut env = DispatchEnv {
            pushables: &self.pushables,
            cache: &self.cache,
            pending: &mut self.pending,
            backend: &mut self.backend,
        };
        sequencer.dispatch(actor_id, event_name, &mut env)
    }

    pub fn queued_pops(&self) -> Vec<String> {
        self.pending.pops().map(str::to_string).collect()
    }

    pub fn queued_pushes(&self) -> Vec<String> {
        self.pending.pushes().map(|w| w.label().to_string()).collect()
    }
}

/// Records the label of every widget rendered, one list per pass, and optionally clicks a
/// widget id each time a widget of `click_on` kind is rendered.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingRenderer {
    pub passes: Vec<Vec<String>>,
    pub click_on: Option<(String, String)>,
    pub outcomes: Vec<DispatchOutcome>,
}

#[allow(dead_code)]
impl RecordingRenderer {
    pub fn clicking(render_kind: &str, widget_id: &str) -> Self {
        Self {
            click_on: Some((render_kind.to_string(), widget_id.to_string())),
            ..Self::default()
        }
    }

    pub fn begin_pass(&mut self) {
        self.passes.push(Vec::new());
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, widget: &Widget, frame: &mut Frame<'_>) {
        if let Some(pass) = self.passes.last_mut() {
            pass.push(widget.label().to_string());
        }
        if let Some((kind, widget_id)) = &self.click_on {
            if &widget.render_kind == kind {
                let outcome = frame.on_ui_event(UiEvent::Click {
                    widget_id: widget_id.clone(),
                });
                self.outcomes.push(outcome);
            }
        }
    }
}
