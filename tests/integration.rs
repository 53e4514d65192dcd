//! End-to-end tests driving a [`Context`] the way a host application would.
mod common;
use common::*;
use nodom::action::CompiledActionTable;
use nodom::prelude::*;
use serde_json::json;

#[test]
fn test_home_is_pushed_on_build() {
    let context = create_context(create_pipeline_document());
    assert_eq!(context.stack().describe(), "Home");
    assert_eq!(context.pushables().len(), 2);
    assert_eq!(context.layout().len(), 3);
    assert_eq!(context.status(), BackendStatus::Idle);
    assert!(context.action_table().rejected().is_empty());
}

#[test]
fn test_scan_button_scenario() {
    let mut context = create_context(create_scan_document());

    let outcome = context.on_ui_event(UiEvent::Click {
        widget_id: "scanbtn".into(),
    });
    assert!(outcome.fresh_start);
    // Stack changes wait for the next drain.
    assert_eq!(context.stack().describe(), "Home");
    assert_eq!(context.pending().push_count(), 1);

    context.drain();
    assert_eq!(context.stack().describe(), "Home,loading_modal");
    assert_eq!(
        context.backend().requests,
        vec![request("scan", "q1", Some("SELECT 1"))]
    );
    assert!(context.in_flight().is_empty());
}

#[test]
fn test_full_pipeline_through_backend_events() {
    let mut context = create_context(create_pipeline_document());

    context.on_ui_event(UiEvent::Click {
        widget_id: "scanbtn".into(),
    });
    context.drain();
    assert_eq!(context.stack().describe(), "Home,loading_modal");
    assert_eq!(context.in_flight().len(), 1);
    assert_eq!(context.in_flight()[0].expected_event, "scan-result");
    assert_eq!(
        context.backend_mut().take_requests(),
        vec![request(
            "scan",
            "q_scan",
            Some("CREATE TABLE depth AS SELECT * FROM parquet_scan([])")
        )]
    );

    let outcome = context.on_backend_event(BackendEvent::new("scan-result", "q_scan"));
    assert_eq!(outcome.resumed, 1);
    context.drain();
    assert_eq!(context.stack().describe(), "Home");
    assert_eq!(context.in_flight()[0].expected_event, "query-result");
    assert_eq!(
        context.backend_mut().take_requests(),
        vec![request(
            "query",
            "q_summary",
            Some("SUMMARIZE SELECT * FROM depth")
        )]
    );

    let outcome = context.on_backend_event(BackendEvent::new("query-result", "q_summary"));
    assert_eq!(outcome.resumed, 1);
    assert_eq!(outcome.continuations, 0);
    context.drain();
    assert_eq!(context.stack().describe(), "Home,summary_modal");
    assert!(context.in_flight().is_empty());
    assert_eq!(
        context.backend_mut().take_requests(),
        vec![request(
            "batch-request",
            "q_depth",
            Some("SELECT * FROM depth LIMIT 10")
        )]
    );
}

#[test]
fn test_click_during_render_applies_on_next_pass() {
    let mut context = create_context(create_scan_document());
    let mut renderer = RecordingRenderer::clicking("Home", "scanbtn");

    renderer.begin_pass();
    let errors = context.render(&mut renderer);
    assert!(errors.is_empty());
    // The click queued a push but the pass itself saw the stack unchanged.
    assert_eq!(renderer.passes[0], vec!["Home"]);
    assert_eq!(context.stack().describe(), "Home");
    assert_eq!(context.pending().push_count(), 1);
    assert!(renderer.outcomes[0].fresh_start);

    renderer.click_on = None;
    renderer.begin_pass();
    context.render(&mut renderer);
    assert_eq!(renderer.passes[1], vec!["Home", "loading_modal"]);
    assert!(context.pending().is_empty());
}

#[test]
fn test_render_reports_refused_pops() {
    let mut table = ActionTable::new();
    table.insert("x", "click", vec![ActionStep::new().with_pop("loading_modal")]);
    let mut context = Context::builder(create_scan_document(), RecordingBackend::new())
        .with_action_table(table)
        .build();
    context.dispatch("x", "click");

    let mut renderer = RecordingRenderer::default();
    renderer.begin_pass();
    let errors = context.render(&mut renderer);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], StackError::PopMismatch { .. }));
    assert_eq!(context.stack().describe(), "Home");
    assert_eq!(renderer.passes[0], vec!["Home"]);
}

#[test]
fn test_unconditional_pop_policy_from_config() {
    let config = EngineConfig::from_json(r#"{ "pop_policy": "unconditional" }"#).unwrap();
    assert_eq!(config.pop_policy, PopPolicy::Unconditional);
    assert!(config.push_home);

    let mut table = ActionTable::new();
    table.insert("x", "click", vec![ActionStep::new().with_pop("loading_modal")]);
    let mut context = Context::builder(create_scan_document(), RecordingBackend::new())
        .with_config(config)
        .with_action_table(table)
        .build();

    context.dispatch("x", "click");
    let errors = context.drain();
    assert_eq!(errors.len(), 1);
    assert!(context.stack().is_empty());
}

#[test]
fn test_status_follows_backend_events() {
    let mut context = create_context(create_scan_document());
    assert_eq!(context.status().rgb(), (255, 51, 0));

    context.on_backend_event(BackendEvent::new("scan", "q1"));
    assert_eq!(context.status(), BackendStatus::InProgress);
    assert_eq!(context.status().rgb(), (255, 153, 0));

    context.on_backend_event(BackendEvent::new("scan-result", "q1"));
    assert_eq!(context.status(), BackendStatus::Complete);
    assert_eq!(context.status().rgb(), (102, 153, 0));

    // Unknown kinds leave the indicator alone.
    context.on_backend_event(BackendEvent::new("heartbeat", ""));
    assert_eq!(context.status(), BackendStatus::Complete);
}

#[test]
fn test_completion_payload_is_stored_in_cache() {
    let mut context = create_context(create_pipeline_document());
    let rows = json!([{ "column_name": "depth", "count": 10 }]);

    context.on_backend_event(BackendEvent::new("query-result", "q_summary").with_payload(rows.clone()));
    assert_eq!(context.cache().get("q_summary_result"), Some(&rows));
}

#[test]
fn test_result_suffix_is_configurable() {
    let config = EngineConfig::from_json(r#"{ "result_suffix": ":rows" }"#).unwrap();
    let mut context = Context::builder(create_scan_document(), RecordingBackend::new())
        .with_config(config)
        .build();
    context.on_backend_event(BackendEvent::new("scan-result", "q1").with_payload(json!(3)));
    assert_eq!(context.cache().get("q1:rows"), Some(&json!(3)));
}

#[test]
fn test_errored_completion_still_resumes() {
    let mut context = create_context(create_pipeline_document());
    context.on_ui_event(UiEvent::Click {
        widget_id: "scanbtn".into(),
    });

    let outcome = context.on_backend_event(BackendEvent::new("scan-result", "q_scan").failed());
    assert_eq!(outcome.resumed, 1);
    assert_eq!(context.status(), BackendStatus::Complete);
}

#[test]
fn test_probe_query_on_instance_ready() {
    let config = EngineConfig::from_json(
        r#"{ "probe_query": { "kind": "query", "query_id": "probe", "sql": "SELECT 1" } }"#,
    )
    .unwrap();
    let mut context = Context::builder(create_scan_document(), RecordingBackend::new())
        .with_config(config)
        .build();

    context.on_backend_event(BackendEvent::new("instance-ready", ""));
    assert_eq!(context.status(), BackendStatus::InProgress);
    assert_eq!(
        context.backend().requests,
        vec![request("query", "probe", Some("SELECT 1"))]
    );
}

#[test]
fn test_value_change_updates_cache_and_notifies_backend() {
    let mut table = ActionTable::new();
    table.insert(
        "limit",
        "value-change",
        vec![ActionStep::new().with_push("loading_modal")],
    );
    let mut context = Context::builder(create_scan_document(), RecordingBackend::new())
        .with_action_table(table)
        .build();

    let outcome = context.on_ui_event(UiEvent::ValueChange {
        widget_id: "limit".into(),
        address: "row_limit".into(),
        value: json!(50),
    });
    assert!(outcome.fresh_start);
    assert_eq!(context.cache().get("row_limit"), Some(&json!(50)));
    assert_eq!(
        context.backend().changes,
        vec![("row_limit".to_string(), json!(50))]
    );
    context.drain();
    assert_eq!(context.stack().describe(), "Home,loading_modal");
}

#[test]
fn test_data_change_updates_cache_without_dispatch() {
    let mut context = create_context(create_scan_document());
    context.on_data_change(DataChange {
        address: "scan_sql".into(),
        value: json!("SELECT 2"),
    });
    assert_eq!(context.cache().text("scan_sql"), Some("SELECT 2"));
    assert!(context.pending().is_empty());

    context.on_ui_event(UiEvent::Click {
        widget_id: "scanbtn".into(),
    });
    assert_eq!(
        context.backend().requests,
        vec![request("scan", "q1", Some("SELECT 2"))]
    );
}

#[test]
fn test_legacy_document_flow() {
    let mut context = create_context(create_legacy_document());
    assert!(context.action_table().resolve("Scan", "click").is_some());
    assert!(context.action_table().resolve("Summary", "click").is_some());
    assert_eq!(context.stack().describe(), "Home");

    context.on_ui_event(UiEvent::Click {
        widget_id: "Scan".into(),
    });
    context.drain();
    assert_eq!(context.stack().describe(), "Home,parquet_loading_modal");
    assert_eq!(
        context.backend_mut().take_requests(),
        vec![request("scan", "scan_qid", Some("SELECT 1"))]
    );

    context.on_backend_event(BackendEvent::new("scan-result", "scan_qid"));
    context.drain();
    assert_eq!(context.stack().describe(), "Home");
    assert_eq!(
        context.backend_mut().take_requests(),
        vec![request(
            "query",
            "summary_qid",
            Some("SUMMARIZE SELECT * FROM depth")
        )]
    );
}

#[test]
fn test_rejected_definitions_do_not_block_valid_ones() {
    let document = LayoutDocument::from_value(json!({
        "layout": [{ "render_kind": "Home" }],
        "actions": {
            "nodot": [],
            "a.click": [],
            "b.click": [{ "bogus": 1 }],
            "c.click": [{ "push_widget_id": "x" }]
        }
    }))
    .unwrap();
    let context = create_context(document);
    assert_eq!(context.action_table().len(), 1);
    assert_eq!(context.action_table().rejected().len(), 3);
    assert!(context.action_table().resolve("c", "click").is_some());
}

#[test]
fn test_compiled_table_round_trip_drives_context() {
    let table = (&create_pipeline_document()).into_action_table();
    let bytes = table.compile().to_bytes().unwrap();
    let restored = ActionTable::from_compiled(CompiledActionTable::from_bytes(&bytes).unwrap());
    assert_eq!(restored.compile(), table.compile());

    let mut context = Context::builder(create_pipeline_document(), RecordingBackend::new())
        .with_action_table(restored)
        .build();
    context.on_ui_event(UiEvent::Click {
        widget_id: "scanbtn".into(),
    });
    context.drain();
    assert_eq!(context.stack().describe(), "Home,loading_modal");
}

#[test]
fn test_push_home_can_be_disabled() {
    let config = EngineConfig::from_json(r#"{ "push_home": false }"#).unwrap();
    let context = Context::builder(create_scan_document(), RecordingBackend::new())
        .with_config(config)
        .build();
    assert!(context.stack().is_empty());
}
