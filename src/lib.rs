//! # NoDOM - Action Sequencing & Render-Stack Engine
//!
//! **NoDOM** drives a user interface whose layout and behaviour are described entirely by
//! data. A generic renderer walks a stack of declarative widgets; this crate decides, from
//! declarative action rules, how user interaction and asynchronous backend events change
//! what is displayed and which backend requests are issued.
//!
//! ## Core Workflow
//!
//! 1.  **Load the document**: a single JSON document carries the widget `layout`, the initial
//!     `data` cache and the `actions` table. See [`layout::LayoutDocument`].
//! 2.  **Build a context**: [`Context::builder`] validates the action table once, indexes the
//!     pushable widgets and places the home widget on the render stack.
//! 3.  **Render**: each frame, call [`Context::render`]. Pending pops and pushes are applied
//!     first, then every stack entry is handed to your [`Renderer`]. Interaction during the
//!     pass goes through the [`Frame`] and only ever queues stack changes.
//! 4.  **Feed backend events**: when the backend reports progress or completion, call
//!     [`Context::on_backend_event`]. Sequences parked on that event resume where they stopped.
//!
//! ## Quick Start
//!
//! ```rust
//! use nodom::prelude::*;
//! use serde_json::json;
//!
//! let document = LayoutDocument::from_value(json!({
//!     "layout": [
//!         { "render_kind": "Home" },
//!         { "render_kind": "LoadingModal", "widget_id": "loading_modal" }
//!     ],
//!     "data": { "scan_sql": "SELECT 1", "summary_sql": "SUMMARIZE depth" },
//!     "actions": {
//!         "scanbtn.click": [
//!             { "push_widget_id": "loading_modal",
//!               "backend_op": { "kind": "scan", "query_id": "q1", "sql_ref": "scan_sql" } },
//!             { "pop_rname": "loading_modal",
//!               "backend_op": { "kind": "query", "query_id": "q2", "sql_ref": "summary_sql" } }
//!         ]
//!     }
//! }))?;
//!
//! let mut context = Context::builder(document, RecordingBackend::new()).build();
//!
//! // The scan button was clicked during the last frame.
//! context.on_ui_event(UiEvent::Click { widget_id: "scanbtn".into() });
//! context.drain();
//! assert_eq!(context.stack().describe(), "Home,loading_modal");
//! assert_eq!(context.in_flight().len(), 1);
//!
//! // Later, the backend finishes the scan.
//! context.on_backend_event(BackendEvent::new("scan-result", "q1"));
//! context.drain();
//! assert_eq!(context.stack().describe(), "Home");
//! assert_eq!(context.backend().requests.len(), 2);
//! # Ok::<(), nodom::error::LoadError>(())
//! ```

pub mod action;
pub mod backend;
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod layout;
pub mod prelude;
pub mod sequencer;
pub mod stack;
pub mod status;

pub use context::{Context, ContextBuilder, Frame, Renderer};
