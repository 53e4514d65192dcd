//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the nodom crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use nodom::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let document = LayoutDocument::from_file("path/to/layout.json")?;
//! let config = EngineConfig::from_file("path/to/config.json")?;
//! let mut context = Context::builder(document, RecordingBackend::new())
//!     .with_config(config)
//!     .build();
//!
//! context.on_ui_event(UiEvent::Click { widget_id: "scanbtn".into() });
//! for request in context.backend_mut().take_requests() {
//!     println!("would submit: {:?}", request);
//! }
//! # Ok(())
//! # }
//! ```

// Engine entry points
pub use crate::context::{Context, ContextBuilder, Frame, Renderer};
pub use crate::sequencer::{DispatchOutcome, InFlightEntry, Sequencer, next_event};

// Definitions
pub use crate::action::{ActionSequence, ActionStep, ActionTable, BackendOp, IntoActionTable};
pub use crate::layout::{LayoutDocument, Pushables, Widget};

// State
pub use crate::cache::DataCache;
pub use crate::stack::{PendingMutations, PopPolicy, RenderStack};
pub use crate::status::BackendStatus;

// Boundary types
pub use crate::backend::{BackendAccess, BackendRequest, RecordingBackend};
pub use crate::config::EngineConfig;
pub use crate::event::{BackendEvent, DataChange, UiEvent};

// Error types
pub use crate::error::{
    ActionDefinitionError, BackendError, DispatchError, LoadError, StackError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
