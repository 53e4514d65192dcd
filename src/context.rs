use crate::action::{ActionTable, IntoActionTable};
use crate::backend::BackendAccess;
use crate::cache::DataCache;
use crate::config::EngineConfig;
use crate::error::StackError;
use crate::event::{BackendEvent, DataChange, INSTANCE_READY, UiEvent};
use crate::layout::{LayoutDocument, Pushables, Widget};
use crate::sequencer::{
    DispatchEnv, DispatchOutcome, InFlightEntry, Sequencer, is_completion, is_request,
};
use crate::stack::{PendingMutations, RenderStack};
use crate::status::BackendStatus;
use std::sync::Arc;
use tracing::{debug, warn};

/// Draws one widget. Called once per stack entry per render pass.
///
/// The frame gives access to everything except the render stack itself; interaction that
/// should change the stack goes through [`Frame::dispatch`] or [`Frame::on_ui_event`].
pub trait Renderer {
    fn render(&mut self, widget: &Widget, frame: &mut Frame<'_>);
}

impl<F> Renderer for F
where
    F: FnMut(&Widget, &mut Frame<'_>),
{
    fn render(&mut self, widget: &Widget, frame: &mut Frame<'_>) {
        (self)(widget, frame);
    }
}

/// Owner of all engine state: render stack, pending mutations, pushables, data cache,
/// sequencer, backend status and the backend handle.
///
/// Single-threaded by construction. Hosts that receive backend events on other threads
/// must funnel them to the thread that owns the context.
pub struct Context<B> {
    config: EngineConfig,
    layout: Vec<Arc<Widget>>,
    stack: RenderStack,
    pending: PendingMutations,
    pushables: Pushables,
    cache: DataCache,
    sequencer: Sequencer,
    status: BackendStatus,
    backend: B,
}

pub struct ContextBuilder<B> {
    document: LayoutDocument,
    backend: B,
    config: EngineConfig,
    table: Option<ActionTable>,
}

impl<B: BackendAccess> ContextBuilder<B> {
    pub fn new(document: LayoutDocument, backend: B) -> Self {
        Self {
            document,
            backend,
            config: EngineConfig::default(),
            table: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses `table` instead of validating the document's own action definitions.
    pub fn with_action_table(mut self, table: ActionTable) -> Self {
        self.table = Some(table);
        self
    }

    pub fn build(self) -> Context<B> {
        let table = match self.table {
            Some(table) => table,
            None => (&self.document).into_action_table(),
        };
        let LayoutDocument { layout, data, .. } = self.document;

        let layout: Vec<Arc<Widget>> = layout.into_iter().map(Arc::new).collect();
        let pushables = Pushables::from_layout(&layout);

        let mut stack = RenderStack::new();
        if self.config.push_home {
            match layout.first() {
                Some(home) => stack.push(Arc::clone(home)),
                None => warn!("layout is empty, render stack starts empty"),
            }
        }

        debug!(
            widgets = layout.len(),
            pushables = pushables.len(),
            actions = table.len(),
            "context built"
        );

        Context {
            config: self.config,
            layout,
            stack,
            pending: PendingMutations::new(),
            pushables,
            cache: DataCache::from(data),
            sequencer: Sequencer::new(table),
            status: BackendStatus::default(),
            backend: self.backend,
        }
    }
}

impl<B: BackendAccess> Context<B> {
    pub fn builder(document: LayoutDocument, backend: B) -> ContextBuilder<B> {
        ContextBuilder::new(document, backend)
    }

    /// Borrows everything but the render stack, for dispatching outside a render pass.
    pub fn frame(&mut self) -> Frame<'_> {
        Frame {
            config: &self.config,
            pushables: &self.pushables,
            cache: &mut self.cache,
            pending: &mut self.pending,
            sequencer: &mut self.sequencer,
            status: &mut self.status,
            backend: &mut self.backend,
        }
    }

    pub fn dispatch(&mut self, actor_id: &str, event_name: &str) -> DispatchOutcome {
        self.frame().dispatch(actor_id, event_name)
    }

    pub fn on_backend_event(&mut self, event: BackendEvent) -> DispatchOutcome {
        self.frame().on_backend_event(event)
    }

    pub fn on_ui_event(&mut self, event: UiEvent) -> DispatchOutcome {
        self.frame().on_ui_event(event)
    }

    pub fn on_data_change(&mut self, change: DataChange) {
        self.frame().on_data_change(change);
    }

    /// Applies queued pops, then queued pushes, to the render stack.
    pub fn drain(&mut self) -> Vec<StackError> {
        self.stack.drain(&mut self.pending, self.config.pop_policy)
    }

    /// Drains pending mutations, then renders every stack entry bottom to top.
    ///
    /// Returns the pops refused by the drain.
    pub fn render<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Vec<StackError> {
        let errors = self.drain();

        let mut frame = Frame {
            config: &self.config,
            pushables: &self.pushables,
            cache: &mut self.cache,
            pending: &mut self.pending,
            sequencer: &mut self.sequencer,
            status: &mut self.status,
            backend: &mut self.backend,
        };
        self.stack
            .traverse(|_, widget| renderer.render(widget, &mut frame));

        errors
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Every widget of the layout, in document order.
    pub fn layout(&self) -> &[Arc<Widget>] {
        &self.layout
    }

    pub fn stack(&self) -> &RenderStack {
        &self.stack
    }

    pub fn pending(&self) -> &PendingMutations {
        &self.pending
    }

    pub fn pushables(&self) -> &Pushables {
        &self.pushables
    }

    pub fn cache(&self) -> &DataCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut DataCache {
        &mut self.cache
    }

    pub fn action_table(&self) -> &ActionTable {
        self.sequencer.table()
    }

    /// Sequences currently waiting on backend events.
    pub fn in_flight(&self) -> &[InFlightEntry] {
        self.sequencer.registry().entries()
    }

    pub fn status(&self) -> BackendStatus {
        self.status
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

/// A borrowed view of the context with the render stack excluded.
///
/// Handed to renderers during a traversal; also the event router used by [`Context`].
pub struct Frame<'a> {
    config: &'a EngineConfig,
    pushables: &'a Pushables,
    cache: &'a mut DataCache,
    pending: &'a mut PendingMutations,
    sequencer: &'a mut Sequencer,
    status: &'a mut BackendStatus,
    backend: &'a mut dyn BackendAccess,
}

impl Frame<'_> {
    /// Runs the sequencer for `(actor_id, event_name)`.
    pub fn dispatch(&mut self, actor_id: &str, event_name: &str) -> DispatchOutcome {
        let mut env = DispatchEnv {
            pushables: self.pushables,
            cache: &*self.cache,
            pending: &mut *self.pending,
            backend: &mut *self.backend,
        };
        self.sequencer.dispatch(actor_id, event_name, &mut env)
    }

    /// Routes a renderer interaction to the sequencer, keyed by the widget id.
    pub fn on_ui_event(&mut self, event: UiEvent) -> DispatchOutcome {
        let event_name = event.event_name();
        match event {
            UiEvent::Click { widget_id } => self.dispatch(&widget_id, event_name),
            UiEvent::ValueChange {
                widget_id,
                address,
                value,
            } => {
                let old = self.cache.set(address.as_str(), value.clone());
                self.backend.notify_change(&address, old.as_ref(), &value);
                self.dispatch(&widget_id, event_name)
            }
        }
    }

    /// Routes a backend event to the sequencer, keyed by its query id, updating the status
    /// indicator and storing any completion payload first.
    pub fn on_backend_event(&mut self, event: BackendEvent) -> DispatchOutcome {
        let BackendEvent {
            kind,
            query_id,
            error,
            payload,
        } = event;

        if error {
            warn!(kind = %kind, query_id = %query_id, "backend reported an error");
        }

        if is_request(&kind) || kind == INSTANCE_READY {
            *self.status = BackendStatus::InProgress;
        } else if is_completion(&kind) {
            *self.status = BackendStatus::Complete;
            if let Some(payload) = payload {
                let address = self.config.result_address(&query_id);
                debug!(address = %address, "stored backend result");
                self.cache.set(address, payload);
            }
        } else {
            debug!(kind = %kind, query_id = %query_id, "backend event of unknown kind");
        }

        if kind == INSTANCE_READY {
            if let Some(probe) = self.config.probe_query.clone() {
                debug!(query_id = %probe.query_id, "submitting probe query");
                if let Err(e) = self.backend.submit(probe) {
                    warn!(error = %e, "probe query rejected");
                }
            }
        }

        self.dispatch(&query_id, &kind)
    }

    /// Applies a single cache update pushed by the backend. Never dispatches.
    pub fn on_data_change(&mut self, change: DataChange) {
        self.cache.apply_change(&change.address, change.value);
    }

    pub fn config(&self) -> &EngineConfig {
        self.config
    }

    pub fn cache(&self) -> &DataCache {
        &*self.cache
    }

    pub fn cache_mut(&mut self) -> &mut DataCache {
        &mut *self.cache
    }

    pub fn pending(&self) -> &PendingMutations {
        &*self.pending
    }

    pub fn status(&self) -> BackendStatus {
        *self.status
    }

    pub fn in_flight(&self) -> &[InFlightEntry] {
        self.sequencer.registry().entries()
    }
}
