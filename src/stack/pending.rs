use crate::layout::Widget;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// Stack changes requested while the render stack may be under traversal.
///
/// Both queues are FIFO. They are drained together by [`RenderStack::drain`], pops first.
///
/// [`RenderStack::drain`]: super::RenderStack::drain
#[derive(Debug, Clone, Default)]
pub struct PendingMutations {
    pub(super) pops: VecDeque<String>,
    pub(super) pushes: VecDeque<Arc<Widget>>,
}

impl PendingMutations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a pop of the top entry, matched by render kind or widget id.
    pub fn enqueue_pop(&mut self, name_or_id: impl Into<String>) {
        let name_or_id = name_or_id.into();
        debug!(name = %name_or_id, "queued pop");
        self.pops.push_back(name_or_id);
    }

    pub fn enqueue_push(&mut self, widget: Arc<Widget>) {
        debug!(widget = %widget.label(), "queued push");
        self.pushes.push_back(widget);
    }

    pub fn pops(&self) -> impl Iterator<Item = &str> {
        self.pops.iter().map(String::as_str)
    }

    pub fn pushes(&self) -> impl Iterator<Item = &Arc<Widget>> {
        self.pushes.iter()
    }

    pub fn pop_count(&self) -> usize {
        self.pops.len()
    }

    pub fn push_count(&self) -> usize {
        self.pushes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pops.is_empty() && self.pushes.is_empty()
    }
}
