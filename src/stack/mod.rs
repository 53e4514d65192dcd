//! The render stack and its deferred mutation queues.
//!
//! The stack is only ever changed by [`RenderStack::drain`], which runs between render passes.
//! A traversal borrows the stack immutably for its whole duration, so nothing reachable from a
//! render callback can change it; callbacks queue their changes in [`PendingMutations`].

use crate::error::StackError;
use crate::layout::Widget;
use itertools::Itertools;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

mod pending;

pub use pending::PendingMutations;

/// How a pop treats a name that does not match the top of the stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopPolicy {
    /// Remove the top entry only if it matches; otherwise leave the stack unchanged.
    #[default]
    Strict,
    /// Remove the top entry regardless, reporting a mismatch. An empty name skips the check.
    Unconditional,
}

/// Ordered sequence of the top-level widgets currently visible, bottom first.
#[derive(Debug, Clone, Default)]
pub struct RenderStack {
    entries: Vec<Arc<Widget>>,
}

impl RenderStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a widget. Duplicate pushes of the same widget are allowed.
    pub fn push(&mut self, widget: Arc<Widget>) {
        self.entries.push(widget);
    }

    /// Removes the top entry if it matches `name_or_id` (see [`PopPolicy`]).
    pub fn pop(&mut self, name_or_id: &str, policy: PopPolicy) -> Result<Arc<Widget>, StackError> {
        let Some(top) = self.entries.last() else {
            return Err(StackError::EmptyStack {
                requested: name_or_id.to_string(),
            });
        };

        if top.matches(name_or_id) || (policy == PopPolicy::Unconditional && name_or_id.is_empty())
        {
            return self.entries.pop().ok_or_else(|| StackError::EmptyStack {
                requested: name_or_id.to_string(),
            });
        }

        let mismatch = StackError::PopMismatch {
            requested: name_or_id.to_string(),
            top_kind: top.render_kind.clone(),
            top_id: top.id().map(str::to_string),
        };
        if policy == PopPolicy::Unconditional {
            self.entries.pop();
        }
        Err(mismatch)
    }

    /// Applies every queued pop in order, then every queued push in order, leaving both
    /// queues empty. Failed pops are logged and returned; they never stop the drain.
    pub fn drain(&mut self, pending: &mut PendingMutations, policy: PopPolicy) -> Vec<StackError> {
        let had_pending = !pending.is_empty();
        if had_pending {
            debug!(
                pops = pending.pop_count(),
                pushes = pending.push_count(),
                "draining pending stack mutations"
            );
        }

        let mut errors = Vec::new();
        while let Some(name) = pending.pops.pop_front() {
            if let Err(e) = self.pop(&name, policy) {
                warn!(error = %e, "pop failed");
                errors.push(e);
            }
        }
        while let Some(widget) = pending.pushes.pop_front() {
            self.push(widget);
        }

        if had_pending {
            debug!(stack = %self.describe(), "render stack");
        }
        errors
    }

    /// Visits every entry bottom to top.
    ///
    /// The stack is borrowed for the whole walk, so it cannot change underneath the visitor.
    pub fn traverse(&self, mut visit: impl FnMut(usize, &Arc<Widget>)) {
        for (index, widget) in self.entries.iter().enumerate() {
            visit(index, widget);
        }
    }

    pub fn top(&self) -> Option<&Arc<Widget>> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Widget>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels of all entries, bottom first, e.g. `"Home,loading_modal"`.
    pub fn describe(&self) -> String {
        self.entries.iter().map(|w| w.label()).join(",")
    }
}
