//! The action sequencer: turns `(actor_id, event_name)` pairs into stack mutations and
//! backend requests, and resumes sequences parked on backend events.

use crate::action::{ActionSequence, ActionTable};
use crate::backend::{BackendAccess, BackendRequest};
use crate::cache::DataCache;
use crate::error::DispatchError;
use crate::layout::Pushables;
use crate::stack::PendingMutations;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, trace, warn};

mod next_event;
mod registry;

pub use next_event::{is_completion, is_request, next_event};
pub use registry::{InFlightEntry, InFlightRegistry, SequenceState};

/// Everything a step may touch while it executes.
pub struct DispatchEnv<'a> {
    pub pushables: &'a Pushables,
    pub cache: &'a DataCache,
    pub pending: &'a mut PendingMutations,
    pub backend: &'a mut dyn BackendAccess,
}

/// What a single `dispatch` call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// A sequence was found in the action table and started at step 0.
    pub fresh_start: bool,
    /// Number of in-flight entries resumed.
    pub resumed: usize,
    /// Number of new in-flight entries registered.
    pub continuations: usize,
    /// Requests handed to the backend, in submission order.
    pub submitted: Vec<BackendRequest>,
    /// Effects that were skipped, in the order they failed.
    pub errors: Vec<DispatchError>,
}

impl DispatchOutcome {
    /// True when neither a fresh sequence nor a resumption matched.
    pub fn is_unmatched(&self) -> bool {
        !self.fresh_start && self.resumed == 0
    }
}

enum StepResult {
    /// Move on to the next step in this call.
    Advance,
    /// A backend op was dispatched and the sequence now waits for its completion.
    Await {
        expected_event: &'static str,
        correlation_id: String,
    },
    /// Stop here without waiting.
    Terminal,
}

/// Owns the action table and the in-flight registry.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    table: ActionTable,
    registry: InFlightRegistry,
}

impl Sequencer {
    pub fn new(table: ActionTable) -> Self {
        Self {
            table,
            registry: InFlightRegistry::new(),
        }
    }

    pub fn table(&self) -> &ActionTable {
        &self.table
    }

    pub fn registry(&self) -> &InFlightRegistry {
        &self.registry
    }

    /// Runs the fresh sequence for `actor_id.event_name` (if any) and every in-flight entry
    /// waiting on this pair, then swaps in the new registry.
    ///
    /// Resumptions are taken from the registry as it stood on entry, so continuations created
    /// during this call cannot be resumed by it.
    pub fn dispatch(
        &mut self,
        actor_id: &str,
        event_name: &str,
        env: &mut DispatchEnv<'_>,
    ) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        let fresh = self.table.resolve(actor_id, event_name).cloned();
        let (matched, mut next_registry) = self.registry.take_matching(actor_id, event_name);

        if fresh.is_none() && matched.is_empty() {
            trace!(actor = %actor_id, event = %event_name, "no action for event");
            self.registry.replace(next_registry);
            return outcome;
        }

        let carried = next_registry.len();

        if let Some(sequence) = fresh {
            debug!(key = %sequence.key(), "starting action sequence");
            outcome.fresh_start = true;
            if let Some(entry) = run_sequence(&sequence, 0, env, &mut outcome) {
                next_registry.push(entry);
            }
        }

        for entry in matched {
            debug!(
                key = %entry.sequence.key(),
                next_index = entry.next_index,
                correlation_id = %entry.correlation_id,
                "resuming action sequence"
            );
            outcome.resumed += 1;
            if let Some(entry) = run_sequence(&entry.sequence, entry.next_index, env, &mut outcome)
            {
                next_registry.push(entry);
            }
        }

        outcome.continuations = next_registry.len() - carried;
        self.registry.replace(next_registry);
        outcome
    }
}

/// Runs `sequence` from `start` until it waits on a backend event or stops, returning the
/// in-flight entry to park if it waits.
fn run_sequence(
    sequence: &ActionSequence,
    start: usize,
    env: &mut DispatchEnv<'_>,
    outcome: &mut DispatchOutcome,
) -> Option<InFlightEntry> {
    match advance(sequence, start, env, outcome) {
        SequenceState::Idle => None,
        SequenceState::AwaitingEvent {
            expected_event,
            correlation_id,
            next_index,
        } => {
            debug!(
                key = %sequence.key(),
                next_index,
                expected_event = %expected_event,
                correlation_id = %correlation_id,
                "action sequence waiting"
            );
            Some(InFlightEntry {
                sequence: sequence.clone(),
                next_index,
                expected_event,
                correlation_id,
            })
        }
    }
}

fn advance(
    sequence: &ActionSequence,
    start: usize,
    env: &mut DispatchEnv<'_>,
    outcome: &mut DispatchOutcome,
) -> SequenceState {
    let mut index = start;
    loop {
        match execute_step(sequence, index, env, outcome) {
            StepResult::Advance if index + 1 < sequence.len() => index += 1,
            StepResult::Advance | StepResult::Terminal => return SequenceState::Idle,
            StepResult::Await {
                expected_event,
                correlation_id,
            } => {
                return SequenceState::AwaitingEvent {
                    expected_event: expected_event.to_string(),
                    correlation_id,
                    next_index: index + 1,
                };
            }
        }
    }
}

/// Applies one step: pop, then push, then backend dispatch.
fn execute_step(
    sequence: &ActionSequence,
    index: usize,
    env: &mut DispatchEnv<'_>,
    outcome: &mut DispatchOutcome,
) -> StepResult {
    let Some(step) = sequence.get(index) else {
        skip(
            outcome,
            sequence,
            index,
            DispatchError::IndexOutOfRange {
                key: sequence.key().to_string(),
                index,
                len: sequence.len(),
            },
        );
        return StepResult::Terminal;
    };

    // Never touch the stack directly: dispatch may be running inside a traversal.
    if let Some(name) = &step.pop_rname {
        env.pending.enqueue_pop(name.as_str());
    }

    if let Some(widget_id) = &step.push_widget_id {
        match env.pushables.get(widget_id) {
            Some(widget) => env.pending.enqueue_push(Arc::clone(widget)),
            None => skip(
                outcome,
                sequence,
                index,
                DispatchError::UnknownPushable {
                    widget_id: widget_id.clone(),
                },
            ),
        }
    }

    let Some(op) = &step.backend_op else {
        return StepResult::Advance;
    };

    let sql = match &op.sql_ref {
        None => None,
        Some(address) => match env.cache.get(address) {
            Some(Value::String(sql)) => Some(sql.clone()),
            Some(_) => {
                let error = DispatchError::SqlRefNotText {
                    address: address.clone(),
                };
                skip(outcome, sequence, index, error);
                return StepResult::Advance;
            }
            None => {
                let error = DispatchError::UnresolvedSqlRef {
                    address: address.clone(),
                };
                skip(outcome, sequence, index, error);
                return StepResult::Advance;
            }
        },
    };

    let request = BackendRequest {
        kind: op.kind.clone(),
        query_id: op.query_id.clone(),
        sql,
    };
    if let Err(e) = env.backend.submit(request.clone()) {
        skip(outcome, sequence, index, e.into());
        return StepResult::Advance;
    }
    debug!(kind = %request.kind, query_id = %request.query_id, "submitted backend request");
    outcome.submitted.push(request);

    match next_event(&op.kind) {
        Some(expected_event) if index + 1 < sequence.len() => StepResult::Await {
            expected_event,
            correlation_id: op.query_id.clone(),
        },
        _ => StepResult::Terminal,
    }
}

fn skip(outcome: &mut DispatchOutcome, sequence: &ActionSequence, index: usize, error: DispatchError) {
    warn!(key = %sequence.key(), index, error = %error, "action step effect skipped");
    outcome.errors.push(error);
}
