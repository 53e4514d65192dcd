use crate::action::ActionSequence;

/// Where a sequence instance stands after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceState {
    /// Finished, or stopped at a step with no follow-up event. Nothing is retained.
    Idle,
    /// Waiting for `expected_event` from actor `correlation_id` before running `next_index`.
    AwaitingEvent {
        expected_event: String,
        correlation_id: String,
        next_index: usize,
    },
}

/// A partially executed sequence waiting for a backend event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InFlightEntry {
    pub sequence: ActionSequence,
    pub next_index: usize,
    pub expected_event: String,
    pub correlation_id: String,
}

impl InFlightEntry {
    pub fn matches(&self, actor_id: &str, event_name: &str) -> bool {
        self.correlation_id == actor_id && self.expected_event == event_name
    }
}

/// Sequences waiting on backend events.
///
/// Entries are never timed out or cancelled; one persists until its event arrives.
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    entries: Vec<InFlightEntry>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[InFlightEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Splits the registry into entries matching `(actor_id, event_name)` and the rest,
    /// leaving the registry empty until [`InFlightRegistry::replace`] is called.
    pub(super) fn take_matching(
        &mut self,
        actor_id: &str,
        event_name: &str,
    ) -> (Vec<InFlightEntry>, Vec<InFlightEntry>) {
        std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| entry.matches(actor_id, event_name))
    }

    pub(super) fn replace(&mut self, entries: Vec<InFlightEntry>) {
        self.entries = entries;
    }
}
