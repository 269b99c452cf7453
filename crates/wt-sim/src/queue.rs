//! `EventQueue` — the run's own scheduled actions, keyed by instant.
//!
//! Snapshot ticks and deferred address resolutions are the only things the
//! run schedules for itself; everything else comes from the engine.  Actions
//! pushed for the same instant fire in insertion order.  Nothing is ever
//! cancelled.

use std::collections::BTreeMap;

use wt_core::SimTime;
use wt_trace::ResolutionRequest;

/// Something the run does at a scheduled instant.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Action {
    /// Join the event store into snapshot records.
    Snapshot,
    /// Resolve an AP address and, on success, install the client's generator.
    Resolve(ResolutionRequest),
}

/// Sparse instant → actions map.
#[derive(Default, Debug)]
pub struct EventQueue {
    inner: BTreeMap<SimTime, Vec<Action>>,
    /// Cached total action count for O(1) `len()`.
    total: usize,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` at `at`, behind anything already queued there.
    pub fn push(&mut self, at: SimTime, action: Action) {
        self.inner.entry(at).or_default().push(action);
        self.total += 1;
    }

    /// Remove and return everything queued for exactly `at`.
    pub fn drain_at(&mut self, at: SimTime) -> Option<Vec<Action>> {
        let actions = self.inner.remove(&at)?;
        self.total -= actions.len();
        Some(actions)
    }

    /// The earliest instant with a queued action.
    pub fn next_time(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
