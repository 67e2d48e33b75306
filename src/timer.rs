//! Timer capability and a controllable virtual clock.
//!
//! Folds schedule their delayed `opened`/`closed` completion through
//! [`Timers`]. The host owns the clock and reports elapsed timers back to
//! the [`Registry`](crate::handorgel::Registry), which routes them to the
//! fold that scheduled them.

use crate::model::TimerId;
use std::collections::BTreeMap;
use std::time::Duration;

/// Schedule-after-delay primitive with cancellation.
pub trait Timers {
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// Returns whether the timer was still pending.
    fn cancel(&mut self, id: TimerId) -> bool;
}

/// Virtual clock holding pending timers.
///
/// Time only moves when the owner advances it, which makes transition timing
/// exact in tests. The terminal demo advances it by real elapsed time.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<TimerId, Duration>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since the queue was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.values().min().copied()
    }

    /// Remove and return the earliest timer due at or before `until`.
    ///
    /// The clock moves to that timer's deadline, so callbacks that schedule
    /// new timers measure their delay from the right instant. Ties fire in
    /// scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerId> {
        let (id, deadline) = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= until)
            .min_by_key(|(id, deadline)| (**deadline, **id))
            .map(|(id, deadline)| (*id, *deadline))?;

        self.pending.remove(&id);
        self.now = self.now.max(deadline);
        Some(id)
    }

    /// Move the clock forward to `until` without firing anything.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Advance by `by` and return every timer that became due, in firing order.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        let until = self.now + by;
        let mut due = Vec::new();
        while let Some(id) = self.pop_due(until) {
            due.push(id);
        }
        self.settle(until);
        due
    }
}

impl Timers for TimerQueue {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId::new(self.next_id);
        self.pending.insert(id, self.now + delay);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        self.pending.remove(&id).is_some()
    }
}
