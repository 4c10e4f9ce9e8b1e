//! Virtual-time timer queue used by games that need setTimeout-style callbacks

use std::collections::BTreeMap;
use std::time::Duration;

/// Handle returned by [`Scheduler::schedule`], used to cancel a pending timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    due: Duration,
    seq: u64,
}

impl TimerHandle {
    /// Point on the scheduler clock at which this timer fires
    pub fn due(&self) -> Duration {
        self.due
    }
}

/// Ordered set of pending tasks keyed by (due time, insertion order).
///
/// The clock only moves when the owner advances it, so the same sequence of
/// `schedule`/`pop_due` calls always fires in the same order.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_seq: u64,
    pending: BTreeMap<(Duration, u64), T>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            pending: BTreeMap::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers still waiting to fire
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.contains_key(&(handle.due, handle.seq))
    }

    /// Queue `task` to fire `delay` after the current clock
    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerHandle {
        let handle = TimerHandle {
            due: self.now + delay,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.pending.insert((handle.due, handle.seq), task);
        handle
    }

    /// Drop a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.pending.remove(&(handle.due, handle.seq)).is_some()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to its due time.
    ///
    /// Callers loop on this so timers scheduled by a fired task are picked up
    /// in the same advance, then call [`Scheduler::settle`].
    pub fn pop_due(&mut self, until: Duration) -> Option<T> {
        let (&(due, _), _) = self.pending.first_key_value()?;
        if due > until {
            return None;
        }
        let ((due, _), task) = self.pending.pop_first()?;
        self.now = self.now.max(due);
        Some(task)
    }

    /// Move the clock forward to `until` once every due timer has been popped
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}
