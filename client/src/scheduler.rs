//! Fixed-rate tick scheduling and delayed outbound tasks
//!
//! Neither type owns a timer. Callers pass the current session time in and ask
//! for the next deadline, so tests can drive them with a fake clock.

use std::collections::BTreeMap;
use std::time::Duration;

/// Fires ticks at a fixed interval while running
#[derive(Debug, Clone)]
pub struct TickScheduler {
    interval: Duration,
    next_tick: Option<Duration>,
}

impl TickScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_tick: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Start ticking one interval from `now`. No-op if already running.
    pub fn start(&mut self, now: Duration) -> bool {
        if self.is_running() {
            return false;
        }
        self.next_tick = Some(now + self.interval);
        true
    }

    /// Stop ticking. Returns false if it was not running.
    pub fn stop(&mut self) -> bool {
        self.next_tick.take().is_some()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.next_tick
    }

    /// Consume one due tick, returning its scheduled time.
    ///
    /// Call repeatedly to catch up after a long gap; each missed interval fires once.
    pub fn poll(&mut self, now: Duration) -> Option<Duration> {
        let due = self.next_tick.filter(|at| *at <= now)?;
        self.next_tick = Some(due + self.interval);
        Some(due)
    }
}

/// One-shot tasks keyed by fire time. Equal fire times pop in insertion order.
#[derive(Debug)]
pub struct DelayQueue<T> {
    tasks: BTreeMap<(Duration, u64), T>,
    seq: u64,
}

impl<T> DelayQueue<T> {
    pub fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
            seq: 0,
        }
    }

    pub fn schedule(&mut self, at: Duration, task: T) {
        self.tasks.insert((at, self.seq), task);
        self.seq += 1;
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.tasks.keys().next().map(|(at, _)| *at)
    }

    /// Remove the earliest task if it is due at `now`
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, T)> {
        let entry = self.tasks.first_entry()?;
        let (at, _) = *entry.key();
        if at > now {
            return None;
        }
        Some((at, entry.remove()))
    }

    /// Drop every pending task, returning how many were cancelled
    pub fn clear(&mut self) -> usize {
        let cancelled = self.tasks.len();
        self.tasks.clear();
        cancelled
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<T> Default for DelayQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
