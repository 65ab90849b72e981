// schedule.rs - Deferred callbacks for continuous runs
//
// The grid never sleeps or loops on its own. When it wants another
// generation later it asks a `Scheduler` for a timer, and whoever owns the
// event loop hands the `TimerId` back through `Grid::fire` once the timer
// is due.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::grid::Grid;

/// Handle of a scheduled callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    pub const fn new(raw: u64) -> Self {
        TimerId(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// The scheduling capability an event loop lends to the grid.
pub trait Scheduler {
    /// Arranges for `id` to be handed back after `delay`.
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// Drops a timer that has not fired yet. Unknown ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

/// A scheduler with a virtual clock that only moves when told to.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    // Ordered by deadline, then by id.
    timers: BTreeSet<(Duration, TimerId)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.first().map(|&(deadline, _)| deadline)
    }

    /// Moves the clock forward and returns the timers that came due, earliest
    /// first.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        self.now += by;
        let mut due = Vec::new();
        while let Some(&(deadline, id)) = self.timers.first() {
            if deadline > self.now {
                break;
            }
            self.timers.pop_first();
            due.push(id);
        }
        due
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert((self.now + delay, id));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.retain(|&(_, timer)| timer != id);
    }
}

/// Fires every timer of `scheduler` into `grid`, jumping the clock from one
/// deadline to the next, until nothing is pending. Returns how many timers
/// fired.
///
/// Only returns for bounded runs.
pub fn drain(grid: &mut Grid, scheduler: &mut ManualScheduler) -> usize {
    let mut fired = 0;
    while let Some(deadline) = scheduler.next_deadline() {
        let wait = deadline.saturating_sub(scheduler.now());
        for id in scheduler.advance(wait) {
            grid.fire(scheduler, id);
            fired += 1;
        }
    }
    fired
}
