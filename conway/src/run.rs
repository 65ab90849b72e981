// run.rs - The continuous-run state machine
//
// A run is a sequence of ticks. Each tick steps the grid once and, if the run
// is not over, books the next tick with the scheduler. Only the most recently
// booked timer may start a tick; anything else that fires is stale.

use std::num::NonZeroU32;
use std::time::Duration;

use log::debug;

use crate::schedule::{Scheduler, TimerId};

/// Seconds between generations at speed 1.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Whether the grid is stepping on its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    /// `remaining` counts the generations still to go; `None` means forever.
    Running { remaining: Option<u32> },
}

impl RunState {
    pub fn is_running(self) -> bool {
        matches!(self, RunState::Running { .. })
    }
}

/// Bookkeeping for one grid's continuous run.
#[derive(Debug)]
pub(crate) struct RunLoop {
    state: RunState,
    interval: Duration,
    pending: Option<TimerId>,
}

impl Default for RunLoop {
    fn default() -> Self {
        RunLoop {
            state: RunState::Idle,
            interval: DEFAULT_INTERVAL,
            pending: None,
        }
    }
}

impl RunLoop {
    pub(crate) fn state(&self) -> RunState {
        self.state
    }

    pub(crate) fn pending(&self) -> Option<TimerId> {
        self.pending
    }

    /// Time between ticks at the given speed.
    pub(crate) fn delay(&self, speed: NonZeroU32) -> Duration {
        self.interval / speed.get()
    }

    /// Starts a new run, dropping whatever run was in progress.
    pub(crate) fn start<S: Scheduler>(
        &mut self,
        scheduler: &mut S,
        interval: Duration,
        repetitions: Option<u32>,
    ) {
        self.cancel_pending(scheduler);
        self.interval = interval;
        self.state = RunState::Running {
            remaining: repetitions,
        };
    }

    /// Stops the run and cancels the booked tick, if any.
    pub(crate) fn stop<S: Scheduler>(&mut self, scheduler: &mut S) {
        self.cancel_pending(scheduler);
        self.state = RunState::Idle;
    }

    /// Claims a fired timer. Returns `false` for timers that are not the
    /// booked one.
    pub(crate) fn accept(&mut self, id: TimerId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Decides whether this tick steps the grid, counting the step against the
    /// remaining repetitions.
    pub(crate) fn begin_tick(&mut self) -> bool {
        match self.state {
            RunState::Idle => false,
            RunState::Running { remaining: Some(0) } => {
                self.state = RunState::Idle;
                false
            }
            RunState::Running { remaining } => {
                self.state = RunState::Running {
                    remaining: remaining.map(|n| n - 1),
                };
                true
            }
        }
    }

    /// Books the next tick, or ends the run if no repetitions are left.
    pub(crate) fn end_tick<S: Scheduler>(&mut self, scheduler: &mut S, speed: NonZeroU32) {
        match self.state {
            RunState::Idle => {}
            RunState::Running { remaining: Some(0) } => {
                debug!("run finished");
                self.state = RunState::Idle;
            }
            RunState::Running { .. } => {
                let delay = self.delay(speed);
                let id = scheduler.schedule(delay);
                debug!("next generation in {delay:?} ({id:?})");
                self.pending = Some(id);
            }
        }
    }

    fn cancel_pending<S: Scheduler>(&mut self, scheduler: &mut S) {
        if let Some(id) = self.pending.take() {
            debug!("cancelling {id:?}");
            scheduler.cancel(id);
        }
    }
}
