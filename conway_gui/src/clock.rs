// clock.rs - Timers for the window, checked once per frame

use std::time::{Duration, Instant};

use conway::{Scheduler, TimerId};

/// Deadlines kept as wall-clock instants.
///
/// egui only runs code when it paints a frame, so the app polls
/// [`FrameClock::due`] at the top of every frame and asks for a repaint by
/// the time the next deadline comes around.
#[derive(Debug, Default)]
pub struct FrameClock {
    next_id: u64,
    deadlines: Vec<(Instant, TimerId)>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the timers due at `now`, earliest first.
    pub fn due(&mut self, now: Instant) -> Vec<TimerId> {
        let mut due = Vec::new();
        self.deadlines.retain(|&timer| {
            let (deadline, _) = timer;
            if deadline <= now {
                due.push(timer);
                false
            } else {
                true
            }
        });
        due.sort();
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// How long until the next deadline, if there is one.
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.deadlines
            .iter()
            .map(|&(deadline, _)| deadline.saturating_duration_since(now))
            .min()
    }

    fn schedule_from(&mut self, now: Instant, delay: Duration) -> TimerId {
        let id = TimerId::new(self.next_id);
        self.next_id += 1;
        self.deadlines.push((now + delay, id));
        id
    }
}

impl Scheduler for FrameClock {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.schedule_from(Instant::now(), delay)
    }

    fn cancel(&mut self, id: TimerId) {
        self.deadlines.retain(|&(_, timer)| timer != id);
    }
}
