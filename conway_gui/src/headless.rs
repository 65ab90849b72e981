// headless.rs - Running the board in the terminal, without a window
//
// Timers are tokio sleeps on a single-threaded runtime. Each one reports its
// id over a channel when it expires, and the loop below hands the id to the
// grid, so generations still happen one at a time on one thread.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use conway::{Grid, Scheduler, TimerId};
use log::{info, trace};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::args::Args;

/// A scheduler backed by tokio timers. Cancelling aborts the sleeping task.
pub struct TokioScheduler {
    next_id: u64,
    tasks: HashMap<TimerId, JoinHandle<()>>,
    fired: UnboundedSender<TimerId>,
}

impl TokioScheduler {
    pub fn new() -> (Self, UnboundedReceiver<TimerId>) {
        let (fired, receiver) = mpsc::unbounded_channel();
        let scheduler = TokioScheduler {
            next_id: 0,
            tasks: HashMap::new(),
            fired,
        };
        (scheduler, receiver)
    }

    /// Forgets a timer that has reported back.
    pub fn finished(&mut self, id: TimerId) {
        self.tasks.remove(&id);
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId::new(self.next_id);
        self.next_id += 1;
        let fired = self.fired.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver only goes away once the run is over.
            let _ = fired.send(id);
        });
        self.tasks.insert(id, task);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(task) = self.tasks.remove(&id) {
            task.abort();
        }
    }
}

/// Runs the board until it finishes or Ctrl-C is pressed.
pub fn run(grid: Grid, args: &Args) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the tokio runtime")?;
    runtime.block_on(drive(grid, args.interval(), args.generations))
}

async fn drive(mut grid: Grid, interval: Duration, generations: Option<u32>) -> Result<()> {
    let (mut scheduler, mut fired) = TokioScheduler::new();
    grid.set_observer(|(x, y), alive| {
        trace!("({x}, {y}) {}", if alive { "born" } else { "died" });
    });

    print_generation(&grid);
    grid.continue_run(&mut scheduler, interval, generations);
    if grid.generation() > 0 {
        print_generation(&grid);
    }

    while grid.is_running() {
        tokio::select! {
            Some(id) = fired.recv() => {
                scheduler.finished(id);
                let before = grid.generation();
                grid.fire(&mut scheduler, id);
                if grid.generation() != before {
                    print_generation(&grid);
                }
            }
            interrupted = tokio::signal::ctrl_c() => {
                interrupted.context("failed to listen for Ctrl-C")?;
                info!("interrupted after {} generations", grid.generation());
                grid.reset(&mut scheduler);
            }
        }
    }

    info!("done, {} cells alive", grid.population());
    Ok(())
}

fn print_generation(grid: &Grid) {
    println!("generation {}:\n{grid}", grid.generation());
}
