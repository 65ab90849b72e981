//! Conway's Game of Life on a toroidal board.
//!
//! The board is a fixed grid of cells whose edges wrap around. It can be
//! stepped one generation at a time, or set running at a speed-scaled
//! interval through a [`Scheduler`] lent by whatever event loop hosts it.
//!
//! ```
//! use conway::{Grid, ManualScheduler};
//! use std::time::Duration;
//!
//! // A blinker.
//! let mut grid = Grid::with_alive(5, 5, &[(2, 1), (2, 2), (2, 3)]).unwrap();
//! grid.step();
//! assert_eq!(grid.to_string(), ".....\n.....\n.###.\n.....\n.....\n");
//!
//! let mut scheduler = ManualScheduler::new();
//! grid.continue_run(&mut scheduler, Duration::ZERO, Some(3));
//! conway::drain(&mut grid, &mut scheduler);
//! assert_eq!(grid.generation(), 4);
//! ```

mod cell;
mod error;
mod grid;
pub mod rule;
mod run;
mod schedule;

pub use cell::Cell;
pub use error::Error;
pub use grid::{Coord, Grid, NEIGHBOR_OFFSETS, Observer, SPEED_MAX, SPEED_MIN};
pub use run::{DEFAULT_INTERVAL, RunState};
pub use schedule::{ManualScheduler, Scheduler, TimerId, drain};
