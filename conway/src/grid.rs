// grid.rs - The toroidal board of Conway's Game of Life

use std::fmt::{self, Write};
use std::num::NonZeroU32;
use std::time::Duration;

use log::{debug, info};

use crate::cell::Cell;
use crate::error::Error;
use crate::rule;
use crate::run::{RunLoop, RunState};
use crate::schedule::{Scheduler, TimerId};

/// A position on the board as `(x, y)`, i.e. `(column, row)`.
pub type Coord = (usize, usize);

/// Called with the position and new state of every cell that flips.
pub type Observer = Box<dyn FnMut(Coord, bool)>;

/// The eight neighbors of a cell, as `(dx, dy)` offsets.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
];

/// Slowest speed the controls offer.
pub const SPEED_MIN: u32 = 1;
/// Fastest speed the controls offer.
pub const SPEED_MAX: u32 = 10;

/// A fixed-size board whose edges wrap around to the opposite edge.
///
/// The grid owns its cells, the generation counter, the speed factor and the
/// state of the continuous run.
pub struct Grid {
    length: usize,
    width: usize,
    // Row-major: cell (x, y) lives at y * length + x.
    cells: Vec<Cell>,
    generation: u64,
    speed: NonZeroU32,
    run: RunLoop,
    observer: Option<Observer>,
}

impl Grid {
    /// Creates a board of `length` columns and `width` rows, all dead.
    pub fn new(length: usize, width: usize) -> Result<Self, Error> {
        if length == 0 || width == 0 {
            return Err(Error::NonPositive);
        }
        debug!("new {length}x{width} grid");
        Ok(Grid {
            length,
            width,
            cells: vec![Cell::DEAD; length * width],
            generation: 0,
            speed: NonZeroU32::MIN,
            run: RunLoop::default(),
            observer: None,
        })
    }

    /// Creates a board with the given cells alive. Repeated positions are fine.
    pub fn with_alive(length: usize, width: usize, alive: &[Coord]) -> Result<Self, Error> {
        let mut grid = Grid::new(length, width)?;
        for &(x, y) in alive {
            if !grid.is_alive(x, y) {
                grid.toggle(x, y)?;
            }
        }
        Ok(grid)
    }

    /// Number of columns.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of rows.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Whether the cell at `(x, y)` is alive. Positions off the board are dead.
    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        self.cell(x, y).is_some_and(Cell::is_alive)
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// The rows of the board, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.length)
    }

    /// Every cell with its position, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.coords().zip(self.cells.iter().copied())
    }

    /// Flips the cell at `(x, y)`.
    pub fn toggle(&mut self, x: usize, y: usize) -> Result<(), Error> {
        let index = self.index(x, y).ok_or(Error::OutOfBounds((x, y)))?;
        self.flip(index);
        Ok(())
    }

    /// Counts the live cells among the eight neighbors of `(x, y)`.
    ///
    /// Coordinates wrap around the board. On a board one cell wide or long,
    /// offsets that wrap back onto `(x, y)` itself are not counted; on a board
    /// two cells wide, the same neighbor may be counted twice.
    pub fn neighbor_count(&self, x: usize, y: usize) -> u8 {
        let (x, y) = (x % self.length, y % self.width);
        NEIGHBOR_OFFSETS
            .iter()
            .map(|&(dx, dy)| (wrap(x, dx, self.length), wrap(y, dy, self.width)))
            .filter(|&neighbor| neighbor != (x, y))
            .filter(|&(nx, ny)| self.cells[ny * self.length + nx].is_alive())
            .count() as u8
    }

    /// Advances the whole board by one generation.
    ///
    /// All neighbor counts are taken before any cell changes.
    pub fn step(&mut self) {
        let counts: Vec<u8> = self
            .coords()
            .map(|(x, y)| self.neighbor_count(x, y))
            .collect();
        for (index, neighbors) in counts.into_iter().enumerate() {
            let alive = self.cells[index].is_alive();
            if rule::next_state(alive, neighbors) != alive {
                self.flip(index);
            }
        }
        self.generation += 1;
        debug!("generation {}: {} alive", self.generation, self.population());
    }

    /// Stops any run in progress and kills every cell.
    pub fn reset<S: Scheduler>(&mut self, scheduler: &mut S) {
        self.run.stop(scheduler);
        for index in 0..self.cells.len() {
            if self.cells[index].is_alive() {
                self.cells[index].initialize();
                self.notify(index);
            }
        }
        self.generation = 0;
        info!("grid reset");
    }

    /// Steps the board now and then once per `interval / speed`.
    ///
    /// With `Some(k)` the run ends after `k` generations in total; with `None`
    /// it goes on until [`reset`](Grid::reset). A run already in progress is
    /// replaced.
    pub fn continue_run<S: Scheduler>(
        &mut self,
        scheduler: &mut S,
        interval: Duration,
        repetitions: Option<u32>,
    ) {
        self.run.start(scheduler, interval, repetitions);
        info!("{}", self.run_summary(repetitions));
        self.tick(scheduler);
    }

    /// Hands a due timer back to the grid. Timers other than the one the grid
    /// is waiting for are ignored.
    pub fn fire<S: Scheduler>(&mut self, scheduler: &mut S, id: TimerId) {
        if self.run.accept(id) {
            self.tick(scheduler);
        } else {
            debug!("ignoring stale {id:?}");
        }
    }

    pub fn speed(&self) -> NonZeroU32 {
        self.speed
    }

    /// Sets the speed factor. Takes effect from the next booked generation.
    pub fn set_speed(&mut self, speed: NonZeroU32) {
        debug!("speed {speed}");
        self.speed = speed;
    }

    /// Time between generations of the current or next run.
    pub fn delay(&self) -> Duration {
        self.run.delay(self.speed)
    }

    pub fn run_state(&self) -> RunState {
        self.run.state()
    }

    pub fn is_running(&self) -> bool {
        self.run.state().is_running()
    }

    /// The timer the grid is waiting for, if any.
    pub fn pending(&self) -> Option<TimerId> {
        self.run.pending()
    }

    /// Registers the presentation hook, replacing any previous one.
    pub fn set_observer(&mut self, observer: impl FnMut(Coord, bool) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    fn run_summary(&self, repetitions: Option<u32>) -> String {
        let span = match repetitions {
            Some(n) => format!("running {n} generations"),
            None => String::from("running until reset"),
        };
        format!("{span}, {:?} apart at speed {}", self.delay(), self.speed)
    }

    fn tick<S: Scheduler>(&mut self, scheduler: &mut S) {
        if self.run.begin_tick() {
            self.step();
            self.run.end_tick(scheduler, self.speed);
        }
    }

    fn flip(&mut self, index: usize) {
        self.cells[index].toggle();
        self.notify(index);
    }

    fn notify(&mut self, index: usize) {
        let coord = (index % self.length, index / self.length);
        let alive = self.cells[index].is_alive();
        if let Some(observer) = self.observer.as_mut() {
            observer(coord, alive);
        }
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.length && y < self.width).then(|| y * self.length + x)
    }

    fn coords(&self) -> impl Iterator<Item = Coord> {
        let length = self.length;
        (0..self.width).flat_map(move |y| (0..length).map(move |x| (x, y)))
    }
}

fn wrap(i: usize, offset: isize, size: usize) -> usize {
    (i as isize + offset).rem_euclid(size as isize) as usize
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("length", &self.length)
            .field("width", &self.width)
            .field("generation", &self.generation)
            .field("speed", &self.speed)
            .field("run", &self.run)
            .finish_non_exhaustive()
    }
}

/// One line per row, `#` for live cells and `.` for dead ones.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                f.write_char(if cell.is_alive() { '#' } else { '.' })?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{ManualScheduler, drain};
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn new_grid_is_dead() {
        let grid = Grid::new(4, 3).unwrap();
        assert_eq!(grid.length(), 4);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.rows().count(), 3);
        assert!(grid.rows().all(|row| row.len() == 4));
        assert_eq!(grid.population(), 0);
        assert_eq!(grid.generation(), 0);
        assert_eq!(grid.run_state(), RunState::Idle);
    }

    #[test]
    fn empty_dimensions_are_rejected() {
        assert_eq!(Grid::new(0, 5).unwrap_err(), Error::NonPositive);
        assert_eq!(Grid::new(5, 0).unwrap_err(), Error::NonPositive);
    }

    #[test]
    fn toggle_out_of_bounds() {
        let mut grid = Grid::new(2, 3).unwrap();
        assert_eq!(grid.toggle(2, 0), Err(Error::OutOfBounds((2, 0))));
        assert_eq!(grid.toggle(0, 3), Err(Error::OutOfBounds((0, 3))));
        assert!(grid.toggle(1, 2).is_ok());
        assert!(grid.is_alive(1, 2));
        assert!(!grid.is_alive(5, 5));
    }

    #[test]
    fn with_alive_ignores_repeats() {
        let grid = Grid::with_alive(3, 3, &[(0, 1), (0, 1), (2, 2)]).unwrap();
        assert_eq!(grid.population(), 2);
        assert_eq!(grid.to_string(), "...\n#..\n..#\n");
    }

    #[test]
    fn reset_kills_everything() {
        let mut scheduler = ManualScheduler::new();
        let mut grid = Grid::new(2, 2).unwrap();
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            grid.toggle(x, y).unwrap();
        }
        grid.step();
        grid.reset(&mut scheduler);

        assert_eq!(grid.population(), 0);
        assert_eq!(grid.generation(), 0);
    }

    #[test]
    fn neighbor_count_corners() {
        let grid = Grid::with_alive(3, 3, &[(0, 2), (2, 2), (2, 0), (0, 0)]).unwrap();
        assert_eq!(grid.neighbor_count(1, 1), 4);
    }

    #[test]
    fn neighbor_count_skips_self() {
        let grid = Grid::with_alive(3, 3, &[(1, 1)]).unwrap();
        assert_eq!(grid.neighbor_count(1, 1), 0);
    }

    #[test]
    fn neighbor_count_wraps() {
        let grid = Grid::with_alive(5, 4, &[(4, 3)]).unwrap();
        assert_eq!(grid.neighbor_count(0, 0), 1);
        assert_eq!(grid.neighbor_count(4, 0), 1);
        assert_eq!(grid.neighbor_count(0, 3), 1);
        assert_eq!(grid.neighbor_count(2, 2), 0);
    }

    #[test]
    fn single_cell_board() {
        let mut grid = Grid::with_alive(1, 1, &[(0, 0)]).unwrap();
        assert_eq!(grid.neighbor_count(0, 0), 0);
        grid.step();
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn step_is_synchronous() {
        // A row of three on a 5x5 board: if the middle column were updated
        // in place, the result would not be a vertical blinker.
        let mut grid = Grid::with_alive(5, 5, &[(1, 2), (2, 2), (3, 2)]).unwrap();
        grid.step();
        assert_eq!(grid.to_string(), ".....\n..#..\n..#..\n..#..\n.....\n");
        assert_eq!(grid.generation(), 1);
    }

    #[test]
    fn default_speed_is_slowest() {
        let grid = Grid::new(1, 1).unwrap();
        assert_eq!(grid.speed().get(), SPEED_MIN);
    }

    #[test]
    fn run_summary_reports_actual_speed() {
        let mut scheduler = ManualScheduler::new();
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set_speed(NonZeroU32::new(5).unwrap());
        grid.continue_run(&mut scheduler, Duration::from_secs(1), None);
        assert_eq!(
            grid.run_summary(None),
            "running until reset, 200ms apart at speed 5"
        );

        grid.set_speed(NonZeroU32::new(2).unwrap());
        grid.continue_run(&mut scheduler, Duration::from_secs(1), Some(3));
        assert_eq!(
            grid.run_summary(Some(3)),
            "running 3 generations, 500ms apart at speed 2"
        );
    }

    #[test]
    fn delay_follows_speed() {
        let mut scheduler = ManualScheduler::new();
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set_speed(NonZeroU32::new(5).unwrap());
        grid.continue_run(&mut scheduler, Duration::from_secs(1), None);

        assert_eq!(grid.delay(), Duration::from_millis(200));
        assert_eq!(scheduler.next_deadline(), Some(Duration::from_millis(200)));
    }

    #[test]
    fn continue_steps_exactly_k_times() {
        let seed = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
        for k in 0..6 {
            let mut scheduler = ManualScheduler::new();
            let mut continued = Grid::with_alive(6, 6, &seed).unwrap();
            continued.continue_run(&mut scheduler, Duration::ZERO, Some(k));
            drain(&mut continued, &mut scheduler);

            let mut stepped = Grid::with_alive(6, 6, &seed).unwrap();
            for _ in 0..k {
                stepped.step();
            }

            assert_eq!(continued.to_string(), stepped.to_string());
            assert_eq!(continued.generation(), u64::from(k));
            assert!(!continued.is_running());
            assert_eq!(continued.pending(), None);
            assert_eq!(scheduler.pending(), 0);
        }
    }

    #[test]
    fn continue_steps_immediately() {
        let mut scheduler = ManualScheduler::new();
        let mut grid = Grid::new(3, 3).unwrap();
        grid.continue_run(&mut scheduler, Duration::from_secs(1), None);

        assert_eq!(grid.generation(), 1);
        assert!(grid.is_running());
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn reset_cancels_continuation() {
        let mut scheduler = ManualScheduler::new();
        let mut grid = Grid::with_alive(5, 5, &[(1, 2), (2, 2), (3, 2)]).unwrap();
        grid.continue_run(&mut scheduler, Duration::from_secs(1), None);
        let booked = grid.pending().unwrap();
        for id in scheduler.advance(Duration::from_secs(1)) {
            grid.fire(&mut scheduler, id);
        }
        assert_eq!(grid.generation(), 2);

        grid.reset(&mut scheduler);
        assert!(!grid.is_running());
        assert_eq!(scheduler.pending(), 0);
        assert!(scheduler.advance(Duration::from_secs(60)).is_empty());

        // A timer that slipped through anyway does nothing.
        grid.fire(&mut scheduler, booked);
        assert_eq!(grid.generation(), 0);
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn continuing_twice_keeps_one_chain() {
        let mut scheduler = ManualScheduler::new();
        let mut grid = Grid::new(4, 4).unwrap();
        grid.continue_run(&mut scheduler, Duration::from_secs(1), None);
        grid.continue_run(&mut scheduler, Duration::from_secs(1), None);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(grid.generation(), 2);

        for id in scheduler.advance(Duration::from_secs(1)) {
            grid.fire(&mut scheduler, id);
        }
        assert_eq!(grid.generation(), 3);
    }

    #[test]
    fn observer_sees_every_flip() {
        let flips = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = ManualScheduler::new();
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set_observer({
            let flips = Rc::clone(&flips);
            move |coord, alive| flips.borrow_mut().push((coord, alive))
        });

        for (x, y) in [(1, 2), (2, 2), (3, 2)] {
            grid.toggle(x, y).unwrap();
        }
        assert_eq!(flips.borrow().len(), 3);

        flips.borrow_mut().clear();
        grid.step();
        let mut seen = flips.borrow().clone();
        seen.sort();
        assert_eq!(
            seen,
            [((1, 2), false), ((2, 1), true), ((2, 3), true), ((3, 2), false)]
        );

        flips.borrow_mut().clear();
        grid.reset(&mut scheduler);
        assert_eq!(flips.borrow().len(), 3);
        assert!(flips.borrow().iter().all(|&(_, alive)| !alive));

        grid.clear_observer();
        grid.toggle(0, 0).unwrap();
        assert_eq!(flips.borrow().len(), 3);
    }

    proptest! {
        #[test]
        fn speed_round_trips(level in 1..=u32::MAX) {
            let mut grid = Grid::new(1, 1).unwrap();
            let speed = NonZeroU32::new(level).unwrap();
            grid.set_speed(speed);
            prop_assert_eq!(grid.speed(), speed);
            prop_assert_eq!(grid.speed().get(), level);
        }

        #[test]
        fn lone_cell_has_no_neighbors(
            (length, width, x, y) in (1..12usize, 1..12usize)
                .prop_flat_map(|(l, w)| (Just(l), Just(w), 0..l, 0..w))
        ) {
            let grid = Grid::with_alive(length, width, &[(x, y)]).unwrap();
            prop_assert_eq!(grid.neighbor_count(x, y), 0);
        }

        #[test]
        fn neighbors_see_each_other_across_edges(
            (length, width, x, y, offset) in (3..12usize, 3..12usize)
                .prop_flat_map(|(l, w)| (Just(l), Just(w), 0..l, 0..w, 0..8usize))
        ) {
            let (dx, dy) = NEIGHBOR_OFFSETS[offset];
            let neighbor = (wrap(x, dx, length), wrap(y, dy, width));
            let grid = Grid::with_alive(length, width, &[neighbor]).unwrap();
            prop_assert_eq!(grid.neighbor_count(x, y), 1);
        }

        #[test]
        fn full_board_counts_eight(length in 3..12usize, width in 3..12usize) {
            let all: Vec<Coord> = (0..width)
                .flat_map(|y| (0..length).map(move |x| (x, y)))
                .collect();
            let grid = Grid::with_alive(length, width, &all).unwrap();
            for ((x, y), _) in grid.iter() {
                prop_assert_eq!(grid.neighbor_count(x, y), 8);
            }
        }

        #[test]
        fn double_toggle_restores(
            (length, width, x, y) in (1..12usize, 1..12usize)
                .prop_flat_map(|(l, w)| (Just(l), Just(w), 0..l, 0..w))
        ) {
            let mut grid = Grid::new(length, width).unwrap();
            grid.toggle(x, y).unwrap();
            prop_assert!(grid.is_alive(x, y));
            grid.toggle(x, y).unwrap();
            prop_assert_eq!(grid.population(), 0);
        }
    }
}
