// cell.rs - A single cell of the board

/// One cell of the board.
///
/// A cell starts out dead and only changes state by being toggled. It knows
/// nothing about how it is drawn; the grid reports flips to its observer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    alive: bool,
}

impl Cell {
    pub const DEAD: Cell = Cell { alive: false };
    pub const ALIVE: Cell = Cell { alive: true };

    pub fn is_alive(self) -> bool {
        self.alive
    }

    /// Flips the cell between alive and dead.
    pub fn toggle(&mut self) {
        self.alive = !self.alive;
    }

    /// Puts the cell back in its initial, dead state.
    pub fn initialize(&mut self) {
        *self = Cell::DEAD;
    }
}

impl From<bool> for Cell {
    fn from(alive: bool) -> Self {
        Cell { alive }
    }
}
