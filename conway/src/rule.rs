// rule.rs - The B3/S23 rule of Conway's Game of Life

/// A live cell with fewer live neighbors than this dies.
pub const UNDER_POPULATION: u8 = 2;
/// A live cell with more live neighbors than this dies.
pub const OVER_POPULATION: u8 = 3;
/// A dead cell with exactly this many live neighbors comes alive.
pub const REPRODUCTION: u8 = 3;

/// The state of a cell in the next generation, given its current state and
/// the number of live cells around it.
pub fn next_state(alive: bool, neighbors: u8) -> bool {
    match (alive, neighbors) {
        (true, n) if n < UNDER_POPULATION => false, // Underpopulation
        (true, n) if n > OVER_POPULATION => false,  // Overpopulation
        (false, REPRODUCTION) => true,              // Reproduction
        (alive, _) => alive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_cells() {
        let survivors: Vec<u8> = (0..=8).filter(|&n| next_state(true, n)).collect();
        assert_eq!(survivors, [2, 3]);
    }

    #[test]
    fn dead_cells() {
        let births: Vec<u8> = (0..=8).filter(|&n| next_state(false, n)).collect();
        assert_eq!(births, [3]);
    }
}
