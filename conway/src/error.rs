// error.rs - All kinds of errors in this crate

use crate::grid::Coord;
use displaydoc::Display;
use thiserror::Error;

/// All kinds of errors in this crate.
#[derive(Clone, Debug, PartialEq, Eq, Display, Error)]
pub enum Error {
    /// Length and width should be positive.
    NonPositive,
    /// Cell at {0:?} lies outside the board.
    OutOfBounds(Coord),
}
