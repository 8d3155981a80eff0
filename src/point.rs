use core::fmt;

use crate::config::BOARD_SIZE;

/// A grid coordinate. Compares and hashes by value because points key the
/// strategy's follow-hit bookkeeping and other lookup structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub row: u8,
    pub col: u8,
}

impl Point {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// True when the point lies on the 10×10 grid.
    pub fn in_bounds(&self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.row, self.col)
    }
}
