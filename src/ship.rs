//! Ship records: fleet classes and per-placement cell spans.

use alloc::vec::Vec;
use core::fmt;

use crate::board::Board;
use crate::point::Point;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Orientation::Horizontal)
    }
}

/// Class of ship: name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipClass {
    name: &'static str,
    length: usize,
}

impl ShipClass {
    pub const fn new(name: &'static str, length: usize) -> Self {
        Self { name, length }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

/// A ship placed on the board: the ordered cells it occupies, anchored at its
/// nose (the first-placed cell).
///
/// A `Ship` never caches whether it is sunk. The board's cell markings are the
/// single source of truth, so [`Ship::is_sunk`] re-reads them on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ship {
    cells: Vec<Point>,
    orientation: Orientation,
}

impl Ship {
    /// Build the cell span for a ship of `length` starting at `nose`.
    /// The nose must already be validated by the board's placement logic.
    pub(crate) fn new(orientation: Orientation, nose: Point, length: usize) -> Self {
        let cells = (0..length as u8)
            .map(|i| match orientation {
                Orientation::Horizontal => Point::new(nose.row, nose.col + i),
                Orientation::Vertical => Point::new(nose.row + i, nose.col),
            })
            .collect();
        Self { cells, orientation }
    }

    /// First-placed cell, anchoring the ship's on-grid span.
    pub fn nose(&self) -> Point {
        self.cells[0]
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells occupied by this ship, in placement order.
    pub fn cells(&self) -> &[Point] {
        &self.cells
    }

    /// A ship is sunk when every one of its cells currently reads hit on the
    /// given board. Recomputed from the grid each call, never cached.
    pub fn is_sunk(&self, board: &Board) -> bool {
        self.cells.iter().all(|p| board.hit(*p))
    }
}

impl fmt::Display for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} len {} {:?}",
            self.nose(),
            self.len(),
            self.orientation
        )
    }
}
