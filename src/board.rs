//! Game board state: the cell grid, fleet placement, and shot resolution.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use rand::Rng;

use crate::config::{BOARD_SIZE, FLEET, TOTAL_SHIP_CELLS};
use crate::point::Point;
use crate::ship::{Orientation, Ship};

/// State of a single grid cell.
///
/// A cell transitions `Unhit -> Hit` or `Unhit -> Miss` exactly once; a shot
/// at a cell that already reads `Hit` or `Miss` is rejected without mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Unhit,
    Ship,
    Hit,
    Miss,
}

/// Observer notified whenever the board changes, either by a placement or by
/// an accepted shot. Rendering layers hang off this seam.
pub trait GridListener: Send {
    fn grid_updated(&mut self, at: Point);
}

/// Main board state: the 10×10 grid, placed ships, and shot statistics.
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
    ships: Vec<Ship>,
    placed_cells: usize,
    moves: usize,
    hits: usize,
    misses: usize,
    streak: usize,
    max_streak: usize,
    listener: Option<Box<dyn GridListener>>,
}

impl Board {
    /// Create an empty board (no ships placed).
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Unhit; BOARD_SIZE]; BOARD_SIZE],
            ships: Vec::new(),
            placed_cells: 0,
            moves: 0,
            hits: 0,
            misses: 0,
            streak: 0,
            max_streak: 0,
            listener: None,
        }
    }

    /// Register an observer for placement and shot notifications.
    pub fn set_listener(&mut self, listener: Box<dyn GridListener>) {
        self.listener = Some(listener);
    }

    /// Place a ship of `length` cells with its nose at (`row`, `col`).
    ///
    /// An origin that would push the span off the grid is repaired, not
    /// rejected: the start index is pulled back to `10 - length` on the span
    /// axis (and onto the grid on the other axis). Returns `false` without
    /// mutating anything when any target cell already holds a ship, or when
    /// `length` itself cannot fit on the grid.
    pub fn place_ship(
        &mut self,
        orientation: Orientation,
        length: usize,
        row: usize,
        col: usize,
    ) -> bool {
        if length == 0 || length > BOARD_SIZE {
            return false;
        }
        let (row, col) = match orientation {
            Orientation::Horizontal => (row.min(BOARD_SIZE - 1), col.min(BOARD_SIZE - length)),
            Orientation::Vertical => (row.min(BOARD_SIZE - length), col.min(BOARD_SIZE - 1)),
        };
        let nose = Point::new(row as u8, col as u8);
        let ship = Ship::new(orientation, nose, length);
        if ship
            .cells()
            .iter()
            .any(|p| self.cells[p.row as usize][p.col as usize] != Cell::Unhit)
        {
            return false;
        }
        for p in ship.cells() {
            self.cells[p.row as usize][p.col as usize] = Cell::Ship;
        }
        self.placed_cells += length;
        self.ships.push(ship);
        self.notify(nose);
        true
    }

    /// Place the whole fleet at random, retrying collisions. Returns `false`
    /// if a ship could not be fitted within the attempt budget (the board is
    /// left with the ships placed so far).
    pub fn place_fleet_randomly<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        for class in FLEET {
            let mut placed = false;
            for _ in 0..100 {
                let orientation = if rng.random() {
                    Orientation::Horizontal
                } else {
                    Orientation::Vertical
                };
                let row = rng.random_range(0..BOARD_SIZE);
                let col = rng.random_range(0..BOARD_SIZE);
                if self.place_ship(orientation, class.length(), row, col) {
                    placed = true;
                    break;
                }
            }
            if !placed {
                return false;
            }
        }
        true
    }

    /// Resolve a shot at `at`, marking the cell hit or miss.
    ///
    /// Returns `false` without touching any counter when the cell was already
    /// shot (or the point is off the grid); each cell accepts exactly one
    /// shot over the life of the board.
    pub fn try_shot(&mut self, at: Point) -> bool {
        if !at.in_bounds() || self.used(at) {
            return false;
        }
        let cell = &mut self.cells[at.row as usize][at.col as usize];
        if *cell == Cell::Ship {
            *cell = Cell::Hit;
            self.hits += 1;
            self.streak += 1;
            if self.streak > self.max_streak {
                self.max_streak = self.streak;
            }
        } else {
            *cell = Cell::Miss;
            self.misses += 1;
            self.streak = 0;
        }
        self.moves += 1;
        self.notify(at);
        true
    }

    /// True when the cell has been shot, i.e. reads hit or miss.
    pub fn used(&self, at: Point) -> bool {
        matches!(self.cell(at), Some(Cell::Hit) | Some(Cell::Miss))
    }

    /// True when the cell reads hit.
    pub fn hit(&self, at: Point) -> bool {
        self.cell(at) == Some(Cell::Hit)
    }

    /// Cell state, or `None` off the grid.
    pub fn cell(&self, at: Point) -> Option<Cell> {
        if at.in_bounds() {
            Some(self.cells[at.row as usize][at.col as usize])
        } else {
            None
        }
    }

    /// True when the full fleet has been placed and every ship cell has been
    /// hit. A partially placed board never reports game over, and the answer
    /// is monotonic: once true it stays true.
    pub fn game_over(&self) -> bool {
        if self.placed_cells != TOTAL_SHIP_CELLS {
            return false;
        }
        self.ships
            .iter()
            .flat_map(|s| s.cells())
            .all(|p| self.cells[p.row as usize][p.col as usize] != Cell::Ship)
    }

    /// Ships placed so far, in placement order.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// Number of ship cells placed so far.
    pub fn placed_cells(&self) -> usize {
        self.placed_cells
    }

    /// Accepted shots taken on this board.
    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Longest run of consecutive hits with no miss in between.
    pub fn max_streak(&self) -> usize {
        self.max_streak
    }

    fn notify(&mut self, at: Point) {
        if let Some(listener) = self.listener.as_mut() {
            listener.grid_updated(at);
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                let ch = match cell {
                    Cell::Unhit => 'U',
                    Cell::Ship => 'S',
                    Cell::Hit => 'H',
                    Cell::Miss => 'M',
                };
                write!(f, "{} ", ch)?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "moves: {}, hits: {}, misses: {}, max streak: {}",
            self.moves, self.hits, self.misses, self.max_streak
        )
    }
}
