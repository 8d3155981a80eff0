//! Move selection for the computer opponent.
//!
//! Strategies see only the attacker's remembered knowledge of the target
//! grid: they query `used`/`hit` on cells they have already shot at, never
//! the ship layout. Every selector terminates as long as one untried cell
//! remains.

use alloc::boxed::Box;
use alloc::vec::Vec;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::config::BOARD_SIZE;
use crate::point::Point;

/// A move selector. Each implementation owns its own random generator so a
/// seeded opponent replays identically.
pub trait Strategy: Send {
    /// Choose one untried cell on `board`. Must only be called while at
    /// least one cell remains unshot.
    fn desired_move(&mut self, board: &Board) -> Point;
}

/// Selects uniformly among untried cells by rejection sampling.
pub struct RandomStrategy {
    rng: SmallRng,
}

impl RandomStrategy {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    #[cfg(feature = "std")]
    pub fn new() -> Self {
        let mut seed_rng = rand::rng();
        Self {
            rng: SmallRng::from_rng(&mut seed_rng),
        }
    }
}

impl Strategy for RandomStrategy {
    fn desired_move(&mut self, board: &Board) -> Point {
        sample_unused(&mut self.rng, board)
    }
}

/// Systematic sweep phases the hunt strategy moves through, in order, with
/// one-way transitions as each line is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sweep {
    Diagonal,
    CenterColumn,
    CenterRow,
    Random,
}

/// Hunts ships by chasing lines of known hits, sweeping the diagonals and
/// center lines while no hit is pending.
///
/// Cells selected by a sweep are remembered as pending hits; when a pending
/// cell turns out to have missed, one failed chase round pops it again. A
/// cell probed in any mode that later reads hit becomes the next chase
/// anchor.
pub struct HuntStrategy {
    rng: SmallRng,
    hit_cells: Vec<Point>,
    sweep: Sweep,
    last_probe: Option<Point>,
}

/// Probe order around a hit: +col, +row, -col, -row.
const DIRECTIONS: [(i16, i16); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

impl HuntStrategy {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            hit_cells: Vec::new(),
            sweep: Sweep::Diagonal,
            last_probe: None,
        }
    }

    #[cfg(feature = "std")]
    pub fn new() -> Self {
        let mut seed_rng = rand::rng();
        Self {
            rng: SmallRng::from_rng(&mut seed_rng),
            hit_cells: Vec::new(),
            sweep: Sweep::Diagonal,
            last_probe: None,
        }
    }

    fn choose(&mut self, board: &Board) -> Point {
        if let Some(&last) = self.hit_cells.last() {
            if let Some(p) = self.form_line(board, last) {
                return p;
            }
            // No direction extends this hit; retire it and fall through to
            // the active sweep.
            self.hit_cells.pop();
        }
        self.sweep_move(board)
    }

    /// Walk outward from `from` in each direction while cells read hit, and
    /// target the first cell past the run if it is on-grid and untried.
    fn form_line(&self, board: &Board, from: Point) -> Option<Point> {
        DIRECTIONS
            .iter()
            .find_map(|&(dr, dc)| walk_line(board, from, dr, dc))
    }

    fn sweep_move(&mut self, board: &Board) -> Point {
        loop {
            match self.sweep {
                Sweep::Diagonal => {
                    for i in 0..BOARD_SIZE as u8 {
                        let p = Point::new(i, i);
                        if !board.used(p) {
                            self.hit_cells.push(p);
                            return p;
                        }
                    }
                    for i in 0..BOARD_SIZE as u8 {
                        let p = Point::new(i, BOARD_SIZE as u8 - 1 - i);
                        if !board.used(p) {
                            self.hit_cells.push(p);
                            return p;
                        }
                    }
                    self.sweep = Sweep::CenterColumn;
                }
                Sweep::CenterColumn => {
                    let col = (BOARD_SIZE / 2) as u8;
                    for row in 0..BOARD_SIZE as u8 {
                        let p = Point::new(row, col);
                        if !board.used(p) {
                            self.hit_cells.push(p);
                            return p;
                        }
                    }
                    self.sweep = Sweep::CenterRow;
                }
                Sweep::CenterRow => {
                    let row = (BOARD_SIZE / 2) as u8;
                    for col in 0..BOARD_SIZE as u8 {
                        let p = Point::new(row, col);
                        if !board.used(p) {
                            self.hit_cells.push(p);
                            return p;
                        }
                    }
                    self.sweep = Sweep::Random;
                }
                Sweep::Random => return sample_unused(&mut self.rng, board),
            }
        }
    }
}

impl Strategy for HuntStrategy {
    fn desired_move(&mut self, board: &Board) -> Point {
        if let Some(p) = self.last_probe.take() {
            if board.hit(p) && !self.hit_cells.contains(&p) {
                self.hit_cells.push(p);
            }
        }
        let target = self.choose(board);
        self.last_probe = Some(target);
        target
    }
}

fn walk_line(board: &Board, from: Point, dr: i16, dc: i16) -> Option<Point> {
    let mut row = from.row as i16;
    let mut col = from.col as i16;
    while on_grid(row, col) && board.hit(Point::new(row as u8, col as u8)) {
        row += dr;
        col += dc;
    }
    if on_grid(row, col) {
        let p = Point::new(row as u8, col as u8);
        if !board.used(p) {
            return Some(p);
        }
    }
    None
}

fn on_grid(row: i16, col: i16) -> bool {
    (0..BOARD_SIZE as i16).contains(&row) && (0..BOARD_SIZE as i16).contains(&col)
}

fn sample_unused<R: Rng + ?Sized>(rng: &mut R, board: &Board) -> Point {
    loop {
        let p = Point::new(
            rng.random_range(0..BOARD_SIZE as u8),
            rng.random_range(0..BOARD_SIZE as u8),
        );
        if !board.used(p) {
            return p;
        }
    }
}

/// Opponent skill levels offered to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Hard,
}

/// The computer opponent: a difficulty-selected strategy behind one seam.
pub struct Opponent {
    strategy: Box<dyn Strategy>,
}

impl Opponent {
    /// Build a seeded opponent for the given difficulty.
    pub fn from_seed(difficulty: Difficulty, seed: u64) -> Self {
        let strategy: Box<dyn Strategy> = match difficulty {
            Difficulty::Easy => Box::new(RandomStrategy::from_seed(seed)),
            Difficulty::Hard => Box::new(HuntStrategy::from_seed(seed)),
        };
        Self { strategy }
    }

    #[cfg(feature = "std")]
    pub fn new(difficulty: Difficulty) -> Self {
        let strategy: Box<dyn Strategy> = match difficulty {
            Difficulty::Easy => Box::new(RandomStrategy::new()),
            Difficulty::Hard => Box::new(HuntStrategy::new()),
        };
        Self { strategy }
    }

    pub fn with_strategy(strategy: Box<dyn Strategy>) -> Self {
        Self { strategy }
    }

    /// Swap the move selector; the next move uses the new one.
    pub fn set_strategy(&mut self, strategy: Box<dyn Strategy>) {
        self.strategy = strategy;
    }

    pub fn desired_move(&mut self, board: &Board) -> Point {
        self.strategy.desired_move(board)
    }
}
