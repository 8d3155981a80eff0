use std::sync::{Arc, Mutex};

use broadside::{Board, Cell, GridListener, Orientation, Point, TOTAL_SHIP_CELLS};

/// Place the standard fleet on disjoint rows: 5 + 4 + 3 + 3 + 2 = 17 cells.
fn place_full_fleet(board: &mut Board) -> Vec<Point> {
    assert!(board.place_ship(Orientation::Horizontal, 5, 0, 0));
    assert!(board.place_ship(Orientation::Horizontal, 4, 2, 0));
    assert!(board.place_ship(Orientation::Horizontal, 3, 4, 0));
    assert!(board.place_ship(Orientation::Horizontal, 3, 6, 0));
    assert!(board.place_ship(Orientation::Horizontal, 2, 8, 0));
    board
        .ships()
        .iter()
        .flat_map(|s| s.cells().to_vec())
        .collect()
}

#[test]
fn test_placement_marks_cells() {
    let mut board = Board::new();
    assert!(board.place_ship(Orientation::Horizontal, 3, 4, 2));
    for col in 2..5 {
        assert_eq!(board.cell(Point::new(4, col)), Some(Cell::Ship));
    }
    assert_eq!(board.cell(Point::new(4, 5)), Some(Cell::Unhit));
    let ship = &board.ships()[0];
    assert_eq!(ship.nose(), Point::new(4, 2));
    assert_eq!(ship.orientation(), Orientation::Horizontal);
    assert_eq!(ship.len(), 3);
}

#[test]
fn test_overflowing_placement_is_clamped() {
    let mut board = Board::new();
    // Horizontal span past the right edge slides back to col 5.
    assert!(board.place_ship(Orientation::Horizontal, 5, 0, 9));
    assert_eq!(board.ships()[0].nose(), Point::new(0, 5));
    for col in 5..10 {
        assert_eq!(board.cell(Point::new(0, col)), Some(Cell::Ship));
    }
    // Vertical span past the bottom edge slides up to row 6.
    assert!(board.place_ship(Orientation::Vertical, 4, 9, 0));
    assert_eq!(board.ships()[1].nose(), Point::new(6, 0));
    for row in 6..10 {
        assert_eq!(board.cell(Point::new(row, 0)), Some(Cell::Ship));
    }
}

#[test]
fn test_overlapping_placement_rejected_without_mutation() {
    let mut board = Board::new();
    assert!(board.place_ship(Orientation::Horizontal, 5, 0, 0));
    assert!(!board.place_ship(Orientation::Vertical, 3, 0, 2));
    assert_eq!(board.ships().len(), 1);
    assert_eq!(board.placed_cells(), 5);
    // The vertical candidate's tail cells stay untouched.
    assert_eq!(board.cell(Point::new(1, 2)), Some(Cell::Unhit));
    assert_eq!(board.cell(Point::new(2, 2)), Some(Cell::Unhit));
}

#[test]
fn test_shot_resolution_and_idempotency() {
    let mut board = Board::new();
    assert!(board.place_ship(Orientation::Horizontal, 2, 0, 0));

    assert!(board.try_shot(Point::new(5, 5)));
    assert_eq!(board.cell(Point::new(5, 5)), Some(Cell::Miss));
    assert!(board.used(Point::new(5, 5)));
    assert!(!board.hit(Point::new(5, 5)));

    assert!(board.try_shot(Point::new(0, 0)));
    assert_eq!(board.cell(Point::new(0, 0)), Some(Cell::Hit));
    assert!(board.hit(Point::new(0, 0)));

    // Each cell accepts exactly one shot; nothing moves on a rejection.
    let (moves, hits, misses) = (board.moves(), board.hits(), board.misses());
    assert!(!board.try_shot(Point::new(5, 5)));
    assert!(!board.try_shot(Point::new(0, 0)));
    assert_eq!(board.moves(), moves);
    assert_eq!(board.hits(), hits);
    assert_eq!(board.misses(), misses);
}

#[test]
fn test_out_of_bounds_shot_rejected() {
    let mut board = Board::new();
    assert!(!board.try_shot(Point::new(10, 0)));
    assert!(!board.try_shot(Point::new(0, 10)));
    assert_eq!(board.moves(), 0);
}

#[test]
fn test_hit_streak_tracking() {
    let mut board = Board::new();
    place_full_fleet(&mut board);

    // Hit, hit, miss, hit, hit, hit: best streak is three.
    assert!(board.try_shot(Point::new(0, 0)));
    assert!(board.try_shot(Point::new(0, 1)));
    assert!(board.try_shot(Point::new(9, 9)));
    assert!(board.try_shot(Point::new(0, 2)));
    assert!(board.try_shot(Point::new(0, 3)));
    assert!(board.try_shot(Point::new(0, 4)));
    assert_eq!(board.max_streak(), 3);
    assert_eq!(board.hits(), 5);
    assert_eq!(board.misses(), 1);
    assert_eq!(board.moves(), 6);
}

#[test]
fn test_game_over_requires_full_fleet() {
    let mut board = Board::new();
    assert!(board.place_ship(Orientation::Horizontal, 5, 0, 0));
    for col in 0..5 {
        assert!(board.try_shot(Point::new(0, col)));
    }
    // Every placed cell is hit, but the fleet is incomplete.
    assert!(!board.game_over());
}

#[test]
fn test_game_over_on_seventeenth_hit_and_monotonic() {
    let mut board = Board::new();
    let cells = place_full_fleet(&mut board);
    assert_eq!(cells.len(), TOTAL_SHIP_CELLS);

    for (i, p) in cells.iter().enumerate() {
        assert!(!board.game_over(), "game over before shot {}", i);
        assert!(board.try_shot(*p));
    }
    assert!(board.game_over());

    // Further misses never un-end the game.
    assert!(board.try_shot(Point::new(9, 9)));
    assert!(board.game_over());
}

#[test]
fn test_sunk_is_recomputed_from_grid() {
    let mut board = Board::new();
    assert!(board.place_ship(Orientation::Vertical, 2, 3, 3));
    assert!(board.try_shot(Point::new(3, 3)));
    assert!(!board.ships()[0].is_sunk(&board));
    assert!(board.try_shot(Point::new(4, 3)));
    assert!(board.ships()[0].is_sunk(&board));
}

struct Recorder(Arc<Mutex<Vec<Point>>>);

impl GridListener for Recorder {
    fn grid_updated(&mut self, at: Point) {
        self.0.lock().unwrap().push(at);
    }
}

#[test]
fn test_listener_sees_placements_and_shots() {
    let updates = Arc::new(Mutex::new(Vec::new()));
    let mut board = Board::new();
    board.set_listener(Box::new(Recorder(Arc::clone(&updates))));

    // Clamped placement reports the repaired origin.
    assert!(board.place_ship(Orientation::Horizontal, 5, 0, 9));
    assert!(board.try_shot(Point::new(0, 5)));
    // Rejected shots are silent.
    assert!(!board.try_shot(Point::new(0, 5)));

    let seen = updates.lock().unwrap();
    assert_eq!(*seen, vec![Point::new(0, 5), Point::new(0, 5)]);
}
