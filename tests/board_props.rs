use broadside::{Board, Orientation, Point, BOARD_SIZE};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn fleet_board(seed: u64) -> Board {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut board = Board::new();
    assert!(board.place_fleet_randomly(&mut rng));
    board
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn placement_never_leaves_the_grid(
        horizontal in any::<bool>(),
        length in 2usize..=5,
        row in 0usize..40,
        col in 0usize..40,
    ) {
        let mut board = Board::new();
        let orientation = if horizontal {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        // On an empty board nothing can collide, so any origin is repaired
        // into a successful placement.
        prop_assert!(board.place_ship(orientation, length, row, col));
        let ship = &board.ships()[0];
        prop_assert_eq!(ship.len(), length);
        for p in ship.cells() {
            prop_assert!(p.in_bounds());
        }
    }

    #[test]
    fn repeated_shot_is_inert(seed in any::<u64>(), row in 0u8..BOARD_SIZE as u8, col in 0u8..BOARD_SIZE as u8) {
        let mut board = fleet_board(seed);
        let p = Point::new(row, col);
        prop_assert!(board.try_shot(p));
        let (moves, hits, misses, streak) =
            (board.moves(), board.hits(), board.misses(), board.max_streak());
        for _ in 0..3 {
            prop_assert!(!board.try_shot(p));
        }
        prop_assert_eq!(board.moves(), moves);
        prop_assert_eq!(board.hits(), hits);
        prop_assert_eq!(board.misses(), misses);
        prop_assert_eq!(board.max_streak(), streak);
    }

    #[test]
    fn game_over_is_monotonic(seed in any::<u64>()) {
        let mut board = fleet_board(seed);
        let mut was_over = false;
        for row in 0..BOARD_SIZE as u8 {
            for col in 0..BOARD_SIZE as u8 {
                board.try_shot(Point::new(row, col));
                let over = board.game_over();
                prop_assert!(!(was_over && !over), "game over reverted at {} {}", row, col);
                was_over = over;
            }
        }
        // Every cell shot means every ship cell hit.
        prop_assert!(board.game_over());
    }
}
