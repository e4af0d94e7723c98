mod common;

use proptest::prelude::*;
use puzzle_runtime::{LevelState, Runtime};

use common::{WAREHOUSE, runtime};

const MOVES: [&str; 5] = ["up", "down", "left", "right", "action"];
const TOKENS: [&str; 6] = ["up", "down", "left", "right", "action", "undo"];

/// Every occupant sits in its own object's layer, no intent survives a turn
/// and recorded deltas stay on the board.
fn assert_consistent(runtime: &Runtime) {
    let (Some(game), Some(level)) = (runtime.game(), runtime.level()) else {
        panic!("level loaded");
    };
    for (_, cell) in level.cells() {
        for (layer, occupant) in cell.occupants() {
            assert_eq!(game.object(occupant.object).map(|def| def.layer), Some(layer));
            assert_eq!(occupant.movement, None);
        }
    }
    for step in runtime.turn_deltas().iter().flat_map(|subturn| &subturn.steps) {
        for cell in &step.cell_deltas {
            assert!(level.contains(cell.position));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn identical_inputs_give_identical_turns(
        tokens in prop::collection::vec(prop::sample::select(TOKENS.to_vec()), 0..40)
    ) {
        let (mut left, _) = runtime(WAREHOUSE);
        let (mut right, _) = runtime(WAREHOUSE);

        for token in tokens {
            prop_assert_eq!(left.send_input(token), right.send_input(token));
            prop_assert_eq!(left.turn_report(), right.turn_report());
            prop_assert_eq!(left.fingerprint(), right.fingerprint());
            prop_assert_eq!(left.phase(), right.phase());
        }
    }

    #[test]
    fn undo_walks_back_through_every_board(
        moves in prop::collection::vec(prop::sample::select(MOVES.to_vec()), 0..40)
    ) {
        let (mut runtime, _) = runtime(WAREHOUSE);
        let mut boards: Vec<Option<LevelState>> = Vec::new();

        for token in moves {
            let before = runtime.level_state();
            if runtime.send_input(token) == Ok(true) {
                boards.push(before);
            }
            assert_consistent(&runtime);
        }
        prop_assert_eq!(runtime.undo_depth(), boards.len());

        while let Some(expected) = boards.pop() {
            prop_assert_eq!(runtime.undo(), Ok(true));
            prop_assert_eq!(runtime.level_state(), expected);
            assert_consistent(&runtime);
        }
        let start = runtime.level_state();
        prop_assert_eq!(runtime.undo(), Ok(false));
        prop_assert_eq!(runtime.level_state(), start);
    }
}

#[test]
fn restart_matches_a_fresh_load() {
    let (mut played, _) = runtime(WAREHOUSE);
    let (fresh, _) = runtime(WAREHOUSE);
    for token in ["right", "down", "down", "left", "up"] {
        played.send_input(token).unwrap();
    }

    played.restart_level().unwrap();
    assert_eq!(played.level_state(), fresh.level_state());
    assert_eq!(played.fingerprint(), fresh.fingerprint());
}
