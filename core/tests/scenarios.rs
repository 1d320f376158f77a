use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sweeper_core::*;

/// Lays out the same mines every time.
struct FixedLayout(&'static [Coord2]);

impl BoardGenerator for FixedLayout {
    fn fill(&mut self, config: &GameConfig, board: &mut Board) {
        board.init(config.size());
        for &coords in self.0 {
            board.place_mine(coords);
        }
        board.compute_neighbor_counts();
    }
}

fn started(config: GameConfig, generator: &mut impl BoardGenerator) -> GameState {
    let mut state = GameState::new(config).unwrap();
    assert_eq!(state.apply_action(Action::NewGame, generator), ActionResult::Changed);
    state
}

fn assert_consistent(state: &GameState) {
    assert_eq!(state.check(), Ok(()));
    assert_eq!(
        state.runtime().mines_left + state.board().flagged_mine_count(),
        state.board().mine_count()
    );
}

#[test]
fn corner_mine_game_is_won_from_the_origin() {
    let mut generator = FixedLayout(&[(2, 2)]);
    let mut state = started(GameConfig::new(3, 3, 0).unwrap(), &mut generator);

    let outcome = state.apply_action_ex(Action::Reveal, &mut generator);

    assert_eq!(outcome.result, ActionResult::Win);
    assert_eq!(outcome.move_outcome, MoveOutcome::None);
    assert_eq!(state.phase(), Phase::Won);
    assert_consistent(&state);
}

#[test]
fn walking_onto_a_mine_loses() {
    let mut generator = FixedLayout(&[(1, 0), (2, 2)]);
    let mut state = started(GameConfig::new(3, 3, 0).unwrap(), &mut generator);

    assert_eq!(state.apply_action(Action::Reveal, &mut generator), ActionResult::Changed);
    assert_eq!(state.runtime().tiles_left, 6);
    assert_eq!(
        state.apply_action(Action::Move { dx: 1, dy: 0 }, &mut generator),
        ActionResult::Changed
    );
    assert_eq!(state.apply_action(Action::Reveal, &mut generator), ActionResult::Lose);

    assert!(state.board().iter().all(|(_, cell)| cell.is_revealed()));
    assert_consistent(&state);

    // only moves and new games get through after the loss
    assert_eq!(state.apply_action(Action::Flag, &mut generator), ActionResult::Noop);
    assert_eq!(state.apply_action(Action::NewGame, &mut generator), ActionResult::Changed);
    assert_eq!(state.phase(), Phase::Playing);
    assert_eq!(state.runtime().tiles_left, 7);
}

#[test]
fn flag_then_chord_clears_the_board() {
    let mut generator = FixedLayout(&[(0, 1), (2, 1)]);
    let mut state = started(GameConfig::new(3, 3, 0).unwrap(), &mut generator);
    let mut act = |state: &mut GameState, action| state.apply_action(action, &mut generator);

    act(&mut state, Action::Move { dx: 1, dy: 1 });
    assert_eq!(act(&mut state, Action::Reveal), ActionResult::Changed);
    assert_eq!(act(&mut state, Action::Chord), ActionResult::Noop);

    act(&mut state, Action::Move { dx: -1, dy: 0 });
    assert_eq!(act(&mut state, Action::Flag), ActionResult::Changed);
    act(&mut state, Action::Move { dx: 2, dy: 0 });
    assert_eq!(act(&mut state, Action::Flag), ActionResult::Changed);
    assert_eq!(state.runtime().flags_left, 0);
    assert_eq!(state.runtime().mines_left, 0);

    act(&mut state, Action::Move { dx: -1, dy: 0 });
    assert_eq!(act(&mut state, Action::Chord), ActionResult::Win);
    assert_consistent(&state);
}

#[test]
fn wrap_setting_changes_edge_behavior() {
    let mut generator = FixedLayout(&[(4, 4)]);
    let mut state = started(GameConfig::new(6, 5, 0).unwrap(), &mut generator);
    let left = Action::Move { dx: -1, dy: 0 };

    let outcome = state.apply_action_ex(left, &mut generator);
    assert_eq!(outcome.result, ActionResult::Noop);
    assert_eq!(outcome.move_outcome, MoveOutcome::Blocked);

    let wrapping = state.config().with_wrap(true);
    assert_eq!(state.set_config(wrapping), ActionResult::Changed);

    let outcome = state.apply_action_ex(left, &mut generator);
    assert_eq!(outcome.result, ActionResult::Changed);
    assert_eq!(outcome.move_outcome, MoveOutcome::Wrapped);
    assert_eq!(state.runtime().cursor_col, 5);
}

#[test]
fn random_play_never_breaks_invariants() {
    let mut dice = SmallRng::seed_from_u64(77);
    let mut generator = ShuffleGenerator::new(SmallRng::seed_from_u64(78));
    let mut finished = 0;

    for game in 0u8..30 {
        let config = GameConfig::new(10, 8, game % 3)
            .unwrap()
            .with_wrap(game % 2 == 0);
        let mut state = started(config, &mut generator);
        assert_consistent(&state);

        for _ in 0..400 {
            let action = match dice.random_range(0..10) {
                0..=3 => Action::Move {
                    dx: dice.random_range(-1i8..=1),
                    dy: dice.random_range(-1i8..=1),
                },
                4..=6 => Action::Reveal,
                7 | 8 => Action::Flag,
                _ => Action::Chord,
            };

            let result = state.apply_action(action, &mut generator);

            assert_ne!(result, ActionResult::Invalid);
            assert_consistent(&state);
            if state.phase().is_finished() {
                finished += 1;
                break;
            }
        }
    }

    assert!(finished > 0);
}

#[test]
fn solvable_games_stay_solvable() {
    let config = GameConfig::new(16, 16, 0).unwrap().with_solvable(true);
    let mut generator = ShuffleGenerator::new(SmallRng::seed_from_u64(3));
    let mut state = GameState::new(config).unwrap();

    for _ in 0..5 {
        assert_eq!(state.new_game(&mut generator), ActionResult::Changed);
        assert!(solver::is_solvable(state.board()));
        assert_consistent(&state);
    }
}

#[test]
fn cooperative_generation_with_preemption() {
    let config = GameConfig::new(32, 32, 2).unwrap().with_solvable(true);
    let mut generator = ShuffleGenerator::new(SmallRng::seed_from_u64(11));
    let mut state = GameState::new(config).unwrap();
    let mut job = GenerationJob::begin(config).unwrap();

    // a few ticks, then the player asks to start anyway
    for _ in 0..3 {
        if !job.step(&mut generator, 1).is_running() {
            break;
        }
    }
    assert!(job.has_latest_candidate());
    assert!(job.attempts_total() >= 1);

    assert_eq!(job.finish(&mut state, true), ActionResult::Changed);
    assert_eq!(state.board().mine_count(), config.mine_count());
    assert_eq!(state.runtime().tiles_left, 1024 - 194);
    assert_consistent(&state);
}

#[test]
fn saved_game_round_trips_through_json() {
    let mut generator = ShuffleGenerator::new(SmallRng::seed_from_u64(5));
    let mut state = started(GameConfig::new(12, 9, 1).unwrap(), &mut generator);
    state.apply_action(Action::Reveal, &mut generator);
    state.apply_action(Action::Move { dx: 3, dy: 2 }, &mut generator);
    state.apply_action(Action::Flag, &mut generator);
    state.stamp_start(4200);

    let json = serde_json::to_string(&state).unwrap();
    let restored: GameState = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, state);
    assert_eq!(restored.validate_state(), ActionResult::Noop);
    assert_eq!(restored.runtime().start_tick, 4200);
}

#[test]
fn tampered_save_is_rejected() {
    let mut generator = FixedLayout(&[(2, 2)]);
    let state = started(GameConfig::new(4, 4, 0).unwrap(), &mut generator);

    let mut value = serde_json::to_value(&state).unwrap();
    value["runtime"]["tiles_left"] = serde_json::json!(1);
    let tampered: GameState = serde_json::from_value(value).unwrap();

    assert_eq!(tampered.validate_state(), ActionResult::Invalid);
    assert_eq!(
        tampered.check(),
        Err(GameError::TilesLeftMismatch {
            expected: 15,
            actual: 1
        })
    );
    assert_eq!(
        GameState::restore(tampered.board().clone(), *tampered.config(), *tampered.runtime()),
        Err(GameError::TilesLeftMismatch {
            expected: 15,
            actual: 1
        })
    );
}
