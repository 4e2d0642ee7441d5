//! Whole-game properties under random and heuristic play.

use citadels_rs::game::catalog::bundled_deck;
use citadels_rs::game::game::ROUND_LIMIT;
use citadels_rs::game::{Game, GameConfig, GameEvent};
use citadels_rs::players::{DecisionSource, RandomPlayer, ScriptedPlayer};
use citadels_rs::types::CharacterKind;
use proptest::prelude::*;

/// Seat 0 is a scripted observer with empty queues, so it plays the
/// heuristic strategy and records every event.
fn game(seed: u64, players: usize) -> (Game, std::rc::Rc<std::cell::RefCell<Vec<GameEvent>>>) {
    let observer = ScriptedPlayer::new();
    let events = observer.event_log();
    let mut seats: Vec<Box<dyn DecisionSource>> = vec![Box::new(observer)];
    for seat in 1..players {
        seats.push(Box::new(RandomPlayer::new(seed.wrapping_add(seat as u64))));
    }
    let config = GameConfig {
        num_players: players,
        seed,
        ..GameConfig::default()
    };
    let game = Game::new(config, bundled_deck().unwrap(), seats).unwrap();
    (game, events)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn cards_are_conserved_every_round(seed in any::<u64>(), players in 4usize..=7) {
        let (mut game, _) = game(seed, players);
        let total = game.state.total_cards();
        prop_assert_eq!(total, 78);
        while !game.is_over() {
            game.play_round();
            prop_assert_eq!(game.state.total_cards(), total);
        }
        game.finish();
        prop_assert_eq!(game.state.total_cards(), total);
    }

    #[test]
    fn builds_never_exceed_the_turn_limit(seed in any::<u64>(), players in 4usize..=7) {
        let (mut game, events) = game(seed, players);
        game.play();

        let mut current: Option<(usize, CharacterKind)> = None;
        let mut builds = 0;
        for event in events.borrow().iter() {
            match event {
                GameEvent::CharacterCalled { kind, seat } => {
                    current = seat.map(|s| (s, *kind));
                    builds = 0;
                }
                GameEvent::Built { seat, .. } => {
                    let (turn_seat, kind) = current.expect("builds happen during a turn");
                    prop_assert_eq!(*seat, turn_seat);
                    builds += 1;
                    let limit = if kind == CharacterKind::Architect { 3 } else { 1 };
                    prop_assert!(builds <= limit, "{kind} built {builds} districts");
                }
                _ => {}
            }
        }
    }

    #[test]
    fn end_flag_stops_the_game_after_its_round(seed in any::<u64>(), players in 4usize..=7) {
        let (mut game, events) = game(seed, players);
        while !game.is_over() {
            let seen = events.borrow().len();
            game.play_round();
            let round_events = events.borrow()[seen..].to_vec();
            let completed = round_events
                .iter()
                .rposition(|e| matches!(e, GameEvent::CityCompleted { first: true, .. }));
            let cleared = round_events
                .iter()
                .rposition(|e| *e == GameEvent::BellTowerDeactivated { end_cleared: true });
            if let Some(done) = completed {
                if cleared.is_none_or(|c| c < done) {
                    prop_assert!(game.state.game_should_end);
                }
            }
            if game.state.game_should_end {
                prop_assert!(game.state.first_to_finish.is_some());
            }
        }
        let result = game.finish();
        prop_assert!(result.rounds <= ROUND_LIMIT);
        prop_assert!(result.winner.is_some());
    }
}
