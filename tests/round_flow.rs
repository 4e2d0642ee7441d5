//! Turn-phase ordering across a whole round: assassination, theft, and the
//! crown.

mod common;

use citadels_rs::game::game::{selection_phase, turn_phase};
use citadels_rs::game::GameEvent;
use citadels_rs::types::{CharacterKind, DistrictColor, ResourceChoice};

use common::{bare_state, boxed, card, scripts, with_context};

#[test]
fn assassinated_bishop_sits_out_the_round() {
    let mut state = bare_state();
    state.players[0].character = Some(CharacterKind::Assassin);
    state.players[1].character = Some(CharacterKind::Bishop);
    state.players[2].character = Some(CharacterKind::King);
    state.players[3].character = Some(CharacterKind::Warlord);
    state.players[1].gold = 3;
    state.players[1].hand = vec![card("Temple", 1, DistrictColor::Blue)];
    state.players[1].city = vec![card("Church", 2, DistrictColor::Blue)];
    state.players[3].gold = 4;

    let mut scripts = scripts(4);
    scripts[0].targets.push_back(5);
    scripts[3].destroys.push_back(None);
    let events = scripts[2].event_log();
    let mut seats = boxed(scripts);

    let before = state.players[1].clone();
    with_context(&mut state, &mut seats, turn_phase);

    assert_eq!(state.killed_order, Some(5));
    assert_eq!(state.players[1], before);
    assert!(events.borrow().contains(&GameEvent::TurnSkipped {
        seat: 1,
        kind: CharacterKind::Bishop
    }));
    assert!(!events.borrow().iter().any(|e| matches!(
        e,
        GameEvent::ResourceTaken { seat: 1, .. } | GameEvent::Built { seat: 1, .. }
    )));
}

#[test]
fn assassinated_hospital_owner_only_collects() {
    let mut state = bare_state();
    state.players[0].character = Some(CharacterKind::Assassin);
    state.players[1].character = Some(CharacterKind::Merchant);
    state.players[1].city = vec![
        card("Hospital", 6, DistrictColor::Purple),
        card("Market", 2, DistrictColor::Green),
    ];
    state.players[1].gold = 5;
    state.players[1].hand = vec![card("Castle", 4, DistrictColor::Yellow)];

    let mut scripts = scripts(4);
    scripts[0].targets.push_back(6);
    scripts[0].resources.push_back(ResourceChoice::Gold);
    scripts[0].builds.push_back(None);
    scripts[1].resources.push_back(ResourceChoice::Gold);
    let mut seats = boxed(scripts);
    with_context(&mut state, &mut seats, turn_phase);

    // No Merchant income and no build, just the two gold.
    assert_eq!(state.players[1].gold, 7);
    assert_eq!(state.players[1].city.len(), 2);
    assert_eq!(state.players[1].hand.len(), 1);
}

#[test]
fn robbed_king_pays_the_thief_then_plays_a_full_turn() {
    let mut state = bare_state();
    state.players[0].character = Some(CharacterKind::Thief);
    state.players[1].character = Some(CharacterKind::King);
    state.players[1].gold = 5;
    state.players[1].city = vec![card("Manor", 3, DistrictColor::Yellow)];
    state.crowned = 3;

    let mut scripts = scripts(4);
    scripts[0].targets.push_back(4);
    scripts[0].resources.push_back(ResourceChoice::Gold);
    scripts[0].builds.push_back(None);
    scripts[1].resources.push_back(ResourceChoice::Gold);
    scripts[1].builds.push_back(None);
    let events = scripts[3].event_log();
    let mut seats = boxed(scripts);
    with_context(&mut state, &mut seats, turn_phase);

    assert_eq!(state.stolen_order, Some(4));
    assert_eq!(state.players[0].gold, 2 + 5);
    // King income for one yellow district plus two gold from resources.
    assert_eq!(state.players[1].gold, 1 + 2);
    assert_eq!(state.crowned, 1);

    let events = events.borrow();
    let stolen = events
        .iter()
        .position(|e| {
            *e == GameEvent::GoldStolen {
                from: 1,
                to: 0,
                amount: 5,
            }
        })
        .expect("theft reported");
    let king_turn = events
        .iter()
        .position(|e| matches!(e, GameEvent::ResourceTaken { seat: 1, .. }))
        .expect("king collected resources");
    assert!(stolen < king_turn);
}

#[test]
fn characters_are_called_in_order_even_when_unassigned() {
    let mut state = bare_state();
    state.players[2].character = Some(CharacterKind::Merchant);
    let scripts = scripts(4);
    let events = scripts[0].event_log();
    let mut seats = boxed(scripts);
    with_context(&mut state, &mut seats, turn_phase);

    let called = events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            GameEvent::CharacterCalled { kind, seat } => Some((*kind, *seat)),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(called.len(), 8);
    assert_eq!(called[5], (CharacterKind::Merchant, Some(2)));
    assert!(called
        .iter()
        .enumerate()
        .all(|(idx, (kind, _))| usize::from(kind.order()) == idx + 1));
}

#[test]
fn selection_starts_with_the_crowned_seat() {
    let mut state = bare_state();
    state.crowned = 2;
    let scripts = scripts(4);
    let events = scripts[0].event_log();
    let mut seats = boxed(scripts);
    with_context(&mut state, &mut seats, selection_phase);

    let order = events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            GameEvent::CharacterChosen { seat } => Some(*seat),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(order, vec![2, 3, 0, 1]);
    assert_eq!(state.face_up_removed.len(), 3);
}
