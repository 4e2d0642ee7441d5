#![allow(dead_code)]

use citadels_rs::game::{DistrictCard, GameConfig, GameState, RoundContext};
use citadels_rs::game::deck::Deck;
use citadels_rs::players::{DecisionSource, ScriptedPlayer};
use citadels_rs::types::DistrictColor;

pub fn card(name: &str, cost: u32, color: DistrictColor) -> DistrictCard {
    DistrictCard::new(name, cost, color, "")
}

pub fn built(name: &str, cost: u32, color: DistrictColor, round: u32) -> DistrictCard {
    let mut card = card(name, cost, color);
    card.set_built_round(round);
    card
}

/// Four seats, a deck of 30 one-gold huts, empty hands and purses.
pub fn bare_state() -> GameState {
    let deck = Deck::from_cards((0..30).map(|i| card(&format!("Hut {i}"), 1, DistrictColor::Green)));
    let mut state = GameState::new(GameConfig::default(), deck).expect("valid setup");
    for player in &mut state.players {
        player.hand.clear();
        player.gold = 0;
    }
    state
}

pub fn scripts(n: usize) -> Vec<ScriptedPlayer> {
    (0..n).map(|_| ScriptedPlayer::new()).collect()
}

pub fn boxed(scripts: Vec<ScriptedPlayer>) -> Vec<Box<dyn DecisionSource>> {
    scripts
        .into_iter()
        .map(|s| Box::new(s) as Box<dyn DecisionSource>)
        .collect()
}

pub fn with_context<T>(
    state: &mut GameState,
    seats: &mut [Box<dyn DecisionSource>],
    f: impl FnOnce(&mut RoundContext<'_>) -> T,
) -> T {
    let mut ctx = RoundContext::new(state, seats);
    f(&mut ctx)
}
