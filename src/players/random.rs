use rand::seq::{IteratorRandom, SliceRandom};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::game::cards::{CharacterCard, DistrictCard};
use crate::game::rules::{self, DestroyOption, MagicianChoice};
use crate::game::state::GameState;
use crate::players::{DecisionSource, DestroyChoice};
use crate::types::{CharacterKind, DestroyVia, ResourceChoice, TargetPurpose};

/// Picks uniformly among legal answers.
#[derive(Debug, Clone)]
pub struct RandomPlayer {
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn maybe_index(&mut self, len: usize) -> Option<usize> {
        (0..=len).choose(&mut self.rng).filter(|idx| *idx < len)
    }
}

impl DecisionSource for RandomPlayer {
    fn choose_character(
        &mut self,
        _state: &GameState,
        _seat: usize,
        available: &[CharacterCard],
    ) -> CharacterKind {
        available
            .choose(&mut self.rng)
            .map(|c| c.kind)
            .unwrap_or(CharacterKind::Assassin)
    }

    fn choose_target(
        &mut self,
        _state: &GameState,
        _seat: usize,
        _purpose: TargetPurpose,
        valid: &[u8],
    ) -> u8 {
        valid.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn choose_magician(&mut self, state: &GameState, seat: usize) -> MagicianChoice {
        if self.rng.gen_bool(0.5) {
            let other = (0..state.player_count())
                .filter(|other| *other != seat)
                .choose(&mut self.rng);
            if let Some(other) = other {
                return MagicianChoice::SwapWith(other);
            }
        }
        let hand = state.players[seat].hand.len();
        MagicianChoice::Discard((0..hand).filter(|_| self.rng.gen_bool(0.5)).collect())
    }

    fn choose_destroy(
        &mut self,
        _state: &GameState,
        _seat: usize,
        _via: DestroyVia,
        options: &[DestroyOption],
    ) -> Option<DestroyChoice> {
        let idx = self.maybe_index(options.len())?;
        Some(options[idx].into())
    }

    fn choose_graveyard(&mut self, _state: &GameState, _seat: usize, _card: &DistrictCard) -> bool {
        self.rng.gen_bool(0.5)
    }

    fn choose_laboratory(&mut self, state: &GameState, seat: usize) -> Option<usize> {
        self.maybe_index(state.players[seat].hand.len())
    }

    fn choose_smithy(&mut self, _state: &GameState, _seat: usize) -> bool {
        self.rng.gen_bool(0.5)
    }

    fn choose_museum(&mut self, state: &GameState, seat: usize) -> Option<usize> {
        self.maybe_index(state.players[seat].hand.len())
    }

    fn choose_resource(&mut self, _state: &GameState, _seat: usize) -> ResourceChoice {
        if self.rng.gen_bool(0.5) {
            ResourceChoice::Gold
        } else {
            ResourceChoice::Cards
        }
    }

    fn choose_drawn_card(
        &mut self,
        _state: &GameState,
        _seat: usize,
        drawn: &[DistrictCard],
    ) -> usize {
        self.rng.gen_range(0..drawn.len().max(1))
    }

    fn choose_build(&mut self, state: &GameState, seat: usize) -> Option<usize> {
        let options = rules::buildable(state, seat);
        let idx = self.maybe_index(options.len())?;
        Some(options[idx])
    }

    fn choose_lighthouse(&mut self, state: &GameState, _seat: usize) -> usize {
        self.rng.gen_range(0..state.deck.len().max(1))
    }

    fn choose_bell_tower(&mut self, _state: &GameState, _seat: usize) -> bool {
        self.rng.gen_bool(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::bundled_deck;
    use crate::game::state::GameConfig;

    #[test]
    fn answers_are_always_legal() {
        let mut state = GameState::new(GameConfig::default(), bundled_deck().unwrap()).unwrap();
        state.players[0].gold = 6;
        let mut bot = RandomPlayer::new(3);
        let roster = CharacterCard::roster();
        for _ in 0..200 {
            let kind = bot.choose_character(&state, 0, &roster[2..5]);
            assert!(rules::validate_character(&roster[2..5], kind).is_ok());

            let choice = bot.choose_magician(&state, 0);
            assert!(rules::validate_magician(&state, 0, &choice).is_ok());

            if let Some(idx) = bot.choose_build(&state, 0) {
                assert!(rules::validate_build(&state, 0, idx).is_ok());
            }
            if let Some(idx) = bot.choose_laboratory(&state, 0) {
                assert!(idx < state.players[0].hand.len());
            }
            assert!(bot.choose_lighthouse(&state, 0) < state.deck.len());
        }
    }
}
