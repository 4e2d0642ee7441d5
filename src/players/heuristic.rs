use rand::seq::SliceRandom;
use rand::{SeedableRng, rngs::StdRng};

use crate::game::cards::{CharacterCard, DistrictCard, best_card_index};
use crate::game::rules::{self, DestroyOption, MagicianChoice};
use crate::game::state::{DEFAULT_THRESHOLD, GameEvent, GameState};
use crate::players::{DecisionSource, DestroyChoice};
use crate::types::{CharacterKind, DestroyVia, DistrictColor, ResourceChoice, TargetPurpose};

const ARMORY_MIN_COST: u32 = 3;
const LABORATORY_MAX_COST: u32 = 2;
const MUSEUM_MAX_COST: u32 = 3;
const MAGICIAN_KEEP_COST: u32 = 3;
const GRAVEYARD_MIN_COST: u32 = 3;

/// Empty, or at most two cards with nothing purple.
pub fn hand_is_poor(hand: &[DistrictCard]) -> bool {
    hand.is_empty()
        || (hand.len() <= 2
            && hand.iter().all(|c| c.color() != DistrictColor::Purple))
}

fn cheapest_index(cards: &[DistrictCard]) -> Option<usize> {
    cards
        .iter()
        .enumerate()
        .min_by_key(|(idx, c)| (c.cost(), *idx))
        .map(|(idx, _)| idx)
}

/// Rule-of-thumb bot. Falls back to a random pick when its preferences are
/// unavailable; the RNG is rederived every round from its seed.
#[derive(Debug, Clone)]
pub struct HeuristicPlayer {
    seed: u64,
    rng: StdRng,
}

impl HeuristicPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn preferred_characters(state: &GameState, seat: usize) -> &'static [CharacterKind] {
        let player = &state.players[seat];
        if player.gold < 2 {
            &[CharacterKind::Thief, CharacterKind::Merchant]
        } else if player.hand.len() < 2 {
            &[CharacterKind::Magician, CharacterKind::Architect]
        } else if player.city.len() >= 7 {
            &[CharacterKind::Assassin, CharacterKind::Bishop]
        } else {
            &[]
        }
    }
}

impl DecisionSource for HeuristicPlayer {
    fn choose_character(
        &mut self,
        state: &GameState,
        seat: usize,
        available: &[CharacterCard],
    ) -> CharacterKind {
        Self::preferred_characters(state, seat)
            .iter()
            .copied()
            .find(|kind| available.iter().any(|c| c.kind == *kind))
            .or_else(|| available.choose(&mut self.rng).map(|c| c.kind))
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
        let hand = &state.players[seat].hand;
        if hand_is_poor(hand) {
            let richest = state
                .players
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != seat)
                .max_by_key(|(other, p)| (p.hand.len(), std::cmp::Reverse(*other)));
            return match richest {
                Some((other, p)) if p.hand.len() > hand.len() => MagicianChoice::SwapWith(other),
                _ => MagicianChoice::Discard(Vec::new()),
            };
        }
        MagicianChoice::Discard(
            hand.iter()
                .enumerate()
                .filter(|(_, c)| c.cost() < MAGICIAN_KEEP_COST)
                .map(|(idx, _)| idx)
                .collect(),
        )
    }

    fn choose_destroy(
        &mut self,
        state: &GameState,
        _seat: usize,
        via: DestroyVia,
        options: &[DestroyOption],
    ) -> Option<DestroyChoice> {
        match via {
            DestroyVia::Warlord => {
                let mut ranked = options.to_vec();
                ranked.sort_by_key(|o| std::cmp::Reverse(state.players[o.target].city.len()));
                ranked.first().copied().map(DestroyChoice::from)
            }
            DestroyVia::Armory => {
                let cost = |o: &DestroyOption| state.players[o.target].city[o.district].cost();
                let best = options
                    .iter()
                    .enumerate()
                    .max_by_key(|(idx, o)| (cost(*o), std::cmp::Reverse(*idx)))
                    .map(|(_, o)| *o)?;
                (cost(&best) > ARMORY_MIN_COST).then(|| best.into())
            }
        }
    }

    fn choose_graveyard(&mut self, state: &GameState, seat: usize, card: &DistrictCard) -> bool {
        card.cost() >= GRAVEYARD_MIN_COST && state.players[seat].gold >= 2
    }

    fn choose_laboratory(&mut self, state: &GameState, seat: usize) -> Option<usize> {
        let hand = &state.players[seat].hand;
        cheapest_index(hand).filter(|idx| hand[*idx].cost() <= LABORATORY_MAX_COST)
    }

    fn choose_smithy(&mut self, state: &GameState, seat: usize) -> bool {
        state.players[seat].hand.len() < 2
    }

    fn choose_museum(&mut self, state: &GameState, seat: usize) -> Option<usize> {
        let hand = &state.players[seat].hand;
        cheapest_index(hand).filter(|idx| hand[*idx].cost() < MUSEUM_MAX_COST)
    }

    fn choose_resource(&mut self, state: &GameState, seat: usize) -> ResourceChoice {
        let player = &state.players[seat];
        if player.gold < 2 || player.gold < player.most_expensive_in_hand().unwrap_or(0) {
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
        best_card_index(drawn).unwrap_or(0)
    }

    fn choose_build(&mut self, state: &GameState, seat: usize) -> Option<usize> {
        let player = &state.players[seat];
        rules::buildable(state, seat)
            .into_iter()
            .max_by_key(|idx| (player.build_cost(&player.hand[*idx]), std::cmp::Reverse(*idx)))
    }

    fn choose_lighthouse(&mut self, state: &GameState, _seat: usize) -> usize {
        best_card_index(&state.deck.snapshot()).unwrap_or(0)
    }

    fn choose_bell_tower(&mut self, state: &GameState, seat: usize) -> bool {
        state.players[seat].city.len() < DEFAULT_THRESHOLD
    }

    fn observe(&mut self, _state: &GameState, event: &GameEvent) {
        if let GameEvent::RoundStarted { round, .. } = event {
            let seed = self.seed.wrapping_mul(31).wrapping_add(u64::from(*round));
            self.rng = StdRng::seed_from_u64(seed);
        }
    }
}
