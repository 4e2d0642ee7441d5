use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::game::cards::{CharacterCard, Landmark};
use crate::game::players::PlayerState;
use crate::game::state::{DEFAULT_THRESHOLD, DecisionError, GameState};
use crate::types::{CharacterKind, DestroyVia, TargetPurpose};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DestroyOption {
    pub target: usize,
    pub district: usize,
    pub cost: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MagicianChoice {
    SwapWith(usize),
    /// Hand positions to discard and redraw; empty means keep the hand.
    Discard(Vec<usize>),
}

fn own_order(state: &GameState, seat: usize) -> Option<u8> {
    state.character_of(seat).map(CharacterKind::order)
}

fn face_up(state: &GameState, order: u8) -> bool {
    state.face_up_removed.iter().any(|k| k.order() == order)
}

/// Orders the Assassin may name: 2 through 8, minus itself and anything
/// removed face up this round.
pub fn kill_targets(state: &GameState, seat: usize) -> Vec<u8> {
    let own = own_order(state, seat);
    (2..=8)
        .filter(|order| Some(*order) != own && !face_up(state, *order))
        .collect()
}

/// Orders the Thief may name: 3 through 8, minus itself, the killed order,
/// and face-up removals.
pub fn steal_targets(state: &GameState, seat: usize) -> Vec<u8> {
    let own = own_order(state, seat);
    (3..=8)
        .filter(|order| {
            Some(*order) != own && Some(*order) != state.killed_order && !face_up(state, *order)
        })
        .collect()
}

pub fn targets(state: &GameState, seat: usize, purpose: TargetPurpose) -> Vec<u8> {
    match purpose {
        TargetPurpose::Kill => kill_targets(state, seat),
        TargetPurpose::Steal => steal_targets(state, seat),
    }
}

pub fn validate_target(
    state: &GameState,
    seat: usize,
    purpose: TargetPurpose,
    order: u8,
) -> Result<(), DecisionError> {
    if targets(state, seat, purpose).contains(&order) {
        Ok(())
    } else {
        Err(DecisionError::input(format!(
            "character {order} cannot be chosen to {purpose}"
        )))
    }
}

pub fn validate_character(
    available: &[CharacterCard],
    kind: CharacterKind,
) -> Result<(), DecisionError> {
    if available.iter().any(|c| c.kind == kind) {
        Ok(())
    } else {
        Err(DecisionError::input(format!("{kind} is not available")))
    }
}

/// A Bishop is shielded from the Warlord unless the Bishop was assassinated.
pub fn bishop_protected(state: &GameState, seat: usize) -> bool {
    state.character_of(seat) == Some(CharacterKind::Bishop)
        && state.killed_order != Some(CharacterKind::Bishop.order())
}

/// District cost minus one; a Great Wall makes every other district in its
/// city one gold dearer.
pub fn destroy_cost(target: &PlayerState, district: usize) -> u32 {
    let card = &target.city[district];
    let mut cost = card.cost().saturating_sub(1);
    if !card.is(Landmark::GreatWall) && target.has_built(Landmark::GreatWall) {
        cost += 1;
    }
    cost
}

fn warlord_can_target(state: &GameState, seat: usize, target: usize) -> bool {
    target != seat
        && state.players[target].city.len() < DEFAULT_THRESHOLD
        && !bishop_protected(state, target)
}

/// Every district `seat` may legally destroy right now. Warlord options are
/// priced and filtered by gold; the Armory pays with itself.
pub fn destroy_options(state: &GameState, seat: usize, via: DestroyVia) -> Vec<DestroyOption> {
    let gold = state.players[seat].gold;
    let mut options = Vec::new();
    for (target, player) in state.players.iter().enumerate() {
        let eligible = match via {
            DestroyVia::Warlord => warlord_can_target(state, seat, target),
            DestroyVia::Armory => target != seat,
        };
        if !eligible {
            continue;
        }
        for (district, card) in player.city.iter().enumerate() {
            if card.is(Landmark::Keep) {
                continue;
            }
            let cost = match via {
                DestroyVia::Warlord => destroy_cost(player, district),
                DestroyVia::Armory => 0,
            };
            if cost <= gold {
                options.push(DestroyOption {
                    target,
                    district,
                    cost,
                });
            }
        }
    }
    options
}

pub fn validate_destroy(
    state: &GameState,
    seat: usize,
    via: DestroyVia,
    target: usize,
    district: usize,
) -> Result<DestroyOption, DecisionError> {
    let Some(player) = state.players.get(target) else {
        return Err(DecisionError::input(format!("no player in seat {}", target + 1)));
    };
    if district >= player.city.len() {
        return Err(DecisionError::input(format!(
            "{} has no district {}",
            player.name,
            district + 1
        )));
    }
    destroy_options(state, seat, via)
        .into_iter()
        .find(|o| o.target == target && o.district == district)
        .ok_or_else(|| {
            DecisionError::input(format!(
                "{} in {}'s city cannot be destroyed",
                player.city[district].name(),
                player.name
            ))
        })
}

/// Hand positions `seat` can afford to build without breaking the duplicate rule.
pub fn buildable(state: &GameState, seat: usize) -> Vec<usize> {
    let player = &state.players[seat];
    player
        .hand
        .iter()
        .enumerate()
        .filter(|(_, card)| {
            player.build_cost(card) <= player.gold && player.duplicate_allowed(card, state.round)
        })
        .map(|(idx, _)| idx)
        .collect()
}

pub fn validate_build(state: &GameState, seat: usize, index: usize) -> Result<u32, DecisionError> {
    let player = &state.players[seat];
    if player.builds_remaining() == 0 {
        return Err(DecisionError::stale("no builds left this turn"));
    }
    let Some(card) = player.hand.get(index) else {
        return Err(DecisionError::input(format!("no card at hand position {}", index + 1)));
    };
    let cost = player.build_cost(card);
    if cost > player.gold {
        return Err(DecisionError::input(format!(
            "{} costs {cost} but you have {} gold",
            card.name(),
            player.gold
        )));
    }
    if !player.duplicate_allowed(card, state.round) {
        return Err(DecisionError::input(format!(
            "{} is already in your city",
            card.name()
        )));
    }
    Ok(cost)
}

pub fn validate_magician(
    state: &GameState,
    seat: usize,
    choice: &MagicianChoice,
) -> Result<(), DecisionError> {
    match choice {
        MagicianChoice::SwapWith(other) => {
            if *other == seat || *other >= state.player_count() {
                return Err(DecisionError::input("choose another player to swap with"));
            }
        }
        MagicianChoice::Discard(indices) => {
            let hand = state.players[seat].hand.len();
            if indices.iter().any(|idx| *idx >= hand) {
                return Err(DecisionError::input("discard position outside your hand"));
            }
            if !indices.iter().all_unique() {
                return Err(DecisionError::input("each card can be discarded once"));
            }
        }
    }
    Ok(())
}

pub fn validate_hand_index(
    state: &GameState,
    seat: usize,
    index: usize,
) -> Result<(), DecisionError> {
    if index < state.players[seat].hand.len() {
        Ok(())
    } else {
        Err(DecisionError::input(format!("no card at hand position {}", index + 1)))
    }
}
