use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::game::cards::Landmark;
use crate::game::players::PlayerState;
use crate::game::state::GameState;
use crate::types::DistrictColor;

pub const DIVERSITY_BONUS: u32 = 3;
pub const FIRST_COMPLETE_BONUS: u32 = 4;
pub const COMPLETE_BONUS: u32 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub districts: u32,
    pub diversity: u32,
    pub completion: u32,
    pub museum: u32,
    pub treasury: u32,
    pub map_room: u32,
    pub wishing_well: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.districts
            + self.diversity
            + self.completion
            + self.museum
            + self.treasury
            + self.map_room
            + self.wishing_well
    }
}

/// Colors present in a city. School of Magic and a Haunted City built before
/// `final_round` each stand in for one missing color.
pub fn distinct_colors(player: &PlayerState, final_round: u32) -> usize {
    let mut wildcards = 0;
    let mut colors = Vec::new();
    for card in &player.city {
        if card.is_wildcard() {
            wildcards += 1;
        } else if card.is(Landmark::HauntedCity) {
            if card.last_built_round() != Some(final_round) {
                wildcards += 1;
            }
        } else {
            colors.push(card.color());
        }
    }
    let present = colors.into_iter().unique().count();
    (present + wildcards).min(DistrictColor::ALL.len())
}

pub fn score_player(
    state: &GameState,
    seat: usize,
    final_round: u32,
) -> ScoreBreakdown {
    let player = &state.players[seat];
    let districts = player.city.iter().map(|c| c.score_value()).sum();
    let diversity = if distinct_colors(player, final_round) >= DistrictColor::ALL.len() {
        DIVERSITY_BONUS
    } else {
        0
    };
    let completion = if player.city.len() >= state.end_threshold {
        if state.first_to_finish == Some(seat) {
            FIRST_COMPLETE_BONUS
        } else {
            COMPLETE_BONUS
        }
    } else {
        0
    };
    let museum = player
        .city
        .iter()
        .filter(|c| c.is(Landmark::Museum))
        .map(|c| c.stored_cards().len() as u32)
        .sum();
    let treasury = if player.has_built(Landmark::ImperialTreasury) {
        player.gold
    } else {
        0
    };
    let map_room = if player.has_built(Landmark::MapRoom) {
        player.hand.len() as u32
    } else {
        0
    };
    let wishing_well = if player.has_built(Landmark::WishingWell) {
        player
            .city
            .iter()
            .filter(|c| c.color() == DistrictColor::Purple && !c.is(Landmark::WishingWell))
            .count() as u32
    } else {
        0
    };

    ScoreBreakdown {
        districts,
        diversity,
        completion,
        museum,
        treasury,
        map_room,
        wishing_well,
    }
}

/// Scores every seat and records the totals on the players. `final_round` is
/// the last round that was actually played.
pub fn score_game(state: &mut GameState, final_round: u32) -> Vec<ScoreBreakdown> {
    let scores = (0..state.players.len())
        .map(|seat| score_player(state, seat, final_round))
        .collect::<Vec<_>>();
    for (player, score) in state.players.iter_mut().zip(&scores) {
        player.score = Some(score.total());
    }
    scores
}

/// Highest total wins; ties go to the higher character order held at the end.
pub fn winner(state: &GameState, scores: &[ScoreBreakdown]) -> Option<usize> {
    scores.iter().enumerate().max_by_key(|(seat, score)| {
        let order = state.players[*seat].character.map_or(0, |c| c.order());
        (score.total(), order)
    })
    .map(|(seat, _)| seat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cards::DistrictCard;
    use crate::game::catalog::bundled_deck;
    use crate::game::state::GameConfig;
    use crate::types::CharacterKind;

    fn card(name: &str, cost: u32, color: DistrictColor) -> DistrictCard {
        DistrictCard::new(name, cost, color, "")
    }

    fn state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), bundled_deck().unwrap()).unwrap();
        for player in &mut state.players {
            player.hand.clear();
            player.gold = 0;
        }
        state
    }

    #[test]
    fn wishing_well_city_scores_fourteen() {
        let mut state = state();
        let mut haunted = card("Haunted City", 2, DistrictColor::Purple);
        haunted.set_built_round(2);
        state.players[0].city = vec![
            card("Wishing Well", 3, DistrictColor::Purple),
            card("Wishing Well", 0, DistrictColor::Red),
            card("Watchtower", 2, DistrictColor::Red),
            haunted,
            card("Museum", 5, DistrictColor::Purple),
        ];
        state.game_should_end = true;
        let score = score_player(&state, 0, 5);
        assert_eq!(score.districts, 12);
        assert_eq!(score.wishing_well, 2);
        assert_eq!(score.diversity, 0);
        assert_eq!(score.completion, 0);
        assert_eq!(score.total(), 14);
    }

    #[test]
    fn dragon_gate_and_university_score_eight() {
        let mut state = state();
        state.players[0].city = vec![
            card("Dragon Gate", 6, DistrictColor::Purple),
            card("University", 6, DistrictColor::Purple),
        ];
        assert_eq!(score_player(&state, 0, 3).districts, 16);
    }

    #[test]
    fn haunted_city_fills_a_color_unless_built_last_round() {
        let mut state = state();
        let mut haunted = card("Haunted City", 2, DistrictColor::Purple);
        haunted.set_built_round(3);
        state.players[0].city = vec![
            card("Manor", 3, DistrictColor::Yellow),
            card("Temple", 1, DistrictColor::Blue),
            card("Tavern", 1, DistrictColor::Green),
            haunted,
        ];
        assert_eq!(distinct_colors(&state.players[0], 4), 4);
        state.players[0]
            .city
            .push(card("Watchtower", 1, DistrictColor::Red));
        assert_eq!(score_player(&state, 0, 4).diversity, DIVERSITY_BONUS);

        state.players[0].city.pop();
        assert_eq!(distinct_colors(&state.players[0], 3), 3);
        assert_eq!(score_player(&state, 0, 3).diversity, 0);
    }

    #[test]
    fn haunted_city_built_in_final_round_adds_no_color() {
        let mut state = state();
        let mut haunted = card("Haunted City", 2, DistrictColor::Purple);
        haunted.set_built_round(5);
        state.players[0].city = vec![
            card("Manor", 3, DistrictColor::Yellow),
            card("Temple", 1, DistrictColor::Blue),
            card("Tavern", 1, DistrictColor::Green),
            card("Watchtower", 1, DistrictColor::Red),
            haunted,
        ];
        assert_eq!(distinct_colors(&state.players[0], 5), 4);
        assert_eq!(score_player(&state, 0, 5).diversity, 0);
    }

    #[test]
    fn school_of_magic_completes_the_set() {
        let mut state = state();
        state.players[0].city = vec![
            card("Manor", 3, DistrictColor::Yellow),
            card("Temple", 1, DistrictColor::Blue),
            card("Tavern", 1, DistrictColor::Green),
            card("Keep", 3, DistrictColor::Purple),
            card("School of Magic", 6, DistrictColor::Purple),
        ];
        assert_eq!(score_player(&state, 0, 1).diversity, DIVERSITY_BONUS);
    }

    #[test]
    fn completion_bonus_favours_first_finisher() {
        let mut state = state();
        for seat in [0, 1] {
            state.players[seat].city = (0..8)
                .map(|i| card(&format!("Shop {i}"), 1, DistrictColor::Green))
                .collect();
        }
        state.first_to_finish = Some(1);
        assert_eq!(score_player(&state, 0, 1).completion, COMPLETE_BONUS);
        assert_eq!(score_player(&state, 1, 1).completion, FIRST_COMPLETE_BONUS);
        assert_eq!(score_player(&state, 2, 1).completion, 0);
    }

    #[test]
    fn gold_hand_and_museum_bonuses() {
        let mut state = state();
        let mut museum = card("Museum", 4, DistrictColor::Purple);
        museum.store_card(card("Tavern", 1, DistrictColor::Green));
        state.players[0].city = vec![
            museum,
            card("Imperial Treasury", 5, DistrictColor::Purple),
            card("Map Room", 5, DistrictColor::Purple),
        ];
        state.players[0].gold = 4;
        state.players[0].hand = vec![card("Temple", 1, DistrictColor::Blue)];
        let score = score_player(&state, 0, 1);
        assert_eq!(score.museum, 1);
        assert_eq!(score.treasury, 4);
        assert_eq!(score.map_room, 1);
        assert_eq!(score.total(), 14 + 1 + 4 + 1);
    }

    #[test]
    fn ties_go_to_higher_character() {
        let mut state = state();
        for seat in 0..4 {
            state.players[seat].city = vec![card("Manor", 3, DistrictColor::Yellow)];
        }
        state.players[1].character = Some(CharacterKind::Bishop);
        state.players[3].character = Some(CharacterKind::Warlord);
        state.players[2].character = Some(CharacterKind::Assassin);
        let scores = score_game(&mut state, 1);
        assert_eq!(winner(&state, &scores), Some(3));
        assert_eq!(state.players[0].score, Some(3));
    }
}
