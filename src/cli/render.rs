use std::fmt::Write as _;

use itertools::Itertools;

use crate::game::cards::DistrictCard;
use crate::game::players::PlayerState;
use crate::game::scoring::ScoreBreakdown;
use crate::game::state::{GameEvent, GameState};
use crate::types::TargetPurpose;

fn name(state: &GameState, seat: usize) -> &str {
    state
        .players
        .get(seat)
        .map(|p| p.name.as_str())
        .unwrap_or("?")
}

/// Narration line for an event, from the table's point of view.
pub fn describe(state: &GameState, event: &GameEvent) -> String {
    match event {
        GameEvent::RoundStarted { round, crowned } => format!(
            "=== Round {round} === {} holds the crown.",
            name(state, *crowned)
        ),
        GameEvent::FaceDownRemoved => "A character card is removed face down.".into(),
        GameEvent::FaceUpRemoved { kind } => format!("{kind} is removed face up."),
        GameEvent::CharacterChosen { seat } => {
            format!("{} chose a character.", name(state, *seat))
        }
        GameEvent::CrownTransferred { to, .. } => {
            format!("{} receives the crown.", name(state, *to))
        }
        GameEvent::ThroneRoomPaid { seat } => {
            format!("{} gains 1 gold from the Throne Room.", name(state, *seat))
        }
        GameEvent::CharacterCalled { kind, seat } => match seat {
            Some(seat) => format!("{}: {kind} is called.", name(state, *seat)),
            None => format!("{kind} is called. Nobody answers."),
        },
        GameEvent::TurnSkipped { seat, kind } => format!(
            "{} ({kind}) was assassinated and loses the turn.",
            name(state, *seat)
        ),
        GameEvent::HospitalTurn { seat } => format!(
            "{} was assassinated but the Hospital grants a limited turn.",
            name(state, *seat)
        ),
        GameEvent::TargetChosen {
            seat,
            target,
            purpose,
        } => match purpose {
            TargetPurpose::Kill => format!("{} kills the {target}.", name(state, *seat)),
            TargetPurpose::Steal => format!("{} robs the {target}.", name(state, *seat)),
        },
        GameEvent::GoldStolen { from, to, amount } => format!(
            "{} steals {amount} gold from {}.",
            name(state, *to),
            name(state, *from)
        ),
        GameEvent::HandsSwapped { seat, with } => format!(
            "{} swaps hands with {}.",
            name(state, *seat),
            name(state, *with)
        ),
        GameEvent::CardsExchanged { seat, count } => format!(
            "{} exchanges {count} cards with the deck.",
            name(state, *seat)
        ),
        GameEvent::IncomeCollected { seat, amount } => format!(
            "{} collects {amount} gold from districts.",
            name(state, *seat)
        ),
        GameEvent::CardsDrawn { seat, count } => {
            format!("{} draws {count} cards.", name(state, *seat))
        }
        GameEvent::ResourceTaken { seat, choice } => {
            format!("{} takes {choice}.", name(state, *seat))
        }
        GameEvent::Built {
            seat,
            district,
            cost,
        } => format!("{} builds {district} for {cost} gold.", name(state, *seat)),
        GameEvent::Destroyed {
            by,
            target,
            district,
            via,
        } => format!(
            "{} destroys {district} in {}'s city ({via}).",
            name(state, *by),
            name(state, *target)
        ),
        GameEvent::Reclaimed { seat, district } => format!(
            "{} pays 1 gold to reclaim {district} with the Graveyard.",
            name(state, *seat)
        ),
        GameEvent::LandmarkUsed { seat, landmark } => {
            format!("{} uses the {landmark}.", name(state, *seat))
        }
        GameEvent::BellTowerActivated { seat } => format!(
            "{} rings the Bell Tower: cities are complete at 7 districts.",
            name(state, *seat)
        ),
        GameEvent::BellTowerDeactivated { end_cleared } => {
            if *end_cleared {
                "The Bell Tower falls: the game no longer ends this round.".into()
            } else {
                "The Bell Tower falls: cities need 8 districts again.".into()
            }
        }
        GameEvent::CityCompleted { seat, first } => {
            if *first {
                format!(
                    "{} completes a city first! The game ends after this round.",
                    name(state, *seat)
                )
            } else {
                format!("{} completes a city.", name(state, *seat))
            }
        }
        GameEvent::Saved { path } => format!("Game saved to {path}."),
        GameEvent::SaveFailed { reason } => format!("Save failed: {reason}"),
        GameEvent::GameEnded { winner, score } => format!(
            "{} wins with {score} points!",
            name(state, *winner)
        ),
    }
}

pub fn cards_line(cards: &[DistrictCard]) -> String {
    if cards.is_empty() {
        return "(none)".into();
    }
    cards
        .iter()
        .enumerate()
        .map(|(idx, card)| format!("{}. {card}", idx + 1))
        .join(", ")
}

pub fn city_line(player: &PlayerState) -> String {
    let mut line = format!("{} has built: {}", player.name, cards_line(&player.city));
    let stored = player.stored_card_count();
    if stored > 0 {
        let _ = write!(line, " ({stored} cards under the Museum)");
    }
    line
}

pub fn table_summary(state: &GameState) -> String {
    let mut out = String::new();
    for player in &state.players {
        let crown = if state.crowned == usize::from(player.id) - 1 {
            " (crown)"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{}{crown}: {} gold, {} cards in hand",
            player.name,
            player.gold,
            player.hand.len()
        );
        let _ = writeln!(out, "  {}", city_line(player));
    }
    out
}

pub fn score_table(state: &GameState, scores: &[ScoreBreakdown]) -> String {
    let mut out = format!(
        "{:<10} {:>9} {:>9} {:>10} {:>7} {:>6}\n",
        "PLAYER", "DISTRICTS", "DIVERSITY", "COMPLETION", "EXTRAS", "TOTAL"
    );
    for (player, score) in state.players.iter().zip(scores) {
        let extras = score.museum + score.treasury + score.map_room + score.wishing_well;
        let _ = writeln!(
            out,
            "{:<10} {:>9} {:>9} {:>10} {:>7} {:>6}",
            player.name,
            score.districts,
            score.diversity,
            score.completion,
            extras,
            score.total()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::bundled_deck;
    use crate::game::state::GameConfig;
    use crate::types::{CharacterKind, DistrictColor};

    #[test]
    fn events_name_the_players_involved() {
        let state = GameState::new(GameConfig::default(), bundled_deck().unwrap()).unwrap();
        let text = describe(
            &state,
            &GameEvent::GoldStolen {
                from: 0,
                to: 2,
                amount: 4,
            },
        );
        assert_eq!(text, "Player 3 steals 4 gold from Player 1.");
        let text = describe(
            &state,
            &GameEvent::CharacterCalled {
                kind: CharacterKind::Bishop,
                seat: None,
            },
        );
        assert!(text.contains("Nobody"));
    }

    #[test]
    fn cards_are_listed_one_based() {
        let cards = vec![
            DistrictCard::new("Temple", 1, DistrictColor::Blue, ""),
            DistrictCard::new("Keep", 3, DistrictColor::Purple, ""),
        ];
        assert_eq!(cards_line(&cards), "1. Temple [blue1], 2. Keep [purple3]");
        assert_eq!(cards_line(&[]), "(none)");
    }
}
