use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::game::abilities;
use crate::game::cards::{CharacterCard, DistrictCard, Landmark};
use crate::game::context::{MAX_DECISION_ATTEMPTS, RoundContext};
use crate::game::deck::Deck;
use crate::game::persistence;
use crate::game::rules;
use crate::game::scoring::{self, ScoreBreakdown};
use crate::game::state::{GameConfig, GameError, GameEvent, GameState};
use crate::game::turn;
use crate::players::{DecisionSource, RoundGate};
use crate::types::CharacterKind;

/// Safety stop for games where nobody ever completes a city.
pub const ROUND_LIMIT: u32 = 100;
pub const DEFAULT_SAVE_FILE: &str = "citadels-save.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    pub scores: Vec<ScoreBreakdown>,
    pub winner: Option<usize>,
    pub rounds: u32,
}

pub struct Game {
    pub id: Uuid,
    pub seed: u64,
    pub state: GameState,
    seats: Vec<Box<dyn DecisionSource>>,
}

impl Game {
    pub fn new(
        config: GameConfig,
        deck: Deck<DistrictCard>,
        seats: Vec<Box<dyn DecisionSource>>,
    ) -> Result<Self, GameError> {
        if seats.len() != config.num_players {
            return Err(GameError::SeatMismatch {
                expected: config.num_players,
                actual: seats.len(),
            });
        }
        let seed = config.seed;
        let state = GameState::new(config, deck)?;
        Ok(Self {
            id: Uuid::new_v4(),
            seed,
            state,
            seats,
        })
    }

    /// Resumes a game from an existing state, for example one read from a snapshot.
    pub fn from_state(
        id: Uuid,
        state: GameState,
        seats: Vec<Box<dyn DecisionSource>>,
    ) -> Result<Self, GameError> {
        if seats.len() != state.player_count() {
            return Err(GameError::SeatMismatch {
                expected: state.player_count(),
                actual: seats.len(),
            });
        }
        Ok(Self {
            id,
            seed: state.config.seed,
            state,
            seats,
        })
    }

    pub fn is_over(&self) -> bool {
        self.state.game_should_end || self.state.round > ROUND_LIMIT
    }

    /// Plays rounds until a city completes, then scores.
    pub fn play(&mut self) -> GameResult {
        while !self.is_over() {
            self.play_round();
            if !self.is_over() {
                self.round_gate();
            }
        }
        self.finish()
    }

    pub fn play_round(&mut self) {
        self.state.reseed();
        self.state.begin_round();
        info!(round = self.state.round, crowned = self.state.crowned, "round started");
        let mut ctx = RoundContext::new(&mut self.state, &mut self.seats);
        ctx.emit(GameEvent::RoundStarted {
            round: ctx.state.round,
            crowned: ctx.state.crowned,
        });
        selection_phase(&mut ctx);
        turn_phase(&mut ctx);
        ctx.state.round += 1;
    }

    /// Lets every seat continue or save before the next round starts.
    pub fn round_gate(&mut self) {
        for seat in 0..self.seats.len() {
            for _ in 0..MAX_DECISION_ATTEMPTS {
                match self.seats[seat].round_gate(&self.state, seat) {
                    RoundGate::Continue => break,
                    RoundGate::Save(path) => {
                        let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_FILE));
                        let event = self.save(&path);
                        self.seats[seat].observe(&self.state, &event);
                    }
                }
            }
        }
    }

    fn save(&self, path: &Path) -> GameEvent {
        match persistence::save_to_path(self, path) {
            Ok(()) => {
                info!(path = %path.display(), "game saved");
                GameEvent::Saved {
                    path: path.display().to_string(),
                }
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "save failed");
                GameEvent::SaveFailed {
                    reason: err.to_string(),
                }
            }
        }
    }

    pub fn finish(&mut self) -> GameResult {
        let final_round = self.state.round.saturating_sub(1);
        let scores = scoring::score_game(&mut self.state, final_round);
        let winner = scoring::winner(&self.state, &scores);
        if let Some(seat) = winner {
            let score = scores[seat].total();
            info!(winner = seat, score, rounds = final_round, "game over");
            let mut ctx = RoundContext::new(&mut self.state, &mut self.seats);
            ctx.emit(GameEvent::GameEnded { winner: seat, score });
        }
        GameResult {
            scores,
            winner,
            rounds: final_round,
        }
    }
}

/// Shuffles a fresh roster, hides one card, shows `7 - players` more (never
/// the King), then lets each seat pick starting from the crown.
pub fn selection_phase(ctx: &mut RoundContext<'_>) {
    let mut roster = CharacterCard::roster();
    roster.shuffle(ctx.state.rng());

    let hidden = roster.remove(0);
    ctx.state.face_down = Some(hidden.kind);
    ctx.emit(GameEvent::FaceDownRemoved);

    let face_up = 7usize.saturating_sub(ctx.state.player_count());
    let mut removed = 0;
    while removed < face_up {
        let card = roster.remove(0);
        if card.kind == CharacterKind::King {
            roster.push(card);
            continue;
        }
        ctx.state.face_up_removed.push(card.kind);
        ctx.emit(GameEvent::FaceUpRemoved { kind: card.kind });
        removed += 1;
    }

    let start = ctx.state.crowned;
    let count = ctx.state.player_count();
    for offset in 0..count {
        let seat = (start + offset) % count;
        let Some(first) = roster.first().map(|c| c.kind) else {
            break;
        };
        let kind = ctx
            .decide_checked(
                seat,
                "character",
                |source, state| source.choose_character(state, seat, &roster),
                |_, kind| rules::validate_character(&roster, *kind),
            )
            .unwrap_or(first);
        roster.retain(|c| c.kind != kind);
        ctx.state.players[seat].character = Some(kind);
        debug!(seat, character = %kind, "character chosen");
        ctx.emit(GameEvent::CharacterChosen { seat });
        if kind == CharacterKind::King {
            abilities::transfer_crown(ctx, seat);
        }
    }
}

/// Calls characters 1 through 8. Killed holders sit out unless they own a
/// Hospital; a robbed holder loses all gold to the Thief before playing.
pub fn turn_phase(ctx: &mut RoundContext<'_>) {
    for kind in CharacterKind::ALL {
        let order = kind.order();
        let holder = ctx.state.holder_of(order);
        ctx.emit(GameEvent::CharacterCalled { kind, seat: holder });
        let Some(seat) = holder else {
            continue;
        };

        if ctx.state.killed_order == Some(order) {
            if ctx.state.players[seat].has_built(Landmark::Hospital) {
                debug!(seat, "assassinated but Hospital grants a limited turn");
                ctx.emit(GameEvent::HospitalTurn { seat });
                turn::take_limited_turn(ctx, seat);
            } else {
                debug!(seat, character = %kind, "assassinated, turn skipped");
                ctx.emit(GameEvent::TurnSkipped { seat, kind });
            }
            continue;
        }

        if ctx.state.stolen_order == Some(order) {
            if let Some(thief) = ctx.state.holder_of(CharacterKind::Thief.order()) {
                let amount = ctx.state.players[seat].take_all_gold();
                ctx.state.players[thief].add_gold(amount);
                debug!(from = seat, to = thief, amount, "gold stolen");
                ctx.emit(GameEvent::GoldStolen {
                    from: seat,
                    to: thief,
                    amount,
                });
            }
        }

        turn::take_turn(ctx, seat);
    }
}
