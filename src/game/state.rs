use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::game::cards::{DistrictCard, Landmark};
use crate::game::deck::Deck;
use crate::game::players::{GoldError, PlayerState};
use crate::types::{CharacterKind, DestroyVia, ParticipantKind, ResourceChoice, TargetPurpose};

pub const MIN_PLAYERS: usize = 4;
pub const MAX_PLAYERS: usize = 7;
pub const DEFAULT_THRESHOLD: usize = 8;
pub const BELL_TOWER_THRESHOLD: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub num_players: usize,
    pub seed: u64,
    pub starting_gold: u32,
    pub starting_hand: usize,
    /// Zero-based seats answered by a person instead of a bot.
    pub human_seats: Vec<usize>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_players: 4,
            seed: 42,
            starting_gold: 2,
            starting_hand: 4,
            human_seats: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    RoundStarted {
        round: u32,
        crowned: usize,
    },
    FaceDownRemoved,
    FaceUpRemoved {
        kind: CharacterKind,
    },
    CharacterChosen {
        seat: usize,
    },
    CrownTransferred {
        from: Option<usize>,
        to: usize,
    },
    ThroneRoomPaid {
        seat: usize,
    },
    CharacterCalled {
        kind: CharacterKind,
        seat: Option<usize>,
    },
    TurnSkipped {
        seat: usize,
        kind: CharacterKind,
    },
    HospitalTurn {
        seat: usize,
    },
    TargetChosen {
        seat: usize,
        target: CharacterKind,
        purpose: TargetPurpose,
    },
    GoldStolen {
        from: usize,
        to: usize,
        amount: u32,
    },
    HandsSwapped {
        seat: usize,
        with: usize,
    },
    CardsExchanged {
        seat: usize,
        count: usize,
    },
    IncomeCollected {
        seat: usize,
        amount: u32,
    },
    CardsDrawn {
        seat: usize,
        count: usize,
    },
    ResourceTaken {
        seat: usize,
        choice: ResourceChoice,
    },
    Built {
        seat: usize,
        district: String,
        cost: u32,
    },
    Destroyed {
        by: usize,
        target: usize,
        district: String,
        via: DestroyVia,
    },
    Reclaimed {
        seat: usize,
        district: String,
    },
    LandmarkUsed {
        seat: usize,
        landmark: Landmark,
    },
    BellTowerActivated {
        seat: usize,
    },
    BellTowerDeactivated {
        end_cleared: bool,
    },
    CityCompleted {
        seat: usize,
        first: bool,
    },
    Saved {
        path: String,
    },
    SaveFailed {
        reason: String,
    },
    GameEnded {
        winner: usize,
        score: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("{0} players requested; a game needs between 4 and 7")]
    InvalidPlayerCount(usize),
    #[error("seat {0} does not exist")]
    InvalidSeat(usize),
    #[error("deck holds {available} cards but setup needs {needed}")]
    DeckExhausted { needed: usize, available: usize },
    #[error("expected {expected} decision sources, got {actual}")]
    SeatMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecisionError {
    #[error("invalid input: {0}")]
    RecoverableInput(String),
    #[error("choice no longer valid: {0}")]
    InvariantViolation(String),
}

impl DecisionError {
    pub fn input(message: impl Into<String>) -> Self {
        DecisionError::RecoverableInput(message.into())
    }

    pub fn stale(message: impl Into<String>) -> Self {
        DecisionError::InvariantViolation(message.into())
    }
}

impl From<GoldError> for DecisionError {
    fn from(err: GoldError) -> Self {
        DecisionError::RecoverableInput(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub players: Vec<PlayerState>,
    pub deck: Deck<DistrictCard>,
    pub round: u32,
    pub crowned: usize,
    pub killed_order: Option<u8>,
    pub stolen_order: Option<u8>,
    pub face_up_removed: Vec<CharacterKind>,
    pub face_down: Option<CharacterKind>,
    pub bell_tower_active: bool,
    pub end_threshold: usize,
    pub game_should_end: bool,
    pub first_to_finish: Option<usize>,
    pub(crate) rng: StdRng,
}

impl GameState {
    pub fn new(config: GameConfig, mut deck: Deck<DistrictCard>) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&config.num_players) {
            return Err(GameError::InvalidPlayerCount(config.num_players));
        }
        if let Some(seat) = config
            .human_seats
            .iter()
            .find(|seat| **seat >= config.num_players)
        {
            return Err(GameError::InvalidSeat(*seat));
        }
        let needed = config.num_players * config.starting_hand;
        if deck.len() < needed {
            return Err(GameError::DeckExhausted {
                needed,
                available: deck.len(),
            });
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        deck.shuffle(&mut rng);

        let players = (0..config.num_players)
            .map(|seat| {
                let id = (seat + 1) as u8;
                let kind = if config.human_seats.contains(&seat) {
                    ParticipantKind::Human
                } else {
                    ParticipantKind::Algorithm
                };
                let mut player = PlayerState::new(id, format!("Player {id}"), kind);
                player.gold = config.starting_gold;
                player.hand = deck.draw_up_to(config.starting_hand);
                player
            })
            .collect::<Vec<_>>();
        let crowned = rng.gen_range(0..players.len());

        Ok(Self {
            config,
            players,
            deck,
            round: 1,
            crowned,
            killed_order: None,
            stolen_order: None,
            face_up_removed: Vec::new(),
            face_down: None,
            bell_tower_active: false,
            end_threshold: DEFAULT_THRESHOLD,
            game_should_end: false,
            first_to_finish: None,
            rng,
        })
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Derives the RNG from the seed and the current round, so a game restored
    /// between rounds continues deterministically.
    pub fn reseed(&mut self) {
        self.rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(u64::from(self.round)));
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn holder_of(&self, order: u8) -> Option<usize> {
        self.players
            .iter()
            .position(|p| p.character.map(CharacterKind::order) == Some(order))
    }

    pub fn character_of(&self, seat: usize) -> Option<CharacterKind> {
        self.players.get(seat).and_then(|p| p.character)
    }

    /// Clears everything scoped to the previous round. Runs once, when the
    /// next round begins.
    pub fn begin_round(&mut self) {
        self.killed_order = None;
        self.stolen_order = None;
        self.face_up_removed.clear();
        self.face_down = None;
        for player in &mut self.players {
            player.character = None;
            player.reset_turn();
        }
    }

    /// Moves the crown. A real change pays every Throne Room holder 1 gold;
    /// returns the seats that were paid.
    pub fn set_crowned(&mut self, seat: usize) -> Vec<usize> {
        if seat == self.crowned {
            return Vec::new();
        }
        let previous = self.crowned;
        self.crowned = seat;
        info!(from = previous, to = seat, "crown transferred");
        let mut paid = Vec::new();
        for (idx, player) in self.players.iter_mut().enumerate() {
            if player.has_built(Landmark::ThroneRoom) {
                player.add_gold(1);
                paid.push(idx);
            }
        }
        paid
    }

    pub fn activate_bell_tower(&mut self) {
        self.bell_tower_active = true;
        self.end_threshold = BELL_TOWER_THRESHOLD;
    }

    /// Restores the normal threshold. Returns true when the end flag was
    /// cleared because nobody reaches the restored threshold.
    pub fn deactivate_bell_tower(&mut self) -> bool {
        self.bell_tower_active = false;
        self.end_threshold = DEFAULT_THRESHOLD;
        if self.game_should_end && !self.anyone_complete() {
            self.game_should_end = false;
            self.first_to_finish = None;
            return true;
        }
        false
    }

    pub fn anyone_complete(&self) -> bool {
        self.players.iter().any(|p| p.city.len() >= self.end_threshold)
    }

    pub fn is_complete(&self, seat: usize) -> bool {
        self.players[seat].city.len() >= self.end_threshold
    }

    /// Sets the end flag the first time a city reaches the threshold.
    /// Returns true when this call set it.
    pub fn check_completion(&mut self, seat: usize) -> bool {
        if self.game_should_end || !self.is_complete(seat) {
            return false;
        }
        self.game_should_end = true;
        if self.first_to_finish.is_none() {
            self.first_to_finish = Some(seat);
        }
        true
    }

    /// District cards in deck, hands, cities and museum storage.
    pub fn total_cards(&self) -> usize {
        self.deck.len() + self.players.iter().map(PlayerState::card_count).sum::<usize>()
    }
}
