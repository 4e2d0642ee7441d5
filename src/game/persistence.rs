use std::fs;
use std::io;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::cards::DistrictCard;
use crate::game::deck::Deck;
use crate::game::game::Game;
use crate::game::players::PlayerState;
use crate::game::state::{
    BELL_TOWER_THRESHOLD, DEFAULT_THRESHOLD, GameConfig, GameState, MAX_PLAYERS, MIN_PLAYERS,
};
use crate::types::ParticipantKind;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read snapshot: {0}")]
    Io(#[from] io::Error),
    #[error("malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("inconsistent snapshot: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("cannot write snapshot: {0}")]
    Io(#[from] io::Error),
    #[error("cannot encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Between-round picture of a game. Killed and robbed characters are not
/// kept; they are cleared when the next round starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub game_id: Uuid,
    pub seed: u64,
    pub round: u32,
    pub bell_tower_active: bool,
    pub end_threshold: usize,
    pub game_should_end: bool,
    pub first_to_finish: Option<usize>,
    pub crowned: usize,
    pub deck: Deck<DistrictCard>,
    pub players: Vec<PlayerState>,
}

impl Snapshot {
    pub fn capture(game: &Game) -> Self {
        let state = &game.state;
        Self {
            version: SNAPSHOT_VERSION,
            game_id: game.id,
            seed: game.seed,
            round: state.round,
            bell_tower_active: state.bell_tower_active,
            end_threshold: state.end_threshold,
            game_should_end: state.game_should_end,
            first_to_finish: state.first_to_finish,
            crowned: state.crowned,
            deck: state.deck.clone(),
            players: state.players.clone(),
        }
    }

    fn validate(&self) -> Result<(), LoadError> {
        let count = self.players.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(LoadError::Invalid(format!("{count} players")));
        }
        if self.crowned >= count {
            return Err(LoadError::Invalid(format!(
                "crowned seat {} out of range",
                self.crowned
            )));
        }
        if self.first_to_finish.is_some_and(|seat| seat >= count) {
            return Err(LoadError::Invalid("first finisher out of range".into()));
        }
        let expected = if self.bell_tower_active {
            BELL_TOWER_THRESHOLD
        } else {
            DEFAULT_THRESHOLD
        };
        if self.end_threshold != expected {
            return Err(LoadError::Invalid(format!(
                "threshold {} does not match bell tower state",
                self.end_threshold
            )));
        }
        if self.round == 0 {
            return Err(LoadError::Invalid("round must start at 1".into()));
        }
        Ok(())
    }

    /// Rebuilds the game state; the RNG continues from the seed and round.
    pub fn into_state(self) -> Result<(Uuid, GameState), LoadError> {
        self.validate()?;
        let config = GameConfig {
            num_players: self.players.len(),
            seed: self.seed,
            human_seats: self
                .players
                .iter()
                .enumerate()
                .filter(|(_, p)| p.kind == ParticipantKind::Human)
                .map(|(seat, _)| seat)
                .collect(),
            ..GameConfig::default()
        };
        let mut state = GameState {
            config,
            players: self.players,
            deck: self.deck,
            round: self.round,
            crowned: self.crowned,
            killed_order: None,
            stolen_order: None,
            face_up_removed: Vec::new(),
            face_down: None,
            bell_tower_active: self.bell_tower_active,
            end_threshold: self.end_threshold,
            game_should_end: self.game_should_end,
            first_to_finish: self.first_to_finish,
            rng: StdRng::seed_from_u64(self.seed),
        };
        state.reseed();
        Ok((self.game_id, state))
    }
}

pub fn save_to_path(game: &Game, path: &Path) -> Result<(), SaveError> {
    let json = serde_json::to_string_pretty(&Snapshot::capture(game))?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Snapshot, LoadError> {
    let text = fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&text)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(LoadError::Invalid(format!(
            "unsupported snapshot version {}",
            snapshot.version
        )));
    }
    snapshot.validate()?;
    Ok(snapshot)
}
