pub mod abilities;
pub mod cards;
pub mod catalog;
pub mod context;
pub mod deck;
pub mod game;
pub mod persistence;
pub mod players;
pub mod rules;
pub mod scoring;
pub mod state;
pub mod turn;

pub use cards::{CharacterCard, DistrictCard, Landmark};
pub use catalog::{CatalogError, CatalogRow, RowError};
pub use context::RoundContext;
pub use deck::Deck;
pub use game::{Game, GameResult};
pub use persistence::{LoadError, SaveError, Snapshot};
pub use players::PlayerState;
pub use rules::{DestroyOption, MagicianChoice};
pub use scoring::ScoreBreakdown;
pub use state::{DecisionError, GameConfig, GameError, GameEvent, GameState};
