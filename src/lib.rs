#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod cli;
pub mod game;
pub mod players;
pub mod types;

pub use game::{Game, GameConfig, GameEvent, GameResult, GameState};
pub use players::DecisionSource;
pub use types::{CharacterKind, DistrictColor};
