pub mod commands;
pub mod human_player;
pub mod players;
pub mod render;
pub mod stats;

pub use commands::{Command, CommandError};
pub use human_player::HumanPlayer;
pub use players::{
    CLI_PLAYERS, CliPlayer, create_player, player_name, print_player_help, seat_players,
};
pub use stats::{GameStats, StatisticsAccumulator};
