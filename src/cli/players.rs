use crate::players::{DecisionSource, HeuristicPlayer, RandomPlayer};
use crate::types::ParticipantKind;

pub struct CliPlayer {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CLI_PLAYERS: &[CliPlayer] = &[
    CliPlayer {
        code: "A",
        name: "HeuristicPlayer",
        description: "Plays by rules of thumb: picks characters by need, builds the priciest district it can afford.",
    },
    CliPlayer {
        code: "R",
        name: "RandomPlayer",
        description: "Chooses uniformly among legal answers.",
    },
];

pub fn player_name(code: &str) -> Option<&'static str> {
    CLI_PLAYERS
        .iter()
        .find(|p| p.code.eq_ignore_ascii_case(code))
        .map(|p| p.name)
}

/// Builds the bot for `code`, seeded so simulations are reproducible.
pub fn create_player(code: &str, seed: u64) -> Option<Box<dyn DecisionSource>> {
    match code.to_ascii_uppercase().as_str() {
        "A" => Some(Box::new(HeuristicPlayer::new(seed))),
        "R" => Some(Box::new(RandomPlayer::new(seed))),
        _ => None,
    }
}

/// One decision source per seat of `kinds`. The first human seat gets
/// `human`; every other seat is a `bot_code` bot, since there is only one
/// terminal to read from. `None` for an unknown code.
pub fn seat_players(
    kinds: &[ParticipantKind],
    bot_code: &str,
    seed: u64,
    human: Box<dyn DecisionSource>,
) -> Option<Vec<Box<dyn DecisionSource>>> {
    let mut human = Some(human);
    kinds
        .iter()
        .enumerate()
        .map(|(seat, kind)| {
            let person = match kind {
                ParticipantKind::Human => human.take(),
                ParticipantKind::Algorithm => None,
            };
            person.or_else(|| create_player(bot_code, seed.wrapping_add(seat as u64)))
        })
        .collect()
}

pub fn print_player_help() {
    println!("Player Legend:");
    println!("{:<5} {:<25} {}", "CODE", "PLAYER", "DESCRIPTION");
    println!("{}", "-".repeat(80));
    for player in CLI_PLAYERS {
        println!("{:<5} {:<25} {}", player.code, player.name, player.description);
    }
}
