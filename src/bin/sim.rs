use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use citadels_rs::cli::{StatisticsAccumulator, create_player, player_name, print_player_help};
use citadels_rs::game::catalog::{bundled_deck, load_deck};
use citadels_rs::game::{Game, GameConfig};
use citadels_rs::players::DecisionSource;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser, Clone)]
#[command(name = "citadels-sim")]
#[command(about = "Citadels Bot Simulator - Simulate games between different player strategies")]
struct Args {
    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 5)]
    num: u32,

    /// Comma-separated player codes, 4 to 7 of them (e.g., A,A,R,R)
    /// Codes: A=Heuristic, R=Random
    #[arg(long, default_value = "A,A,A,A")]
    players: String,

    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// District catalog (TSV) to use instead of the bundled one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Show player codes and exit
    #[arg(long)]
    help_players: bool,

    /// Silence console output
    #[arg(long)]
    quiet: bool,
}

fn build_seats(codes: &[&str], seed: u64) -> Vec<Box<dyn DecisionSource>> {
    codes
        .iter()
        .enumerate()
        .map(|(seat, code)| {
            create_player(code, seed.wrapping_mul(31).wrapping_add(seat as u64)).unwrap_or_else(
                || {
                    eprintln!("Error: Unknown player code '{code}'");
                    eprintln!("Use --help-players to see available codes");
                    std::process::exit(1);
                },
            )
        })
        .collect()
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    if args.help_players {
        print_player_help();
        return;
    }

    let codes: Vec<&str> = args.players.split(',').map(str::trim).collect();
    if !(4..=7).contains(&codes.len()) {
        eprintln!("Error: Must specify 4-7 players");
        std::process::exit(1);
    }

    let deck = match &args.catalog {
        Some(path) => load_deck(path),
        None => bundled_deck(),
    };
    let deck = deck.unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        std::process::exit(1);
    });

    let mut stats = StatisticsAccumulator::new();
    for game_idx in 0..args.num {
        let seed = args.seed + u64::from(game_idx);
        let config = GameConfig {
            num_players: codes.len(),
            seed,
            ..GameConfig::default()
        };

        let start = Instant::now();
        let mut game = match Game::new(config, deck.clone(), build_seats(&codes, seed)) {
            Ok(game) => game,
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
        };
        let result = game.play();
        let duration = start.elapsed();
        stats.after(&result, duration);

        if !args.quiet {
            let last_n = 10;
            if game_idx < last_n || game_idx >= args.num.saturating_sub(last_n) {
                let winner = result
                    .winner
                    .map(|seat| game.state.players[seat].name.clone())
                    .unwrap_or_else(|| "None".to_string());
                let score = result
                    .winner
                    .map(|seat| result.scores[seat].total())
                    .unwrap_or(0);
                println!(
                    "Game {:>4}: Winner={:>9}, Score={:>3}, Rounds={:>3}, Duration={:?}",
                    game_idx + 1,
                    winner,
                    score,
                    result.rounds,
                    duration
                );
            } else if (game_idx + 1) % 100 == 0 {
                print!(".");
                if let Err(err) = std::io::stdout().flush() {
                    warn!(%err, "cannot flush progress output");
                }
            }
        }
    }

    if !args.quiet {
        print_summary(&stats, &codes);
    }
}

fn print_summary(stats: &StatisticsAccumulator, codes: &[&str]) {
    let stats = &stats.stats;
    println!("\n{}", "=".repeat(80));
    println!("SIMULATION SUMMARY");
    println!("{}", "=".repeat(80));

    println!("\nPlayer Summary:");
    println!(
        "{:<28} {:<10} {:<12} {:<12}",
        "Player", "Wins", "Win Rate", "Avg Score"
    );
    println!("{}", "-".repeat(62));
    for (seat, code) in codes.iter().enumerate() {
        let wins = stats.wins.get(&seat).copied().unwrap_or(0);
        println!(
            "{:<28} {:<10} {:<11.1}% {:<12.2}",
            format!("{} (Player {})", player_name(code).unwrap_or("?"), seat + 1),
            wins,
            stats.win_rate(seat),
            stats.get_avg_score(seat)
        );
    }

    println!("\nGame Summary:");
    println!("  Total Games: {}", stats.games);
    println!("  Avg Rounds: {:.2}", stats.get_avg_rounds());
    println!("  Avg Winning Score: {:.2}", stats.get_avg_winning_score());
    println!("  Avg Duration: {:.2?}", stats.get_avg_duration());
}
