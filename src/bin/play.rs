use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use citadels_rs::cli::render;
use citadels_rs::cli::{HumanPlayer, print_player_help, seat_players};
use citadels_rs::game::catalog::{bundled_deck, load_deck};
use citadels_rs::game::game::DEFAULT_SAVE_FILE;
use citadels_rs::game::persistence::load_from_path;
use citadels_rs::game::{Game, GameConfig};
use citadels_rs::players::DecisionSource;
use citadels_rs::types::ParticipantKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser, Clone)]
#[command(name = "citadels-play")]
#[command(about = "Play Citadels against computer opponents")]
struct Args {
    /// Number of players at the table, you included (4-7)
    #[arg(short = 'p', long, default_value_t = 4)]
    players: usize,

    /// Bot player code for the other seats (A=Heuristic, R=Random)
    #[arg(short = 'b', long, default_value = "A")]
    bot: String,

    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// District catalog (TSV) to use instead of the bundled one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Saved game to offer to resume (defaults to the last save, if any)
    #[arg(long)]
    load: Option<PathBuf>,

    /// Show player codes and exit
    #[arg(long)]
    help_players: bool,
}

fn seats(args: &Args, kinds: &[ParticipantKind]) -> Vec<Box<dyn DecisionSource>> {
    let stdin = io::stdin();
    let human = Box::new(HumanPlayer::new(stdin.lock(), io::stdout(), args.seed));
    seat_players(kinds, &args.bot, args.seed, human).unwrap_or_else(|| {
        eprintln!("Error: Unknown bot code '{}'", args.bot);
        eprintln!("Use --help-players to see available codes");
        std::process::exit(1);
    })
}

fn confirm(question: &str) -> bool {
    print!("{question} [y/n] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(_) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes" | "1"),
        Err(_) => false,
    }
}

fn resume(args: &Args) -> Option<Game> {
    let path = args
        .load
        .clone()
        .or_else(|| Some(PathBuf::from(DEFAULT_SAVE_FILE)).filter(|p| p.exists()))?;
    if !confirm(&format!("Load the saved game from {}?", path.display())) {
        return None;
    }
    let restored = load_from_path(&path).and_then(|snapshot| snapshot.into_state());
    match restored {
        Ok((id, state)) => {
            let kinds = state.players.iter().map(|p| p.kind).collect::<Vec<_>>();
            match Game::from_state(id, state, seats(args, &kinds)) {
                Ok(game) => Some(game),
                Err(err) => {
                    eprintln!("Cannot resume: {err}. Starting a new game.");
                    None
                }
            }
        }
        Err(err) => {
            eprintln!("Cannot load {}: {err}. Starting a new game.", path.display());
            None
        }
    }
}

fn new_game(args: &Args) -> Game {
    let deck = match &args.catalog {
        Some(path) => load_deck(path),
        None => bundled_deck(),
    };
    let deck = deck.unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        std::process::exit(1);
    });
    let config = GameConfig {
        num_players: args.players,
        seed: args.seed,
        human_seats: vec![0],
        ..GameConfig::default()
    };
    let kinds = (0..args.players)
        .map(|seat| {
            if seat == 0 {
                ParticipantKind::Human
            } else {
                ParticipantKind::Algorithm
            }
        })
        .collect::<Vec<_>>();
    Game::new(config, deck, seats(args, &kinds)).unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        std::process::exit(1);
    })
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if args.help_players {
        print_player_help();
        return;
    }

    let mut game = match resume(&args) {
        Some(game) => game,
        None => new_game(&args),
    };

    let you = game
        .state
        .players
        .iter()
        .position(|p| p.kind == ParticipantKind::Human);
    println!(
        "Starting game {} with {} players.",
        game.id,
        game.state.player_count()
    );
    match you {
        Some(seat) => println!("You are {}.", game.state.players[seat].name),
        None => println!("No seat is yours in this game; the computer plays them all."),
    }
    println!("Type 'help' at any prompt for the list of commands.");
    println!("{}", "=".repeat(80));

    let result = game.play();

    println!("\n{}", "=".repeat(80));
    println!("FINAL SCORES (after {} rounds):", result.rounds);
    println!("{}", "=".repeat(80));
    print!("{}", render::score_table(&game.state, &result.scores));
    match result.winner {
        Some(seat) if Some(seat) == you => println!("\nYou win!"),
        Some(seat) => println!("\n{} wins.", game.state.players[seat].name),
        None => println!("\nNo winner."),
    }
}
