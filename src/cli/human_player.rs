use std::fmt::Display;
use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::cli::commands::{Command, HELP};
use crate::cli::render;
use crate::game::cards::{CharacterCard, DistrictCard, ability_text};
use crate::game::rules::{DestroyOption, MagicianChoice};
use crate::game::state::{DecisionError, GameEvent, GameState};
use crate::players::{DecisionSource, DestroyChoice, HeuristicPlayer, RoundGate};
use crate::types::{
    CharacterKind, DestroyVia, DistrictColor, ParticipantKind, ResourceChoice, TargetPurpose,
};

/// A person at the keyboard. Reads one command per line; once input is
/// closed the heuristic bot plays the seat.
pub struct HumanPlayer<R, W> {
    input: R,
    output: W,
    fallback: HeuristicPlayer,
    closed: bool,
}

fn yes_no(command: &Command) -> Option<bool> {
    match command {
        Command::Yes | Command::Number(1) => Some(true),
        Command::No | Command::Number(2) => Some(false),
        _ => None,
    }
}

fn position_or_skip(command: &Command) -> Option<Option<usize>> {
    match command {
        Command::Number(0) | Command::No | Command::End => Some(None),
        Command::Number(n) => Some(Some(n - 1)),
        _ => None,
    }
}

fn seat_of(id: u8) -> Option<usize> {
    usize::from(id).checked_sub(1)
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(input: R, output: W, seed: u64) -> Self {
        Self {
            input,
            output,
            fallback: HeuristicPlayer::new(seed),
            closed: false,
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    fn say(&mut self, text: impl Display) {
        if let Err(err) = writeln!(self.output, "{text}") {
            self.lose_terminal(err);
        }
    }

    /// The person can no longer see prompts, so the bot takes the seat.
    fn lose_terminal(&mut self, err: io::Error) {
        if !self.closed {
            warn!(%err, "terminal output failed; the computer plays this seat");
            self.closed = true;
        }
    }

    fn read_command(&mut self, prompt: &str) -> Option<Command> {
        if self.closed {
            return None;
        }
        loop {
            let shown = write!(self.output, "{prompt}\n> ").and_then(|()| self.output.flush());
            if let Err(err) = shown {
                self.lose_terminal(err);
                return None;
            }
            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => {
                    self.closed = true;
                    self.say("Input closed; the computer plays this seat from now on.");
                    return None;
                }
                Ok(_) => {}
            }
            match line.parse::<Command>() {
                Ok(command) => return Some(command),
                Err(err) => self.say(format!("Invalid input: {err}")),
            }
        }
    }

    /// Prompts until `accept` takes a command. Informational commands are
    /// answered on the way; `None` means input is closed.
    fn ask<T>(
        &mut self,
        state: &GameState,
        seat: usize,
        prompt: &str,
        mut accept: impl FnMut(&Command) -> Option<T>,
    ) -> Option<T> {
        loop {
            let command = self.read_command(prompt)?;
            if let Some(answer) = accept(&command) {
                return Some(answer);
            }
            if command.is_informational() {
                self.inform(state, seat, &command);
            } else {
                self.say("Invalid input. Enter help to find all commands.");
            }
        }
    }

    fn inform(&mut self, state: &GameState, seat: usize, command: &Command) {
        let me = &state.players[seat];
        let text = match command {
            Command::Hand => format!(
                "You have {} gold. Cards in hand: {}",
                me.gold,
                render::cards_line(&me.hand)
            ),
            Command::Gold(None) => format!("You have {} gold.", me.gold),
            Command::Gold(Some(id)) => match seat_of(*id).and_then(|s| state.players.get(s)) {
                Some(player) => format!("{} has {} gold.", player.name, player.gold),
                None => "Player not found.".into(),
            },
            Command::City(None) => render::city_line(me),
            Command::City(Some(id)) => match seat_of(*id).and_then(|s| state.players.get(s)) {
                Some(player) => render::city_line(player),
                None => "Player not found.".into(),
            },
            Command::All => render::table_summary(state),
            Command::Info(subject) => describe_subject(&me.hand, subject),
            Command::Action => match me.character {
                Some(kind) => format!("{kind}: {}", ability_text(kind)),
                None => "You have not chosen a character yet.".into(),
            },
            Command::Help => HELP.into(),
            _ => return,
        };
        self.say(text);
    }
}

fn describe_subject(hand: &[DistrictCard], subject: &str) -> String {
    if let Ok(position) = subject.parse::<usize>() {
        return match position.checked_sub(1).and_then(|idx| hand.get(idx)) {
            Some(card) if card.color() == DistrictColor::Purple => {
                format!("{card}: {}", card.ability())
            }
            Some(card) => card.to_string(),
            None => "Invalid card position.".into(),
        };
    }
    match subject.parse::<CharacterKind>() {
        Ok(kind) => format!("{kind}: {}", ability_text(kind)),
        Err(_) => "Character not found.".into(),
    }
}

impl<R: BufRead, W: Write> DecisionSource for HumanPlayer<R, W> {
    fn kind(&self) -> ParticipantKind {
        ParticipantKind::Human
    }

    fn choose_character(
        &mut self,
        state: &GameState,
        seat: usize,
        available: &[CharacterCard],
    ) -> CharacterKind {
        let listing = available.iter().map(|c| format!("  {c}")).collect::<Vec<_>>();
        self.say(format!("Available characters:\n{}", listing.join("\n")));
        self.ask(state, seat, "Choose your character:", |command| match command {
            Command::Word(word) => word.parse().ok(),
            Command::Number(n) => u8::try_from(*n).ok().and_then(CharacterKind::from_order),
            _ => None,
        })
        .unwrap_or_else(|| self.fallback.choose_character(state, seat, available))
    }

    fn choose_target(
        &mut self,
        state: &GameState,
        seat: usize,
        purpose: TargetPurpose,
        valid: &[u8],
    ) -> u8 {
        let listing = valid
            .iter()
            .filter_map(|order| CharacterKind::from_order(*order))
            .map(|kind| format!("  {}: {kind}", kind.order()))
            .collect::<Vec<_>>();
        self.say(listing.join("\n"));
        let prompt = match purpose {
            TargetPurpose::Kill => "Who do you want to kill?",
            TargetPurpose::Steal => "Who do you want to rob?",
        };
        self.ask(state, seat, prompt, |command| match command {
            Command::Number(n) => u8::try_from(*n).ok(),
            Command::Word(word) => word.parse::<CharacterKind>().ok().map(CharacterKind::order),
            _ => None,
        })
        .unwrap_or_else(|| self.fallback.choose_target(state, seat, purpose, valid))
    }

    fn choose_magician(&mut self, state: &GameState, seat: usize) -> MagicianChoice {
        self.ask(
            state,
            seat,
            "Magician: 'swap <player id>' or 'discard <positions>'",
            |command| match command {
                Command::Swap(id) => seat_of(*id).map(MagicianChoice::SwapWith),
                Command::Discard(positions) => positions
                    .iter()
                    .map(|p| p.checked_sub(1))
                    .collect::<Option<Vec<_>>>()
                    .map(MagicianChoice::Discard),
                _ => None,
            },
        )
        .unwrap_or_else(|| self.fallback.choose_magician(state, seat))
    }

    fn choose_destroy(
        &mut self,
        state: &GameState,
        seat: usize,
        via: DestroyVia,
        options: &[DestroyOption],
    ) -> Option<DestroyChoice> {
        let listing = options
            .iter()
            .map(|o| {
                let player = &state.players[o.target];
                format!(
                    "  destroy {} {}: {} ({} gold)",
                    player.id,
                    o.district + 1,
                    player.city[o.district],
                    o.cost
                )
            })
            .collect::<Vec<_>>();
        self.say(format!("{via}: districts you may destroy:\n{}", listing.join("\n")));
        self.ask(
            state,
            seat,
            "Enter 'destroy <player id> <position>' or 0 to skip:",
            |command| match command {
                Command::Number(0) | Command::No | Command::End => Some(None),
                Command::Destroy(id, position) => Some(Some(DestroyChoice {
                    target: seat_of(*id)?,
                    district: position.checked_sub(1)?,
                })),
                _ => None,
            },
        )
        .unwrap_or_else(|| self.fallback.choose_destroy(state, seat, via, options))
    }

    fn choose_graveyard(&mut self, state: &GameState, seat: usize, card: &DistrictCard) -> bool {
        let prompt = format!("Your {card} was destroyed. Pay 1 gold to take it back? [y/n]");
        self.ask(state, seat, &prompt, yes_no)
            .unwrap_or_else(|| self.fallback.choose_graveyard(state, seat, card))
    }

    fn choose_laboratory(&mut self, state: &GameState, seat: usize) -> Option<usize> {
        let hand = render::cards_line(&state.players[seat].hand);
        self.say(format!("Laboratory: discard a card to gain 1 gold. Hand: {hand}"));
        self.ask(state, seat, "Card position to discard (0 to skip):", position_or_skip)
            .unwrap_or_else(|| self.fallback.choose_laboratory(state, seat))
    }

    fn choose_smithy(&mut self, state: &GameState, seat: usize) -> bool {
        let prompt = format!(
            "Smithy: you have {} gold. Pay 2 gold to draw 3 cards? [1 yes / 2 no]",
            state.players[seat].gold
        );
        self.ask(state, seat, &prompt, yes_no)
            .unwrap_or_else(|| self.fallback.choose_smithy(state, seat))
    }

    fn choose_museum(&mut self, state: &GameState, seat: usize) -> Option<usize> {
        let hand = render::cards_line(&state.players[seat].hand);
        self.say(format!("Museum: place a card under the Museum. Hand: {hand}"));
        self.ask(state, seat, "Card position to store (0 to skip):", position_or_skip)
            .unwrap_or_else(|| self.fallback.choose_museum(state, seat))
    }

    fn choose_resource(&mut self, state: &GameState, seat: usize) -> ResourceChoice {
        self.ask(
            state,
            seat,
            "Collect 2 gold or draw cards and keep one [gold/cards]:",
            |command| match command {
                Command::Gold(None) => Some(ResourceChoice::Gold),
                Command::Cards => Some(ResourceChoice::Cards),
                _ => None,
            },
        )
        .unwrap_or_else(|| self.fallback.choose_resource(state, seat))
    }

    fn choose_drawn_card(
        &mut self,
        state: &GameState,
        seat: usize,
        drawn: &[DistrictCard],
    ) -> usize {
        self.say(format!("You drew: {}", render::cards_line(drawn)));
        self.ask(state, seat, "Keep one: 'collect card <n>'", |command| {
            match command {
                Command::Collect(n) | Command::Number(n) => n.checked_sub(1),
                _ => None,
            }
        })
        .unwrap_or_else(|| self.fallback.choose_drawn_card(state, seat, drawn))
    }

    fn choose_build(&mut self, state: &GameState, seat: usize) -> Option<usize> {
        let me = &state.players[seat];
        self.say(format!(
            "You have {} gold and {} build(s) left. Hand: {}",
            me.gold,
            me.builds_remaining(),
            render::cards_line(&me.hand)
        ));
        self.ask(state, seat, "'build <position>' or 'end':", |command| {
            match command {
                Command::Build(n) => n.checked_sub(1).map(Some),
                Command::End => Some(None),
                _ => None,
            }
        })
        .unwrap_or_else(|| self.fallback.choose_build(state, seat))
    }

    fn choose_lighthouse(&mut self, state: &GameState, seat: usize) -> usize {
        self.say(format!(
            "Lighthouse: the deck holds {}",
            render::cards_line(&state.deck.snapshot())
        ));
        self.ask(state, seat, "Position of the card to take:", |command| {
            match command {
                Command::Number(n) => n.checked_sub(1),
                _ => None,
            }
        })
        .unwrap_or_else(|| self.fallback.choose_lighthouse(state, seat))
    }

    fn choose_bell_tower(&mut self, state: &GameState, seat: usize) -> bool {
        self.ask(
            state,
            seat,
            "Bell Tower: end the game at 7 districts instead of 8? [1 yes / 2 no]",
            yes_no,
        )
        .unwrap_or_else(|| self.fallback.choose_bell_tower(state, seat))
    }

    fn round_gate(&mut self, state: &GameState, seat: usize) -> RoundGate {
        self.ask(
            state,
            seat,
            "Round over. 't' to continue or 'save [file]':",
            |command| match command {
                Command::Continue => Some(RoundGate::Continue),
                Command::Save(path) => Some(RoundGate::Save(path.clone())),
                _ => None,
            },
        )
        .unwrap_or(RoundGate::Continue)
    }

    fn observe(&mut self, state: &GameState, event: &GameEvent) {
        if !self.closed {
            self.say(render::describe(state, event));
        }
        self.fallback.observe(state, event);
    }

    fn rejected(&mut self, error: &DecisionError) {
        self.say(error);
    }
}
