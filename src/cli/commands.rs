use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty input")]
    Empty,
    #[error("'{0}' expects a number")]
    ExpectedNumber(&'static str),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
}

/// One line of player input. Words that are not commands come back as
/// `Word` so prompts can match character names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Hand,
    Gold(Option<u8>),
    City(Option<u8>),
    All,
    Info(String),
    Action,
    Help,
    Continue,
    Save(Option<PathBuf>),
    Build(usize),
    End,
    Cards,
    Collect(usize),
    Swap(u8),
    Discard(Vec<usize>),
    Destroy(u8, usize),
    Number(usize),
    Yes,
    No,
    Word(String),
}

impl Command {
    /// Commands answered in place without consuming the pending decision.
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            Command::Hand
                | Command::Gold(_)
                | Command::City(_)
                | Command::All
                | Command::Info(_)
                | Command::Action
                | Command::Help
        )
    }
}

fn number<T: FromStr>(word: Option<&str>, command: &'static str) -> Result<T, CommandError> {
    word.ok_or(CommandError::MissingArgument(command))?
        .parse()
        .map_err(|_| CommandError::ExpectedNumber(command))
}

fn optional_number<T: FromStr>(
    word: Option<&str>,
    command: &'static str,
) -> Result<Option<T>, CommandError> {
    word.map(|w| number(Some(w), command)).transpose()
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let mut words = line.split_whitespace();
        let head = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
        let command = match head.as_str() {
            "hand" => Command::Hand,
            "gold" => Command::Gold(optional_number(words.next(), "gold")?),
            "city" | "citadel" | "list" => Command::City(optional_number(words.next(), "city")?),
            "all" => Command::All,
            "info" => {
                let rest = words.collect::<Vec<_>>().join(" ");
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("info"));
                }
                Command::Info(rest)
            }
            "action" => Command::Action,
            "help" => Command::Help,
            "t" | "continue" => Command::Continue,
            "save" => Command::Save(words.next().map(PathBuf::from)),
            "build" => Command::Build(number(words.next(), "build")?),
            "end" => Command::End,
            "cards" => Command::Cards,
            "collect" => {
                let next = words.next();
                let position = if next.is_some_and(|w| w.eq_ignore_ascii_case("card")) {
                    words.next()
                } else {
                    next
                };
                Command::Collect(number(position, "collect card")?)
            }
            "swap" => Command::Swap(number(words.next(), "swap")?),
            "discard" => Command::Discard(
                words
                    .map(|w| w.parse().map_err(|_| CommandError::ExpectedNumber("discard")))
                    .collect::<Result<_, _>>()?,
            ),
            "destroy" => {
                let player = number(words.next(), "destroy")?;
                Command::Destroy(player, number(words.next(), "destroy")?)
            }
            "y" | "yes" => Command::Yes,
            "n" | "no" => Command::No,
            _ => match head.parse() {
                Ok(n) => Command::Number(n),
                Err(_) => Command::Word(line.to_string()),
            },
        };
        Ok(command)
    }
}

pub const HELP: &str = "\
Available commands:
  hand                 show the cards in your hand
  gold [id]            show gold (yours or a player's)
  city [id]            show districts built by a player (also: citadel, list)
  all                  show every player's gold, hand size and city
  info <pos|name>      describe a hand card or a character
  action               describe your character's ability
  build <pos>          build the district at hand position <pos>
  end                  end the build step
  gold / cards         take 2 gold or draw cards when asked
  collect card <n>     keep drawn card <n>
  swap <id> | discard <pos..>   magician action
  destroy <id> <pos>   pick a district to destroy (0 to skip)
  1 / 2, y / n         answer yes or no
  t | continue         start the next round
  save [file]          save between rounds";
