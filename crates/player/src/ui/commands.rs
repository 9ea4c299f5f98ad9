//! Line commands accepted by the terminal front end.

use thiserror::Error;
use wolfpack_domain::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Say(String),
    Vote(PlayerId),
    Target(PlayerId),
    Confirm,
    Next,
    Chat(String),
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("unknown command `{0}`; type `help` for the list")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("`{0}` is not a player number")]
    BadPlayer(String),
}

pub const HELP: &str = "\
say <text>     speak in the day discussion
vote <n>       choose player n as your vote
target <n>     choose player n as your night target
confirm        submit the chosen vote or night target
next           end the discussion / advance the phase
chat <text>    send a chat line
refresh        fetch the latest game state
help           show this list
quit           leave";

impl Command {
    /// Parse one input line. Blank lines are `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "say" | "s" => Command::Say(text_arg("say", rest)?),
            "vote" | "v" => Command::Vote(player_arg("vote", rest)?),
            "target" | "t" => Command::Target(player_arg("target", rest)?),
            "confirm" | "ok" => Command::Confirm,
            "next" | "n" => Command::Next,
            "chat" | "c" => Command::Chat(text_arg("chat", rest)?),
            "refresh" | "r" => Command::Refresh,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandParseError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn text_arg(command: &'static str, rest: &str) -> Result<String, CommandParseError> {
    if rest.is_empty() {
        return Err(CommandParseError::MissingArgument(command));
    }
    Ok(rest.to_string())
}

fn player_arg(command: &'static str, rest: &str) -> Result<PlayerId, CommandParseError> {
    if rest.is_empty() {
        return Err(CommandParseError::MissingArgument(command));
    }
    rest.parse::<PlayerId>()
        .map_err(|_| CommandParseError::BadPlayer(rest.to_string()))
}
