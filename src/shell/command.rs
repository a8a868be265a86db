/*!
 * Shell Commands
 * Parsing and validation of menu input
 */

use crate::core::types::Size;
use std::str::FromStr;
use thiserror::Error;

/// Raw input that could not be turned into a command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("no command given")]
    Empty,

    #[error("unknown option '{0}'")]
    Unknown(String),

    #[error("invalid process size '{0}': expected a positive integer")]
    InvalidSize(String),

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

/// Validated shell command
///
/// Arguments left out on the command line are prompted for by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Allocate {
        name: Option<String>,
        size: Option<Size>,
    },
    Free {
        name: Option<String>,
    },
    Compact,
    Show,
    FragInternal,
    FragExternal,
    Stats,
    Help,
    Quit,
}

impl Command {
    /// Stable name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Allocate { .. } => "allocate",
            Command::Free { .. } => "free",
            Command::Compact => "compact",
            Command::Show => "show",
            Command::FragInternal => "frag-internal",
            Command::FragExternal => "frag-external",
            Command::Stats => "stats",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().ok_or(CommandError::Empty)?;

        let command = match keyword.to_ascii_lowercase().as_str() {
            "1" | "allocate" | "alloc" | "load" => Command::Allocate {
                name: tokens.next().map(str::to_string),
                size: tokens.next().map(parse_size).transpose()?,
            },
            "2" | "free" | "release" => Command::Free {
                name: tokens.next().map(str::to_string),
            },
            "3" | "compact" => Command::Compact,
            "4" | "show" | "map" => Command::Show,
            "5" | "frag-internal" | "internal" => Command::FragInternal,
            "6" | "frag-external" | "external" => Command::FragExternal,
            "7" | "stats" => Command::Stats,
            "h" | "help" | "?" => Command::Help,
            "0" | "q" | "quit" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(keyword.to_string())),
        };

        match tokens.next() {
            Some(extra) => Err(CommandError::UnexpectedArgument(extra.to_string())),
            None => Ok(command),
        }
    }
}

/// Parse a process size, rejecting anything that is not a positive integer
pub fn parse_size(raw: &str) -> Result<Size, CommandError> {
    match raw.trim().parse::<i64>() {
        Ok(size) if size > 0 => {
            Size::try_from(size).map_err(|_| CommandError::InvalidSize(raw.to_string()))
        }
        _ => Err(CommandError::InvalidSize(raw.to_string())),
    }
}
