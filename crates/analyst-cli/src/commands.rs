//! Command parsing for the interactive loop

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty input")]
    Empty,

    #[error("Missing {0}. Type `help` for usage")]
    MissingArgument(&'static str),

    #[error("Unknown command: {0}. Type `help` for usage")]
    Unknown(String),
}

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Upload a dataset; no path is the "nothing selected" case
    Upload(Option<PathBuf>),
    /// Show the listed entities
    List,
    /// Evaluate one listed entity
    Eval(String),
    /// Evaluate every listed entity in order
    EvalAll,
    /// Evaluate the uploaded dataset as a whole
    EvalDataset,
    /// Close the displayed result
    Close,
    /// Back to the upload step
    Reset,
    Status,
    Help,
    Exit,
}

impl Command {
    /// Parse a command from user input
    ///
    /// A leading `/` is accepted, so `/eval ACME` and `eval ACME` are the same.
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let input = input.trim();
        let input = input.strip_prefix('/').unwrap_or(input);
        if input.is_empty() {
            return Err(CommandError::Empty);
        }

        let (name, rest) = match input.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (input, ""),
        };

        match name.to_lowercase().as_str() {
            "upload" | "u" => Ok(Self::Upload(
                Some(rest).filter(|p| !p.is_empty()).map(PathBuf::from),
            )),
            "list" | "ls" | "l" => Ok(Self::List),
            "eval" | "evaluate" | "e" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("entity id for eval"));
                }
                Ok(Self::Eval(rest.to_string()))
            }
            "eval-all" => Ok(Self::EvalAll),
            "eval-dataset" => Ok(Self::EvalDataset),
            "close" | "c" => Ok(Self::Close),
            "reset" => Ok(Self::Reset),
            "status" | "s" => Ok(Self::Status),
            "help" | "h" | "?" => Ok(Self::Help),
            "exit" | "quit" | "q" => Ok(Self::Exit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    pub fn help_text() -> &'static str {
        r"
Commands:
  upload <path>    Upload a JSON dataset and list its entities
  list             Show listed entities and their status
  eval <id>        Evaluate one entity (stock symbol or client id)
  eval-all         Evaluate every listed entity in order
  eval-dataset     Evaluate the uploaded dataset as a whole
  close            Close the displayed result
  reset            Discard the dataset and start over
  status           Show session status
  help             Show this help
  exit             Exit

Aliases: u = upload, ls = list, e = eval, c = close, s = status, q = exit
"
    }
}
