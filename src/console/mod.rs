// src/console/mod.rs

//! Line-oriented console front end.
//!
//! This is the presentation layer: it turns typed commands into session
//! operations and prints the results. Everything flows through one mpsc
//! channel of [`ConsoleEvent`]s into [`runtime::ConsoleRuntime`], which
//! handles events strictly one at a time.
//!
//! - [`input`] reads commands from stdin (or any async reader).
//! - [`display`] formats batches, status and errors.
//! - [`runtime`] is the event loop.

use std::str::FromStr;

pub mod display;
pub mod input;
pub mod runtime;

pub use input::spawn_line_reader;
pub use runtime::ConsoleRuntime;

/// A user command, as typed on one console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Raw count text; parsed by the runtime so bad input is reported as
    /// `InvalidRequest` like any other engine error.
    Assign(String),
    Undo,
    Reset,
    Reload,
    Status,
    Roster,
    Help,
    Quit,
    Unknown(String),
}

impl FromStr for ConsoleCommand {
    type Err = std::convert::Infallible;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        let cmd = match head.to_lowercase().as_str() {
            "assign" | "a" => ConsoleCommand::Assign(rest.to_string()),
            "undo" | "u" => ConsoleCommand::Undo,
            "reset" => ConsoleCommand::Reset,
            "reload" | "sync" => ConsoleCommand::Reload,
            "status" | "s" => ConsoleCommand::Status,
            "roster" | "list" => ConsoleCommand::Roster,
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" | "q" => ConsoleCommand::Quit,
            // A bare number (or something that looks like an attempt at one)
            // is shorthand for `assign`.
            _ if rest.is_empty()
                && head.trim_start_matches(['-', '+']).starts_with(|c: char| c.is_ascii_digit()) =>
            {
                ConsoleCommand::Assign(head.to_string())
            }
            _ => ConsoleCommand::Unknown(line.to_string()),
        };
        Ok(cmd)
    }
}

/// Events flowing into the console runtime.
#[derive(Debug, Clone)]
pub enum ConsoleEvent {
    /// A command from the user (or a reload from the roster watcher).
    Command(ConsoleCommand),
    /// An annotation finished for batch number `seq`.
    Annotated { seq: u64, text: String },
    /// Ctrl-C or end of input.
    ShutdownRequested,
}
