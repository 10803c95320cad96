// src/console/display.rs

//! Plain-text rendering for the console.

use std::fmt::Write;

use crate::engine::{AssignmentEngine, Assignment, EngineState};
use crate::errors::RotaError;
use crate::roster::Roster;
use crate::types::CursorVariant;

pub const HELP: &str = "\
commands:
  assign <N> | <N>   assign the next N people
  undo               revert the last assignment
  reset              start again from #1 (local cursor only)
  reload             re-fetch the roster (and shared cursor)
  status             show cursor and undo state
  roster             list the loaded roster
  help               show this help
  quit               exit";

pub fn render_assignment(assignment: &Assignment) -> String {
    let mut out = format!(
        "assigned {} (next start #{}):",
        assignment.batch.len(),
        assignment.next_start_display()
    );
    for (i, entry) in assignment.batch.entries().iter().enumerate() {
        let _ = write!(out, "\n  {:>3}. {}  (#{})", i + 1, entry.name, entry.rank);
    }
    out
}

pub fn render_undo(engine: &AssignmentEngine) -> String {
    format!(
        "last assignment undone; next start #{}",
        engine.next_start_display()
    )
}

pub fn render_reset() -> String {
    "order reset; next start #1".to_string()
}

pub fn render_loaded(entries: usize, engine: &AssignmentEngine) -> String {
    format!(
        "loaded {entries} entries; next start #{}",
        engine.next_start_display()
    )
}

pub fn render_status(engine: &AssignmentEngine, variant: CursorVariant) -> String {
    let variant = match variant {
        CursorVariant::Local => "local",
        CursorVariant::Shared => "shared",
    };

    match engine.state() {
        EngineState::Uninitialized => format!("cursor: {variant}\nroster: not loaded"),
        EngineState::Loaded { has_batch } => {
            let entries = engine.roster().map(Roster::len).unwrap_or(0);
            let mut out = format!(
                "cursor: {variant}\nroster: {entries} entries\nnext start: #{}",
                engine.next_start_display()
            );
            let _ = write!(
                out,
                "\nundo: {}",
                if engine.checkpoint().is_some() { "available" } else { "none" }
            );
            if has_batch {
                let _ = write!(out, "\nlast batch: {}", engine.last_batch());
            }
            out
        }
    }
}

pub fn render_roster(engine: &AssignmentEngine) -> String {
    let Some(roster) = engine.roster() else {
        return "roster: not loaded".to_string();
    };
    if roster.is_empty() {
        return "roster: empty".to_string();
    }

    let cursor = engine.cursor();
    let mut out = format!("roster ({} entries):", roster.len());
    for (index, entry) in roster.iter().enumerate() {
        let marker = if index == cursor { ">" } else { " " };
        let _ = write!(out, "\n {marker} #{:<3} {}", Roster::rank_of(index), entry.name);
    }
    out
}

pub fn render_annotation(text: &str) -> String {
    format!("insight: {text}")
}

pub fn render_error(err: &RotaError) -> String {
    format!("error: {err}")
}

pub fn render_unknown(line: &str) -> String {
    format!("unknown command: {line}\n{HELP}")
}
