// src/engine/mod.rs

//! Cyclic assignment engine.
//!
//! The pure core state machine lives in [`core`]; it owns the cursor, the
//! single undo checkpoint and the last batch, and never performs IO.
//! [`session`] is the async shell that wraps the core with the roster and
//! cursor stores and enforces the ordering contract of the shared variant:
//! read the cursor fresh, compute, write, then commit locally.
//! [`request`] turns user input into a validated count.

use std::fmt;

/// One assigned slot: the entry's name and its 1-based rank in the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedEntry {
    pub rank: usize,
    pub name: String,
}

/// Ordered entries produced by one Assign call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignedBatch {
    entries: Vec<AssignedEntry>,
}

impl AssignedBatch {
    pub fn new(entries: Vec<AssignedEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[AssignedEntry] {
        &self.entries
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}

impl fmt::Display for AssignedBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names().join(", "))
    }
}

/// Result of a successful (or planned) assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub batch: AssignedBatch,
    /// Cursor the batch started from; becomes the undo checkpoint.
    pub start: usize,
    /// Cursor after the batch (0-based).
    pub cursor: usize,
}

impl Assignment {
    /// 1-based "next start" position shown to users.
    pub fn next_start_display(&self) -> usize {
        self.cursor + 1
    }
}

/// Observable lifecycle of one engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Loaded { has_batch: bool },
}

pub mod core;
pub mod request;
pub mod session;

pub use self::core::AssignmentEngine;
pub use request::parse_count;
pub use session::{CursorMode, Session};
