// src/engine/core.rs

//! Pure core assignment state machine.
//!
//! `AssignmentEngine` maps (roster, cursor, count) to (batch, new cursor,
//! checkpoint). It is synchronous and deterministic; everything that can
//! block or fail for external reasons lives in
//! [`Session`](crate::engine::session::Session).
//!
//! Mutating operations are split into a *plan* step that validates and
//! computes without touching state, and a *commit* step that cannot fail.
//! The shell persists between the two, which is what keeps a failed cursor
//! write from leaving partial state behind.

use tracing::debug;

use crate::engine::{AssignedBatch, AssignedEntry, Assignment, EngineState};
use crate::errors::{Result, RotaError};
use crate::roster::Roster;

/// Cursor, single-level undo checkpoint and last batch over a loaded roster.
#[derive(Debug, Default)]
pub struct AssignmentEngine {
    roster: Option<Roster>,
    cursor: usize,
    checkpoint: Option<usize>,
    last_batch: AssignedBatch,
}

impl AssignmentEngine {
    /// A fresh, `Uninitialized` engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace roster and cursor wholesale; clears checkpoint and batch.
    ///
    /// An empty roster is accepted but blocks [`plan`](Self::plan).
    pub fn load(&mut self, roster: Roster, initial_cursor: u64) {
        self.cursor = reduce(initial_cursor, roster.len());
        self.roster = Some(roster);
        self.checkpoint = None;
        self.last_batch = AssignedBatch::default();
        debug!(cursor = self.cursor, "engine loaded");
    }

    pub fn state(&self) -> EngineState {
        match self.roster {
            None => EngineState::Uninitialized,
            Some(_) => EngineState::Loaded {
                has_batch: !self.last_batch.is_empty(),
            },
        }
    }

    pub fn roster(&self) -> Option<&Roster> {
        self.roster.as_ref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn checkpoint(&self) -> Option<usize> {
        self.checkpoint
    }

    pub fn last_batch(&self) -> &AssignedBatch {
        &self.last_batch
    }

    /// 1-based position the next batch will start from.
    pub fn next_start_display(&self) -> usize {
        self.cursor + 1
    }

    /// Validate a request and compute the batch starting at `start`.
    ///
    /// `start` is reduced modulo the roster length, so a raw value from a
    /// cursor store can be passed as-is. Does not mutate the engine.
    pub fn plan(&self, count: usize, start: u64) -> Result<Assignment> {
        let roster = self.validate(count)?;
        let len = roster.len();
        let start = reduce(start, len);

        let entries = (0..count)
            .map(|i| {
                let index = (start + i % len) % len;
                AssignedEntry {
                    rank: Roster::rank_of(index),
                    name: roster
                        .get(index)
                        .map(|e| e.name.clone())
                        .unwrap_or_default(),
                }
            })
            .collect();

        let cursor = (start + count % len) % len;
        debug!(start, count, cursor, "planned assignment");

        Ok(Assignment {
            batch: AssignedBatch::new(entries),
            start,
            cursor,
        })
    }

    /// Make a planned assignment current. Cannot fail.
    pub fn commit(&mut self, assignment: &Assignment) {
        self.checkpoint = Some(assignment.start);
        self.cursor = assignment.cursor;
        self.last_batch = assignment.batch.clone();
        debug!(
            checkpoint = assignment.start,
            cursor = self.cursor,
            "committed assignment"
        );
    }

    /// Local-variant Assign: plan from the engine's own cursor and commit.
    pub fn assign(&mut self, count: usize) -> Result<Assignment> {
        let assignment = self.plan(count, self.cursor as u64)?;
        self.commit(&assignment);
        Ok(assignment)
    }

    /// Cursor value an Undo would restore.
    pub fn undo_target(&self) -> Result<usize> {
        self.checkpoint.ok_or(RotaError::NothingToUndo)
    }

    /// Restore the checkpoint, clear the batch and consume the checkpoint.
    ///
    /// Returns the restored cursor, or `NothingToUndo` with no change.
    pub fn commit_undo(&mut self) -> Result<usize> {
        let target = self.undo_target()?;
        self.cursor = target;
        self.checkpoint = None;
        self.last_batch = AssignedBatch::default();
        debug!(cursor = target, "undo committed");
        Ok(target)
    }

    /// Local-variant Undo.
    pub fn undo(&mut self) -> Result<usize> {
        self.commit_undo()
    }

    /// Back to the top of the roster: cursor 0, no checkpoint, no batch.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.checkpoint = None;
        self.last_batch = AssignedBatch::default();
        debug!("engine reset");
    }

    /// Check an Assign request against the current state without computing
    /// anything. The session calls this before touching the cursor store.
    pub fn validate(&self, count: usize) -> Result<&Roster> {
        let roster = self.assignable_roster()?;
        if count == 0 {
            return Err(RotaError::InvalidRequest(
                "count must be a positive integer (got 0)".to_string(),
            ));
        }
        Ok(roster)
    }

    fn assignable_roster(&self) -> Result<&Roster> {
        match &self.roster {
            None => Err(RotaError::InvalidRequest(
                "roster has not been loaded".to_string(),
            )),
            Some(roster) if roster.is_empty() => Err(RotaError::InvalidRequest(
                "roster is empty; nothing to assign".to_string(),
            )),
            Some(roster) => Ok(roster),
        }
    }
}

fn reduce(value: u64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (value % len as u64) as usize
}
