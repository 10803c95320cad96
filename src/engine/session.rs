// src/engine/session.rs

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cursor::CursorStore;
use crate::engine::core::AssignmentEngine;
use crate::engine::Assignment;
use crate::errors::{Result, RotaError};
use crate::roster::RosterStore;
use crate::types::{CursorCheck, CursorVariant};

/// Where the session keeps its cursor.
#[derive(Clone)]
pub enum CursorMode {
    /// Cursor only lives in the engine.
    Local,
    /// Cursor is owned by `store`; the engine holds a working copy.
    Shared {
        store: Arc<dyn CursorStore>,
        check: CursorCheck,
    },
}

impl CursorMode {
    pub fn variant(&self) -> CursorVariant {
        match self {
            CursorMode::Local => CursorVariant::Local,
            CursorMode::Shared { .. } => CursorVariant::Shared,
        }
    }
}

impl fmt::Debug for CursorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorMode::Local => f.write_str("Local"),
            CursorMode::Shared { check, .. } => f
                .debug_struct("Shared")
                .field("check", check)
                .finish_non_exhaustive(),
        }
    }
}

/// Async shell around [`AssignmentEngine`].
///
/// Owns the stores and performs every external call in the order the
/// shared variant requires:
///
/// - Assign: validate, read cursor, plan, write cursor, commit.
/// - Undo: write checkpoint, commit.
///
/// Any failure before the commit leaves the engine exactly as it was.
/// Operations take `&mut self`, so one session can never run two of them
/// at once.
pub struct Session {
    engine: AssignmentEngine,
    roster_store: Arc<dyn RosterStore>,
    mode: CursorMode,
    fingerprint: Option<String>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("engine", &self.engine)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(roster_store: Arc<dyn RosterStore>, mode: CursorMode) -> Self {
        Self {
            engine: AssignmentEngine::new(),
            roster_store,
            mode,
            fingerprint: None,
        }
    }

    pub fn engine(&self) -> &AssignmentEngine {
        &self.engine
    }

    pub fn variant(&self) -> CursorVariant {
        self.mode.variant()
    }

    /// Fetch the roster (and, when shared, the cursor) and load the engine.
    ///
    /// On a fetch failure the engine keeps its previous state, whether that
    /// was `Loaded` or `Uninitialized`. Returns the number of entries loaded.
    pub async fn load(&mut self) -> Result<usize> {
        let roster = self.roster_store.fetch_roster().await?;

        let initial = match &self.mode {
            CursorMode::Local => 0,
            CursorMode::Shared { store, .. } => store.fetch_cursor().await?.value,
        };

        let fingerprint = roster.fingerprint();
        if let Some(previous) = &self.fingerprint {
            if *previous != fingerprint {
                warn!("roster changed since the last load; cursor positions now refer to different entries");
            }
        }
        self.fingerprint = Some(fingerprint);

        let len = roster.len();
        if len == 0 {
            warn!("loaded an empty roster; assignments are blocked until it is reloaded");
        }

        self.engine.load(roster, initial);
        info!(
            entries = len,
            cursor = self.engine.cursor(),
            variant = ?self.variant(),
            "roster loaded"
        );
        Ok(len)
    }

    /// Assign the next `count` entries.
    pub async fn assign(&mut self, count: usize) -> Result<Assignment> {
        self.engine.validate(count)?;

        let assignment = match &self.mode {
            CursorMode::Local => self.engine.plan(count, self.engine.cursor() as u64)?,
            CursorMode::Shared { store, check } => {
                // Read as late as possible to keep the race window small.
                let snapshot = store.fetch_cursor().await?;
                let assignment = self.engine.plan(count, snapshot.value)?;

                let expected = match check {
                    CursorCheck::None => None,
                    CursorCheck::Version => Some(snapshot.version),
                };
                debug!(
                    start = assignment.start,
                    next = assignment.cursor,
                    ?expected,
                    "writing cursor before commit"
                );
                store
                    .write_cursor(assignment.cursor as u64, expected)
                    .await
                    .map_err(as_persistence)?;
                assignment
            }
        };

        self.engine.commit(&assignment);
        info!(
            count,
            start = assignment.start,
            cursor = assignment.cursor,
            "assigned batch"
        );
        Ok(assignment)
    }

    /// Roll the cursor back to the checkpoint of the last Assign.
    ///
    /// Returns the restored cursor. In the shared variant with the plain
    /// last-writer-wins check, progress other clients made since our Assign
    /// is overwritten. With `CursorCheck::Version` the undo is refused
    /// instead when the stored cursor is no longer the one we wrote.
    pub async fn undo(&mut self) -> Result<usize> {
        let target = self.engine.undo_target()?;

        if let CursorMode::Shared { store, check } = &self.mode {
            let expected = match check {
                CursorCheck::None => None,
                CursorCheck::Version => {
                    let snapshot = store.fetch_cursor().await?;
                    if snapshot.value != self.engine.cursor() as u64 {
                        return Err(RotaError::Persistence(format!(
                            "cursor moved to {} since the last assignment; undo would discard another client's progress",
                            snapshot.value
                        )));
                    }
                    Some(snapshot.version)
                }
            };
            store
                .write_cursor(target as u64, expected)
                .await
                .map_err(as_persistence)?;
        }

        let restored = self.engine.commit_undo()?;
        info!(cursor = restored, "undid last assignment");
        Ok(restored)
    }

    /// Start again from the top of the roster. Local variant only; a shared
    /// cursor is refused with `InvalidRequest`.
    pub fn reset(&mut self) -> Result<()> {
        match self.mode {
            CursorMode::Local => {
                self.engine.reset();
                info!("cursor reset to the start of the roster");
                Ok(())
            }
            CursorMode::Shared { .. } => Err(RotaError::InvalidRequest(
                "reset is not available with a shared cursor".to_string(),
            )),
        }
    }
}

/// Cursor-store write failures always surface as `Persistence`.
fn as_persistence(err: RotaError) -> RotaError {
    match err {
        RotaError::Persistence(_) => err,
        other => RotaError::Persistence(other.to_string()),
    }
}
