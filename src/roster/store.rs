// src/roster/store.rs

//! Roster store abstraction.
//!
//! The session talks to a `RosterStore` instead of reading files directly,
//! so tests can script fetch results (including failures) without touching
//! the filesystem.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use anyhow::Context;
use tracing::debug;

use crate::errors::{Result, RotaError};
use crate::roster::{Roster, RosterEntry};

/// Source of the full, ordered roster.
///
/// Implementations must return every entry in a stable order; failures are
/// reported as [`RotaError::Fetch`].
pub trait RosterStore: Send + Sync {
    fn fetch_roster(&self) -> Pin<Box<dyn Future<Output = Result<Roster>> + Send + '_>>;
}

/// Roster taken verbatim from `[roster].names`.
#[derive(Debug, Clone)]
pub struct InlineRosterStore {
    names: Vec<String>,
}

impl InlineRosterStore {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }
}

impl RosterStore for InlineRosterStore {
    fn fetch_roster(&self) -> Pin<Box<dyn Future<Output = Result<Roster>> + Send + '_>> {
        let roster = Roster::from_names(self.names.iter().cloned());
        Box::pin(async move { Ok(roster) })
    }
}

/// Roster read from a text file, one name per line.
///
/// Blank lines and lines starting with `#` are skipped; names are trimmed.
#[derive(Debug, Clone)]
pub struct FileRosterStore {
    path: PathBuf,
}

impl FileRosterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RosterStore for FileRosterStore {
    fn fetch_roster(&self) -> Pin<Box<dyn Future<Output = Result<Roster>> + Send + '_>> {
        Box::pin(async move {
            let contents = tokio::fs::read_to_string(&self.path)
                .await
                .with_context(|| format!("reading roster file {:?}", self.path))
                .map_err(RotaError::fetch)?;

            let roster = parse_roster(&contents);
            debug!(path = ?self.path, entries = roster.len(), "read roster file");
            Ok(roster)
        })
    }
}

/// Parse the one-name-per-line roster format.
pub fn parse_roster(contents: &str) -> Roster {
    let entries = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(RosterEntry::new)
        .collect();
    Roster::new(entries)
}
