// src/roster/mod.rs

//! The roster: an ordered list of named entries, loaded wholesale.
//!
//! - [`store`] defines the `RosterStore` collaborator and the inline / file
//!   backed implementations.
//!
//! An entry's identity is its position in the roster (its 1-based rank) plus
//! its name. Names are not required to be unique.

pub mod store;

use blake3::Hasher;

pub use store::{FileRosterStore, InlineRosterStore, RosterStore};

/// A single named entry in the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: String,
}

impl RosterEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Ordered, immutable list of entries for one loaded session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new(entries: Vec<RosterEntry>) -> Self {
        Self { entries }
    }

    /// Convenience constructor, mostly for tests and inline config.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(RosterEntry::new).collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RosterEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RosterEntry> {
        self.entries.iter()
    }

    /// 1-based rank of the entry at `index`.
    pub fn rank_of(index: usize) -> usize {
        index + 1
    }

    /// Stable hash over the ordered names.
    ///
    /// Two rosters with the same fingerprint interpret a cursor value the
    /// same way; a changed fingerprint after a reload means the cursor now
    /// points at a different person.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Hasher::new();
        for entry in &self.entries {
            hasher.update(entry.name.as_bytes());
            // Separator so ["ab", "c"] and ["a", "bc"] differ.
            hasher.update(&[0]);
        }
        hasher.finalize().to_hex().to_string()
    }
}
