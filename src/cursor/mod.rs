// src/cursor/mod.rs

//! External cursor storage for the shared-cursor variant.
//!
//! The cursor is a single integer cell owned by the store. The session never
//! caches it: every assignment reads a fresh [`CursorSnapshot`] right before
//! computing the batch and writes the new value before committing locally.
//!
//! - [`memory`] holds an in-process cell that several sessions can share.
//! - [`file`] persists the cell as a one-line record on disk.

pub mod file;
pub mod memory;

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

pub use file::{FileCursorStore, CURSOR_FILE_PATH};
pub use memory::MemoryCursorStore;

/// Cursor value as read from a store, with the version it was read at.
///
/// Stores bump `version` only when the value actually changes, so writing
/// the same value twice has the same effect as writing it once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorSnapshot {
    pub value: u64,
    pub version: u64,
}

/// A store holding the one shared cursor record.
///
/// - `fetch_cursor` must default to `0` when no record exists yet; failures
///   are [`RotaError::Fetch`](crate::errors::RotaError::Fetch).
/// - `write_cursor` stores `value`. If `expected_version` is `Some`, the
///   write is rejected with
///   [`RotaError::Persistence`](crate::errors::RotaError::Persistence) when
///   the stored version differs. With `None` the last writer wins.
pub trait CursorStore: Send + Sync {
    fn fetch_cursor(&self) -> Pin<Box<dyn Future<Output = Result<CursorSnapshot>> + Send + '_>>;

    fn write_cursor(
        &self,
        value: u64,
        expected_version: Option<u64>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Apply a write to a snapshot, enforcing the optional version check.
///
/// Shared by the store implementations so they agree on versioning rules.
pub(crate) fn apply_write(
    current: CursorSnapshot,
    value: u64,
    expected_version: Option<u64>,
) -> std::result::Result<CursorSnapshot, String> {
    if let Some(expected) = expected_version {
        if expected != current.version {
            return Err(format!(
                "cursor changed concurrently (read version {expected}, store is at version {})",
                current.version
            ));
        }
    }

    if current.value == value {
        return Ok(current);
    }

    Ok(CursorSnapshot {
        value,
        version: current.version + 1,
    })
}
