// src/watch/mod.rs

//! Optional roster-file watching.
//!
//! When `[roster].watch = true` and the roster comes from a file, changes
//! to that file are turned into `reload` commands for the console. Reload
//! semantics are unchanged: the local cursor starts over, the shared cursor
//! is re-read.

pub mod watcher;

pub use watcher::{can_watch, spawn_roster_watcher, WatcherHandle};
