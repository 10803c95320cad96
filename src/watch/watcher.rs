// src/watch/watcher.rs

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::console::{ConsoleCommand, ConsoleEvent};

/// Quiet period after a change before a reload is requested. Editors tend
/// to produce several events for one save.
const SETTLE: Duration = Duration::from_millis(200);

/// Handle for the roster watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive; dropping the handle
/// stops watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch the roster file and send `ConsoleCommand::Reload` when it changes.
///
/// The file's parent directory is watched non-recursively so that editors
/// which replace the file (write temp + rename) are still picked up.
pub fn spawn_roster_watcher(
    roster_path: impl Into<PathBuf>,
    console_tx: mpsc::Sender<ConsoleEvent>,
) -> Result<WatcherHandle> {
    let roster_path = roster_path.into();
    let file_name = roster_path
        .file_name()
        .map(OsString::from)
        .ok_or_else(|| anyhow!("roster path {:?} has no file name", roster_path))?;
    let dir = match roster_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // No tracing context on notify's thread.
                    eprintln!("rota: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("rota: roster watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    info!(path = ?roster_path, "watching roster file for changes");

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if !touches_roster(&event, &file_name) {
                continue;
            }
            debug!(?event, "roster file changed");

            // Swallow the burst of follow-up events.
            tokio::time::sleep(SETTLE).await;
            while event_rx.try_recv().is_ok() {}

            if console_tx
                .send(ConsoleEvent::Command(ConsoleCommand::Reload))
                .await
                .is_err()
            {
                break;
            }
        }
        debug!("roster watcher loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

fn touches_roster(event: &Event, file_name: &OsString) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    event
        .paths
        .iter()
        .any(|p| p.file_name().map(|n| n == file_name.as_os_str()).unwrap_or(false))
}

/// Whether `path` is something the watcher can follow (an existing file).
pub fn can_watch(path: &Path) -> bool {
    path.is_file()
}
