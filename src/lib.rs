// src/lib.rs

pub mod annotate;
pub mod cli;
pub mod config;
pub mod console;
pub mod cursor;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod roster;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::annotate::{Annotator, CommandAnnotator, NoopAnnotator};
use crate::cli::CliArgs;
use crate::config::{load_and_validate, resolve_relative, ConfigFile, RosterSource};
use crate::console::{spawn_line_reader, ConsoleCommand, ConsoleEvent, ConsoleRuntime};
use crate::cursor::FileCursorStore;
use crate::engine::{CursorMode, Session};
use crate::roster::{FileRosterStore, InlineRosterStore, RosterStore};
use crate::types::{CursorCheck, CursorVariant};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - roster / cursor stores and the session
/// - the optional annotator
/// - (optional) roster file watcher
/// - stdin command reader and Ctrl-C handling
/// - the console event loop
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.clone();
    let mut cfg = load_and_validate(&config_path)?;

    if let Some(variant) = args.variant {
        cfg.config.variant = variant.into();
    }
    if cfg.config.variant == CursorVariant::Local && cfg.config.cursor_check != CursorCheck::None {
        warn!("cursor_check has no effect with a local cursor");
    }

    let root = config_root_dir(&config_path);
    let roster_store = build_roster_store(&cfg, &root);

    if args.dry_run {
        print_dry_run(&cfg, &root, roster_store.as_ref()).await?;
        return Ok(());
    }

    let mode = build_cursor_mode(&cfg, &root);
    let annotator = build_annotator(&cfg);

    let (console_tx, console_rx) = mpsc::channel::<ConsoleEvent>(64);

    // Optional roster watcher.
    let _watcher_handle = match (&cfg.roster, cfg.roster_watch) {
        (RosterSource::File(path), true) => {
            let path = resolve_relative(&root, path);
            if !crate::watch::can_watch(&path) {
                warn!(?path, "roster file does not exist yet; watching for it to appear");
            }
            Some(crate::watch::spawn_roster_watcher(path, console_tx.clone())?)
        }
        _ => None,
    };

    // Ctrl-C → graceful shutdown.
    {
        let tx = console_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(ConsoleEvent::ShutdownRequested).await;
        });
    }

    // Initial load goes through the same path as a user `reload`.
    console_tx
        .send(ConsoleEvent::Command(ConsoleCommand::Reload))
        .await?;
    spawn_line_reader(BufReader::new(tokio::io::stdin()), console_tx.clone());

    info!(variant = ?cfg.config.variant, "starting console");
    println!("{}", crate::console::display::HELP);

    let session = Session::new(roster_store, mode);
    let console = ConsoleRuntime::new(session, annotator, console_rx, console_tx, std::io::stdout());
    console.run().await?;
    Ok(())
}

/// Roster store for the configured source. File paths are resolved against
/// the config directory.
pub fn build_roster_store(cfg: &ConfigFile, root: &Path) -> Arc<dyn RosterStore> {
    match &cfg.roster {
        RosterSource::Inline(names) => Arc::new(InlineRosterStore::new(names.clone())),
        RosterSource::File(path) => Arc::new(FileRosterStore::new(resolve_relative(root, path))),
    }
}

/// Cursor mode for the configured variant.
pub fn build_cursor_mode(cfg: &ConfigFile, root: &Path) -> CursorMode {
    match cfg.config.variant {
        CursorVariant::Local => CursorMode::Local,
        CursorVariant::Shared => CursorMode::Shared {
            store: Arc::new(FileCursorStore::new(resolve_relative(root, &cfg.cursor.path))),
            check: cfg.config.cursor_check,
        },
    }
}

/// Command annotator if one is configured, otherwise a no-op.
pub fn build_annotator(cfg: &ConfigFile) -> Arc<dyn Annotator> {
    match &cfg.annotate.command {
        Some(cmd) => Arc::new(CommandAnnotator::new(cmd.clone(), cfg.annotate.timeout)),
        None => Arc::new(NoopAnnotator),
    }
}

/// Figure out the directory config-relative paths are resolved against.
///
/// - If the config path has a non-empty parent (e.g. "team/Rota.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Rota.toml" (parent = ""),
///   we fall back to the current working directory "."
pub fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Dry-run output: effective config plus the roster as fetched right now.
async fn print_dry_run(cfg: &ConfigFile, root: &Path, roster_store: &dyn RosterStore) -> Result<()> {
    println!("rota dry-run");
    println!("  config.variant = {:?}", cfg.config.variant);
    println!("  config.cursor_check = {:?}", cfg.config.cursor_check);
    match &cfg.roster {
        RosterSource::Inline(names) => println!("  roster = inline ({} names)", names.len()),
        RosterSource::File(path) => {
            println!("  roster = file {:?}", resolve_relative(root, path));
            println!("  roster.watch = {}", cfg.roster_watch);
        }
    }
    if cfg.config.variant == CursorVariant::Shared {
        println!("  cursor.path = {:?}", resolve_relative(root, &cfg.cursor.path));
    }
    match &cfg.annotate.command {
        Some(cmd) => println!("  annotate.command = {cmd} (timeout {:?})", cfg.annotate.timeout),
        None => println!("  annotate = disabled"),
    }
    println!();

    let roster = roster_store.fetch_roster().await?;
    println!("roster ({}):", roster.len());
    for (index, entry) in roster.iter().enumerate() {
        println!("  #{:<3} {}", crate::roster::Roster::rank_of(index), entry.name);
    }
    println!("  fingerprint: {}", roster.fingerprint());

    Ok(())
}
