// src/cursor/file.rs

use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use anyhow::{anyhow, Context};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::cursor::{apply_write, CursorSnapshot, CursorStore};
use crate::errors::{Result, RotaError};

/// Default location (relative to the config directory) of the cursor record.
///
/// The file holds a single line: `<value> <version>`.
pub const CURSOR_FILE_PATH: &str = ".rota/cursor";

/// Cursor record persisted in a small text file.
///
/// Independent `rota` processes (or several handles in one process) pointing
/// at the same file share the cursor. Each write goes through its own temp
/// file + rename so a reader never sees a torn record.
///
/// The version check is best-effort here: it is a read-compare-write with no
/// lock, so two writers that read the same version at the same moment can
/// both pass it. It catches a writer whose read is stale by the time it
/// writes, which covers sequential interleavings of separate clients.
#[derive(Debug, Clone)]
pub struct FileCursorStore {
    path: PathBuf,
}

impl FileCursorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CursorStore for FileCursorStore {
    fn fetch_cursor(&self) -> Pin<Box<dyn Future<Output = Result<CursorSnapshot>> + Send + '_>> {
        Box::pin(async move { load_record(&self.path).await.map_err(RotaError::fetch) })
    }

    fn write_cursor(
        &self,
        value: u64,
        expected_version: Option<u64>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let current = load_record(&self.path).await.map_err(RotaError::persistence)?;
            let next = apply_write(current, value, expected_version).map_err(RotaError::Persistence)?;

            if next == current {
                debug!(value, "cursor unchanged; skipping write");
                return Ok(());
            }

            save_record(&self.path, next)
                .await
                .map_err(RotaError::persistence)?;
            info!(value = next.value, version = next.version, "stored cursor (file)");
            Ok(())
        })
    }
}

/// Read the record, defaulting to `{0, 0}` when the file does not exist.
async fn load_record(path: &Path) -> anyhow::Result<CursorSnapshot> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(?path, "no cursor record yet; defaulting to 0");
            return Ok(CursorSnapshot::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("reading cursor file at {:?}", path));
        }
    };

    parse_record(contents.trim()).with_context(|| format!("parsing cursor file at {:?}", path))
}

fn parse_record(line: &str) -> anyhow::Result<CursorSnapshot> {
    if line.is_empty() {
        return Ok(CursorSnapshot::default());
    }

    let mut parts = line.split_whitespace();
    let value = parts
        .next()
        .ok_or_else(|| anyhow!("empty cursor record"))?
        .parse::<u64>()
        .with_context(|| format!("invalid cursor value in {line:?}"))?;
    let version = match parts.next() {
        Some(v) => v
            .parse::<u64>()
            .with_context(|| format!("invalid cursor version in {line:?}"))?,
        None => 0,
    };

    if parts.next().is_some() {
        return Err(anyhow!("unexpected trailing data in cursor record {line:?}"));
    }

    Ok(CursorSnapshot { value, version })
}

async fn save_record(path: &Path, record: CursorSnapshot) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tokio::fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("creating cursor directory at {:?}", dir))?;

    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || replace_record(&dir, &path, record))
        .await
        .context("cursor write task panicked")?
}

/// Write the record to a fresh temp file in `dir` and rename it over `path`.
/// Every call gets its own temp file, so concurrent writers never collide.
fn replace_record(dir: &Path, path: &Path, record: CursorSnapshot) -> anyhow::Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating cursor temp file in {:?}", dir))?;
    writeln!(tmp, "{} {}", record.value, record.version)
        .with_context(|| format!("writing cursor temp file at {:?}", tmp.path()))?;
    tmp.persist(path)
        .with_context(|| format!("replacing cursor file at {:?}", path))?;
    Ok(())
}
