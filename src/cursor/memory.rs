// src/cursor/memory.rs

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::cursor::{apply_write, CursorSnapshot, CursorStore};
use crate::errors::{Result, RotaError};

/// In-process cursor cell.
///
/// Cloning the store clones the handle, not the value: every clone sees
/// and mutates the same cursor. Tests use this to model independent clients.
#[derive(Debug, Clone, Default)]
pub struct MemoryCursorStore {
    cell: Arc<Mutex<CursorSnapshot>>,
}

impl MemoryCursorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing value (version 0).
    pub fn with_value(value: u64) -> Self {
        Self {
            cell: Arc::new(Mutex::new(CursorSnapshot { value, version: 0 })),
        }
    }

    /// Current snapshot, bypassing the async interface.
    pub fn snapshot(&self) -> Result<CursorSnapshot> {
        Ok(*self.lock()?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, CursorSnapshot>> {
        self.cell
            .lock()
            .map_err(|_| RotaError::Persistence("cursor cell lock poisoned".to_string()))
    }
}

impl CursorStore for MemoryCursorStore {
    fn fetch_cursor(&self) -> Pin<Box<dyn Future<Output = Result<CursorSnapshot>> + Send + '_>> {
        let snapshot = self.snapshot();
        Box::pin(async move { snapshot })
    }

    fn write_cursor(
        &self,
        value: u64,
        expected_version: Option<u64>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let result = self.lock().and_then(|mut cell| {
            let next = apply_write(*cell, value, expected_version).map_err(RotaError::Persistence)?;
            debug!(value = next.value, version = next.version, "stored cursor (memory)");
            *cell = next;
            Ok(())
        });
        Box::pin(async move { result })
    }
}
