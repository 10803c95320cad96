#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Barrier;

use rota::annotate::Annotator;
use rota::cursor::{CursorSnapshot, CursorStore, MemoryCursorStore};
use rota::engine::AssignedBatch;
use rota::errors::{Result, RotaError};
use rota::roster::{Roster, RosterStore};

/// Roster store whose next response can be changed between fetches.
#[derive(Clone)]
pub struct FakeRosterStore {
    response: Arc<Mutex<std::result::Result<Vec<String>, String>>>,
    fetches: Arc<AtomicUsize>,
}

impl FakeRosterStore {
    pub fn new(names: &[&str]) -> Self {
        Self {
            response: Arc::new(Mutex::new(Ok(to_owned(names)))),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_names(&self, names: &[&str]) {
        *self.response.lock().unwrap() = Ok(to_owned(names));
    }

    pub fn fail_with(&self, msg: &str) {
        *self.response.lock().unwrap() = Err(msg.to_string());
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl RosterStore for FakeRosterStore {
    fn fetch_roster(&self) -> Pin<Box<dyn Future<Output = Result<Roster>> + Send + '_>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let response = self.response.lock().unwrap().clone();
        Box::pin(async move {
            response
                .map(|names| Roster::from_names(names))
                .map_err(RotaError::Fetch)
        })
    }
}

fn to_owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Memory-backed cursor store with switchable read/write failures.
///
/// Injected write failures are returned as `RotaError::Other` on purpose,
/// so tests also cover the session mapping them to `Persistence`.
#[derive(Clone, Default)]
pub struct FailingCursorStore {
    inner: MemoryCursorStore,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<Mutex<Vec<u64>>>,
}

impl FailingCursorStore {
    pub fn new(inner: MemoryCursorStore) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    pub fn fail_reads(&self, val: bool) {
        self.fail_reads.store(val, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, val: bool) {
        self.fail_writes.store(val, Ordering::SeqCst);
    }

    /// Values successfully written, in order.
    pub fn writes(&self) -> Vec<u64> {
        self.writes.lock().unwrap().clone()
    }

    pub fn inner(&self) -> &MemoryCursorStore {
        &self.inner
    }
}

impl CursorStore for FailingCursorStore {
    fn fetch_cursor(&self) -> Pin<Box<dyn Future<Output = Result<CursorSnapshot>> + Send + '_>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Box::pin(async { Err(RotaError::Fetch("injected read failure".to_string())) });
        }
        self.inner.fetch_cursor()
    }

    fn write_cursor(
        &self,
        value: u64,
        expected_version: Option<u64>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(RotaError::Other(anyhow::anyhow!("injected write failure")));
            }
            self.inner.write_cursor(value, expected_version).await?;
            self.writes.lock().unwrap().push(value);
            Ok(())
        })
    }
}

/// Cursor store that, once armed, makes the next `racers` fetches wait for
/// each other after reading, so concurrent sessions all see the same
/// starting cursor.
#[derive(Clone)]
pub struct RacingCursorStore {
    inner: MemoryCursorStore,
    racers: usize,
    barrier: Arc<Barrier>,
    remaining: Arc<AtomicUsize>,
}

impl RacingCursorStore {
    pub fn new(inner: MemoryCursorStore, racers: usize) -> Self {
        Self {
            inner,
            racers,
            barrier: Arc::new(Barrier::new(racers)),
            remaining: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Hold the next `racers` fetches at the barrier.
    pub fn arm(&self) {
        self.remaining.store(self.racers, Ordering::SeqCst);
    }
}

impl CursorStore for RacingCursorStore {
    fn fetch_cursor(&self) -> Pin<Box<dyn Future<Output = Result<CursorSnapshot>> + Send + '_>> {
        Box::pin(async move {
            let snapshot = self.inner.fetch_cursor().await?;
            let armed = self
                .remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if armed {
                self.barrier.wait().await;
            }
            Ok(snapshot)
        })
    }

    fn write_cursor(
        &self,
        value: u64,
        expected_version: Option<u64>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        self.inner.write_cursor(value, expected_version)
    }
}

/// Annotator that records every batch it sees and answers with fixed text
/// after an optional delay.
#[derive(Clone, Default)]
pub struct RecordingAnnotator {
    text: Option<String>,
    delay: Duration,
    seen: Arc<Mutex<Vec<Vec<String>>>>,
}

impl RecordingAnnotator {
    pub fn answering(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn silent() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn seen(&self) -> Vec<Vec<String>> {
        self.seen.lock().unwrap().clone()
    }
}

impl Annotator for RecordingAnnotator {
    fn annotate<'a>(
        &'a self,
        batch: &'a AssignedBatch,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(async move {
            self.seen
                .lock()
                .unwrap()
                .push(batch.names().iter().map(|n| n.to_string()).collect());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.text.clone()
        })
    }
}
