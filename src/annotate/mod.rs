// src/annotate/mod.rs

//! Optional advisory annotations for an assigned batch.
//!
//! Annotation happens after the assignment is final and never feeds back
//! into the engine. Failures are logged and turned into "no annotation"
//! at this boundary; they never become a [`RotaError`](crate::errors::RotaError).
//!
//! - [`command`] runs an external command and uses its stdout.
//! - [`spawn_annotation`] dispatches an annotator in the background and
//!   reports the result to the console loop.

pub mod command;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::console::ConsoleEvent;
use crate::engine::AssignedBatch;

pub use command::CommandAnnotator;

/// Produces free-text commentary for a batch, best-effort.
pub trait Annotator: Send + Sync {
    /// `None` means "no annotation available", for whatever reason.
    fn annotate<'a>(
        &'a self,
        batch: &'a AssignedBatch,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>>;

    /// Whether dispatching is worth a task at all.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Annotator used when none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnnotator;

impl Annotator for NoopAnnotator {
    fn annotate<'a>(
        &'a self,
        _batch: &'a AssignedBatch,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(async { None })
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Fire-and-forget: annotate `batch` in a background task and send
/// `ConsoleEvent::Annotated` back if there is something to show.
///
/// `seq` identifies the batch so the console can drop annotations that
/// arrive after a newer batch replaced it.
pub fn spawn_annotation(
    annotator: Arc<dyn Annotator>,
    seq: u64,
    batch: AssignedBatch,
    console_tx: mpsc::Sender<ConsoleEvent>,
) {
    if !annotator.is_enabled() || batch.is_empty() {
        return;
    }

    tokio::spawn(async move {
        let Some(text) = annotator.annotate(&batch).await else {
            debug!(seq, "no annotation for batch");
            return;
        };
        if console_tx
            .send(ConsoleEvent::Annotated { seq, text })
            .await
            .is_err()
        {
            debug!(seq, "console closed before annotation arrived");
        }
    });
}
