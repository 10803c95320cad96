// src/console/runtime.rs

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::annotate::{spawn_annotation, Annotator};
use crate::console::display;
use crate::console::{ConsoleCommand, ConsoleEvent};
use crate::engine::{parse_count, Session};
use crate::errors::{Result, RotaError};

/// Console event loop.
///
/// Pulls one [`ConsoleEvent`] at a time and awaits the resulting session
/// operation before taking the next, so a second Assign can never start
/// while the first is still talking to the cursor store.
///
/// Engine errors are printed and the loop continues. Only failures to write
/// to `out` end the loop with an error.
pub struct ConsoleRuntime<W: Write> {
    session: Session,
    annotator: Arc<dyn Annotator>,
    event_rx: mpsc::Receiver<ConsoleEvent>,
    event_tx: mpsc::Sender<ConsoleEvent>,
    out: W,
    /// Number of the batch currently on screen; annotations for any other
    /// number are stale.
    batch_seq: u64,
}

impl<W: Write> fmt::Debug for ConsoleRuntime<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleRuntime")
            .field("session", &self.session)
            .field("batch_seq", &self.batch_seq)
            .finish_non_exhaustive()
    }
}

impl<W: Write> ConsoleRuntime<W> {
    /// `event_tx` must feed `event_rx`; it is handed to annotation tasks so
    /// their results come back through the same loop.
    pub fn new(
        session: Session,
        annotator: Arc<dyn Annotator>,
        event_rx: mpsc::Receiver<ConsoleEvent>,
        event_tx: mpsc::Sender<ConsoleEvent>,
        out: W,
    ) -> Self {
        Self {
            session,
            annotator,
            event_rx,
            event_tx,
            out,
            batch_seq: 0,
        }
    }

    /// Main event loop. Returns the session so callers (and tests) can
    /// inspect the final state.
    pub async fn run(mut self) -> Result<Session> {
        info!("rota console started");

        while let Some(event) = self.event_rx.recv().await {
            debug!(?event, "console received event");
            if !self.handle_event(event).await? {
                info!("shutdown requested; stopping console");
                break;
            }
        }

        info!("console exiting");
        Ok(self.session)
    }

    async fn handle_event(&mut self, event: ConsoleEvent) -> Result<bool> {
        match event {
            ConsoleEvent::Command(ConsoleCommand::Quit) | ConsoleEvent::ShutdownRequested => {
                Ok(false)
            }
            ConsoleEvent::Command(cmd) => {
                match self.handle_command(cmd).await {
                    Ok(()) => {}
                    Err(RotaError::IoError(err)) => return Err(RotaError::IoError(err)),
                    Err(err) => self.print(&display::render_error(&err))?,
                }
                Ok(true)
            }
            ConsoleEvent::Annotated { seq, text } => {
                if seq == self.batch_seq && !self.session.engine().last_batch().is_empty() {
                    self.print(&display::render_annotation(&text))?;
                } else {
                    debug!(seq, current = self.batch_seq, "dropping stale annotation");
                }
                Ok(true)
            }
        }
    }

    /// Run one command. Engine errors come back as `Err` for the caller to
    /// print; `IoError` means the output itself failed.
    async fn handle_command(&mut self, cmd: ConsoleCommand) -> Result<()> {
        match cmd {
            ConsoleCommand::Assign(raw) => {
                let count = parse_count(&raw)?;
                let assignment = self.session.assign(count).await?;
                self.batch_seq += 1;
                self.print(&display::render_assignment(&assignment))?;
                spawn_annotation(
                    Arc::clone(&self.annotator),
                    self.batch_seq,
                    assignment.batch,
                    self.event_tx.clone(),
                );
            }
            ConsoleCommand::Undo => {
                self.session.undo().await?;
                self.batch_seq += 1;
                self.print(&display::render_undo(self.session.engine()))?;
            }
            ConsoleCommand::Reset => {
                self.session.reset()?;
                self.batch_seq += 1;
                self.print(&display::render_reset())?;
            }
            ConsoleCommand::Reload => {
                let entries = self.session.load().await?;
                self.batch_seq += 1;
                self.print(&display::render_loaded(entries, self.session.engine()))?;
            }
            ConsoleCommand::Status => {
                let text = display::render_status(self.session.engine(), self.session.variant());
                self.print(&text)?;
            }
            ConsoleCommand::Roster => {
                let text = display::render_roster(self.session.engine());
                self.print(&text)?;
            }
            ConsoleCommand::Help => self.print(display::HELP)?,
            ConsoleCommand::Unknown(line) => self.print(&display::render_unknown(&line))?,
            ConsoleCommand::Quit => {}
        }
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}").map_err(RotaError::from)?;
        self.out.flush().map_err(RotaError::from)
    }
}
