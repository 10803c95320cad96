// src/console/input.rs

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::console::{ConsoleCommand, ConsoleEvent};

/// Read commands line by line from `reader` and forward them to the console.
///
/// Blank lines are ignored. End of input (or a read error) sends
/// `ShutdownRequested`, so piping a script into `rota` runs it and exits.
pub fn spawn_line_reader<R>(reader: R, console_tx: mpsc::Sender<ConsoleEvent>) -> JoinHandle<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = reader.lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let cmd = line
                        .parse::<ConsoleCommand>()
                        .unwrap_or_else(|never| match never {});
                    debug!(?cmd, "read console command");
                    if console_tx.send(ConsoleEvent::Command(cmd)).await.is_err() {
                        debug!("console closed; stopping input reader");
                        return;
                    }
                }
                Ok(None) => {
                    debug!("end of input");
                    break;
                }
                Err(err) => {
                    warn!(error = %err, "failed to read console input");
                    break;
                }
            }
        }

        let _ = console_tx.send(ConsoleEvent::ShutdownRequested).await;
    })
}
