// src/annotate/command.rs

//! Annotator backed by an external command.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::annotate::Annotator;
use crate::engine::AssignedBatch;

/// Runs `command` through the platform shell, writes the batch names as one
/// comma-separated line to its stdin, and uses trimmed stdout as the
/// annotation.
///
/// A non-zero exit, empty output or running past `timeout` all yield `None`.
/// The child is killed if it is still running when the timeout fires.
#[derive(Debug, Clone)]
pub struct CommandAnnotator {
    command: String,
    timeout: Duration,
}

impl CommandAnnotator {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }

    async fn run(&self, input: String) -> Result<Option<String>> {
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.command);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.command);
            c
        };

        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning annotator '{}'", self.command))?;

        if let Some(mut stdin) = child.stdin.take() {
            // The command may exit without reading its input.
            if let Err(err) = stdin.write_all(input.as_bytes()).await {
                debug!(error = %err, "annotator did not accept input");
            }
        }

        let output = child
            .wait_with_output()
            .await
            .context("waiting for annotator")?;

        if !output.status.success() {
            bail!("annotator exited with {}", output.status);
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!text.is_empty()).then_some(text))
    }
}

impl Annotator for CommandAnnotator {
    fn annotate<'a>(
        &'a self,
        batch: &'a AssignedBatch,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(async move {
            let input = format!("{}\n", batch.names().join(", "));
            info!(cmd = %self.command, entries = batch.len(), "requesting annotation");

            match tokio::time::timeout(self.timeout, self.run(input)).await {
                Ok(Ok(text)) => text,
                Ok(Err(err)) => {
                    warn!(error = %format!("{err:#}"), "annotation failed");
                    None
                }
                Err(_) => {
                    warn!(timeout = ?self.timeout, "annotation timed out");
                    None
                }
            }
        })
    }
}
