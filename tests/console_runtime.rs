// tests/console_runtime.rs

mod common;
use crate::common::{init_tracing, with_timeout, TEAM};

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use rota::console::{spawn_line_reader, ConsoleCommand, ConsoleEvent, ConsoleRuntime};
use rota::engine::{CursorMode, Session};
use rota_test_utils::fakes::{FakeRosterStore, RecordingAnnotator};
use rota_test_utils::output::SharedBuffer;
use tokio::sync::mpsc;

type TestResult = Result<(), Box<dyn Error>>;

struct Harness {
    runtime: ConsoleRuntime<SharedBuffer>,
    tx: mpsc::Sender<ConsoleEvent>,
    out: SharedBuffer,
}

fn harness(annotator: RecordingAnnotator) -> Harness {
    let session = Session::new(Arc::new(FakeRosterStore::new(&TEAM)), CursorMode::Local);
    let (tx, rx) = mpsc::channel(64);
    let out = SharedBuffer::new();
    let runtime = ConsoleRuntime::new(session, Arc::new(annotator), rx, tx.clone(), out.clone());
    Harness { runtime, tx, out }
}

async fn send_lines(tx: &mpsc::Sender<ConsoleEvent>, lines: &[&str]) -> TestResult {
    for line in lines {
        let cmd: ConsoleCommand = line.parse()?;
        tx.send(ConsoleEvent::Command(cmd)).await?;
    }
    Ok(())
}

async fn wait_for(out: &SharedBuffer, needle: &str) {
    while !out.contents().contains(needle) {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn prints_the_team_scenario() -> TestResult {
    with_timeout(async {
        init_tracing();
        let Harness { runtime, tx, out } = harness(RecordingAnnotator::silent());

        send_lines(&tx, &["reload", "assign 2", "3", "undo", "6", "quit"]).await?;
        let session = runtime.run().await?;

        let text = out.contents();
        assert!(text.contains("loaded 5 entries; next start #1"), "{text}");
        assert!(text.contains("assigned 2 (next start #3):\n    1. Kim  (#1)\n    2. Lee  (#2)"), "{text}");
        assert!(text.contains("assigned 3 (next start #1):"), "{text}");
        assert!(text.contains("last assignment undone; next start #3"), "{text}");
        assert!(text.contains("assigned 6 (next start #4):"), "{text}");
        assert!(text.contains("    6. Park  (#3)"), "{text}");
        assert_eq!(session.engine().cursor(), 3);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn errors_are_printed_and_the_loop_continues() -> TestResult {
    with_timeout(async {
        init_tracing();
        let Harness { runtime, tx, out } = harness(RecordingAnnotator::silent());

        send_lines(
            &tx,
            &["2", "reload", "x", "assign", "undo", "undo", "frobnicate", "status", "quit"],
        )
        .await?;
        let session = runtime.run().await?;

        let text = out.contents();
        assert!(text.contains("error: Invalid request: roster has not been loaded"), "{text}");
        assert!(text.contains("error: Invalid request"), "{text}");
        assert!(text.contains("error: Nothing to undo"), "{text}");
        assert!(text.contains("unknown command: frobnicate"), "{text}");
        assert!(text.contains("cursor: local\nroster: 5 entries\nnext start: #1\nundo: none"), "{text}");
        assert_eq!(session.engine().cursor(), 0);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn roster_listing_marks_the_next_start() -> TestResult {
    with_timeout(async {
        init_tracing();
        let Harness { runtime, tx, out } = harness(RecordingAnnotator::silent());

        send_lines(&tx, &["roster", "reload", "2", "list", "quit"]).await?;
        runtime.run().await?;

        let text = out.contents();
        assert!(text.contains("roster: not loaded"), "{text}");
        assert!(text.contains(" > #3   Park"), "{text}");
        assert!(text.contains("   #1   Kim"), "{text}");
        Ok(())
    })
    .await
}

#[tokio::test]
async fn annotation_follows_its_batch() -> TestResult {
    with_timeout(async {
        init_tracing();
        let annotator = RecordingAnnotator::answering("Kim and Lee pair well");
        let Harness { runtime, tx, out } = harness(annotator.clone());
        let console = tokio::spawn(runtime.run());

        send_lines(&tx, &["reload", "2"]).await?;
        wait_for(&out, "insight: Kim and Lee pair well").await;

        send_lines(&tx, &["quit"]).await?;
        console.await??;

        assert_eq!(annotator.seen(), vec![vec!["Kim".to_string(), "Lee".to_string()]]);
        let text = out.contents();
        let batch_at = text.find("assigned 2").ok_or("batch missing")?;
        let insight_at = text.find("insight:").ok_or("insight missing")?;
        assert!(batch_at < insight_at);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn stale_annotation_is_dropped_after_undo() -> TestResult {
    with_timeout(async {
        init_tracing();
        let annotator =
            RecordingAnnotator::answering("too late").with_delay(Duration::from_millis(100));
        let Harness { runtime, tx, out } = harness(annotator.clone());
        let console = tokio::spawn(runtime.run());

        send_lines(&tx, &["reload", "2", "undo"]).await?;
        wait_for(&out, "last assignment undone").await;
        tokio::time::sleep(Duration::from_millis(300)).await;

        send_lines(&tx, &["quit"]).await?;
        console.await??;

        assert_eq!(annotator.seen().len(), 1);
        assert!(!out.contents().contains("insight:"), "{}", out.contents());
        Ok(())
    })
    .await
}

#[tokio::test]
async fn line_reader_drives_the_console_until_end_of_input() -> TestResult {
    with_timeout(async {
        init_tracing();
        let Harness { runtime, tx, out } = harness(RecordingAnnotator::silent());

        let script: &'static [u8] = b"reload\n\n  3  \nstatus\n";
        let reader = spawn_line_reader(script, tx);
        let session = runtime.run().await?;
        reader.await?;

        let text = out.contents();
        assert!(text.contains("assigned 3 (next start #4):"), "{text}");
        assert!(text.contains("last batch: Kim, Lee, Park"), "{text}");
        assert_eq!(session.engine().cursor(), 3);
        Ok(())
    })
    .await
}
