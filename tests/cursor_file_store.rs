// tests/cursor_file_store.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::collections::BTreeSet;
use std::error::Error;

use rota::cursor::{CursorSnapshot, CursorStore, FileCursorStore};
use rota::errors::RotaError;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn missing_record_reads_as_zero() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = TempDir::new()?;
        let store = FileCursorStore::new(dir.path().join("cursor"));

        assert_eq!(store.fetch_cursor().await?, CursorSnapshot::default());
        assert!(!store.path().exists());
        Ok(())
    })
    .await
}

#[tokio::test]
async fn independent_stores_share_the_record() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = TempDir::new()?;
        let path = dir.path().join(".rota").join("cursor");
        let first = FileCursorStore::new(&path);
        let second = FileCursorStore::new(&path);

        first.write_cursor(3, None).await?;
        assert!(path.exists(), "parent directory should be created");
        assert_eq!(
            second.fetch_cursor().await?,
            CursorSnapshot { value: 3, version: 1 }
        );

        second.write_cursor(1, Some(1)).await?;
        assert_eq!(
            first.fetch_cursor().await?,
            CursorSnapshot { value: 1, version: 2 }
        );
        assert_eq!(std::fs::read_to_string(&path)?, "1 2\n");
        Ok(())
    })
    .await
}

#[tokio::test]
async fn stale_expected_version_is_rejected() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = TempDir::new()?;
        let store = FileCursorStore::new(dir.path().join("cursor"));
        store.write_cursor(2, Some(0)).await?;

        match store.write_cursor(4, Some(0)).await {
            Err(RotaError::Persistence(msg)) => assert!(msg.contains("concurrently")),
            other => panic!("expected Persistence error, got {other:?}"),
        }
        assert_eq!(store.fetch_cursor().await?.value, 2);

        // Without a check the last writer wins.
        store.write_cursor(4, None).await?;
        assert_eq!(store.fetch_cursor().await?.value, 4);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn rewriting_the_same_value_keeps_the_version() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = TempDir::new()?;
        let store = FileCursorStore::new(dir.path().join("cursor"));

        store.write_cursor(2, None).await?;
        store.write_cursor(2, None).await?;
        assert_eq!(
            store.fetch_cursor().await?,
            CursorSnapshot { value: 2, version: 1 }
        );
        Ok(())
    })
    .await
}

#[tokio::test]
async fn legacy_record_without_version_is_accepted() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = TempDir::new()?;
        let path = dir.path().join("cursor");
        std::fs::write(&path, "7\n")?;

        let store = FileCursorStore::new(&path);
        assert_eq!(
            store.fetch_cursor().await?,
            CursorSnapshot { value: 7, version: 0 }
        );
        Ok(())
    })
    .await
}

#[tokio::test]
async fn malformed_record_is_a_fetch_error_and_blocks_writes() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = TempDir::new()?;
        let path = dir.path().join("cursor");
        std::fs::write(&path, "seven\n")?;
        let store = FileCursorStore::new(&path);

        match store.fetch_cursor().await {
            Err(RotaError::Fetch(msg)) => assert!(msg.contains("parsing cursor file")),
            other => panic!("expected Fetch error, got {other:?}"),
        }
        assert!(matches!(
            store.write_cursor(1, None).await,
            Err(RotaError::Persistence(_))
        ));
        assert_eq!(std::fs::read_to_string(&path)?, "seven\n");
        Ok(())
    })
    .await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_writers_in_one_process_all_succeed() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = TempDir::new()?;
        let path = dir.path().join(".rota").join("cursor");

        for round in 0..50u64 {
            let (a, b) = (round * 2 + 1, round * 2 + 2);
            let first = tokio::spawn({
                let store = FileCursorStore::new(&path);
                async move { store.write_cursor(a, None).await }
            });
            let second = tokio::spawn({
                let store = FileCursorStore::new(&path);
                async move { store.write_cursor(b, None).await }
            });
            first.await??;
            second.await??;

            let stored = FileCursorStore::new(&path).fetch_cursor().await?.value;
            assert!(stored == a || stored == b, "round {round}: stored {stored}");
        }

        // Only the record itself is left behind.
        let leftovers: BTreeSet<_> = std::fs::read_dir(path.parent().ok_or("no parent")?)?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect::<Result<_, _>>()?;
        assert_eq!(leftovers.len(), 1, "{leftovers:?}");
        Ok(())
    })
    .await
}
