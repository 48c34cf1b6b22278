//! Tests for scheduled sweeping.

use std::fs::File;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use stowage_core::{Namespace, RetentionPolicy};
use stowage_retention::Sweeper;
use stowage_storage::FileSystemStore;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn short_policy() -> RetentionPolicy {
    RetentionPolicy::new(Duration::from_secs(60), Duration::from_secs(1))
}

fn sweeper(root: &std::path::Path, policy: RetentionPolicy) -> Sweeper {
    Sweeper::new(
        Arc::new(FileSystemStore::new(root)),
        Namespace::new("avatars").unwrap(),
        policy,
    )
    .unwrap()
}

#[tokio::test]
async fn test_start_up_sweep_runs_immediately() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("avatars");
    std::fs::create_dir_all(&dir).unwrap();
    let stale = dir.join("stale.png");
    std::fs::write(&stale, b"x").unwrap();
    File::options()
        .write(true)
        .open(&stale)
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(600))
        .unwrap();

    let handle = sweeper(temp_dir.path(), short_policy().with_sweep_on_start(true))
        .spawn(CancellationToken::new());
    let mut reports = handle.reports();

    tokio::time::timeout(Duration::from_secs(5), reports.changed())
        .await
        .expect("sweep within timeout")
        .unwrap();
    let report = reports.borrow().clone().unwrap();
    assert_eq!(report.deleted(), &vec!["stale.png".to_string()]);
    assert!(!stale.exists());

    handle.shutdown().await;
}

#[tokio::test]
async fn test_scheduled_sweep_runs_after_one_interval() {
    let temp_dir = TempDir::new().unwrap();
    let handle = sweeper(temp_dir.path(), short_policy()).spawn(CancellationToken::new());
    let mut reports = handle.reports();

    assert!(reports.borrow().is_none());
    tokio::time::timeout(Duration::from_secs(5), reports.changed())
        .await
        .expect("sweep within timeout")
        .unwrap();
    assert!(reports.borrow().as_ref().unwrap().namespace_absent());

    handle.shutdown().await;
}

#[tokio::test]
async fn test_cancelling_the_token_stops_the_sweeper() {
    let temp_dir = TempDir::new().unwrap();
    let token = CancellationToken::new();
    let handle = sweeper(temp_dir.path(), RetentionPolicy::default()).spawn(token.clone());
    assert!(!handle.is_finished());

    token.cancel();
    tokio::time::timeout(Duration::from_secs(5), async {
        while !handle.is_finished() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("sweeper exits after cancellation");
}

#[tokio::test]
async fn test_shutdown_joins_without_waiting_for_the_interval() {
    let temp_dir = TempDir::new().unwrap();
    // An hour-long interval: shutdown must not wait for the next tick.
    let handle =
        sweeper(temp_dir.path(), RetentionPolicy::default()).spawn(CancellationToken::new());

    tokio::time::timeout(Duration::from_secs(5), handle.shutdown())
        .await
        .expect("shutdown completes promptly");
}
