//! Tests for assembling and running the upload lifecycle.

use std::fs::File;
use std::time::{Duration, SystemTime};
use stowage::{RejectionReason, Stowage, StowageConfig, Upload};
use tempfile::TempDir;

fn stowage_in(temp_dir: &TempDir) -> Stowage {
    let config = StowageConfig::bundled()
        .unwrap()
        .with_root(temp_dir.path());
    Stowage::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_from_config_creates_nothing_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let stowage = stowage_in(&temp_dir);

    let names: Vec<_> = stowage.namespaces().map(|ns| ns.to_string()).collect();
    assert_eq!(names, vec!["avatars"]);
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_admit_then_sweep() {
    let temp_dir = TempDir::new().unwrap();
    let stowage = stowage_in(&temp_dir);

    let upload = Upload::parse("42", "image/png", 4, "png").unwrap();
    let receipt = stowage
        .pipeline("avatars")
        .unwrap()
        .admit(&upload, b"\x89PNG")
        .await
        .unwrap();

    // Age the new asset past the default 24 hours.
    File::options()
        .write(true)
        .open(receipt.storage_path())
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(25 * 3_600))
        .unwrap();

    let reports = stowage.sweep_all().await.unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].deleted(), &vec![receipt.file_name()]);
}

#[tokio::test]
async fn test_unknown_namespace_is_an_invalid_request() {
    let temp_dir = TempDir::new().unwrap();
    let stowage = stowage_in(&temp_dir);

    let err = stowage.pipeline("banners").unwrap_err();
    assert_eq!(err.rejection_reason(), RejectionReason::InvalidRequest);
    assert!(stowage.sweeper("banners").is_err());
}

#[tokio::test]
async fn test_retention_starts_and_shuts_down() {
    let temp_dir = TempDir::new().unwrap();
    let stowage = stowage_in(&temp_dir);

    let retention = stowage.start_retention();
    assert_eq!(retention.handles().len(), 1);
    assert!(retention.handles().iter().all(|h| !h.is_finished()));

    tokio::time::timeout(Duration::from_secs(5), retention.shutdown())
        .await
        .expect("retention stops promptly");
}
