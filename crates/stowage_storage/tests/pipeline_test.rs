//! Tests for the upload admission pipeline.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use stowage_core::{AdmissionFilter, AdmissionPolicy, AssetName, NameGenerator, Namespace, Upload};
use stowage_error::{AdmissionErrorKind, RejectionReason, StorageErrorKind, StowageErrorKind};
use stowage_storage::{AssetStore, FileSystemStore, UploadPipeline};
use tempfile::TempDir;

fn pipeline(root: &Path, policy: AdmissionPolicy) -> UploadPipeline {
    UploadPipeline::new(
        Arc::new(FileSystemStore::new(root)),
        Namespace::new("avatars").unwrap(),
        NameGenerator::new("avatar").unwrap(),
        AdmissionFilter::new(policy),
    )
}

fn files_in(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[tokio::test]
async fn test_png_is_admitted_under_generated_name() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = pipeline(temp_dir.path(), AdmissionPolicy::default());
    let payload = vec![0u8; 1_000_000];
    let upload = Upload::parse("42", "image/png", payload.len() as u64, "png").unwrap();

    let receipt = pipeline.admit(&upload, &payload).await.unwrap();

    let file_name = receipt.file_name();
    let parsed = AssetName::parse(&file_name).unwrap();
    assert_eq!(parsed.prefix(), "avatar");
    assert_eq!(parsed.owner().as_str(), "42");
    assert_eq!(parsed.extension().as_str(), "png");
    assert_eq!(*receipt.size_bytes(), 1_000_000);

    let stored = temp_dir.path().join("avatars").join(&file_name);
    assert_eq!(Path::new(receipt.storage_path()), stored);
    assert_eq!(std::fs::metadata(&stored).unwrap().len(), 1_000_000);
}

#[tokio::test]
async fn test_pdf_is_rejected_before_anything_is_created() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = pipeline(temp_dir.path(), AdmissionPolicy::default());
    let upload = Upload::parse("7", "application/pdf", 10_000, "pdf").unwrap();

    let err = pipeline.admit(&upload, &[0u8; 10_000]).await.unwrap_err();

    assert_eq!(err.rejection_reason(), RejectionReason::InvalidType);
    assert!(err.is_rejection());
    assert!(!temp_dir.path().join("avatars").exists());
}

#[tokio::test]
async fn test_declared_oversize_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = pipeline(temp_dir.path(), AdmissionPolicy::default().with_max_bytes(100));
    let upload = Upload::parse("42", "image/png", 101, "png").unwrap();

    let err = pipeline.admit(&upload, &[0u8; 101]).await.unwrap_err();

    assert_eq!(err.rejection_reason(), RejectionReason::SizeExceeded);
    assert!(files_in(&temp_dir.path().join("avatars")).is_empty());
}

#[tokio::test]
async fn test_understated_buffer_size_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = pipeline(temp_dir.path(), AdmissionPolicy::default().with_max_bytes(100));
    let upload = Upload::parse("42", "image/png", 10, "png").unwrap();

    let err = pipeline.admit(&upload, &[0u8; 500]).await.unwrap_err();

    match err.kind() {
        StowageErrorKind::Admission(e) => assert_eq!(
            e.kind,
            AdmissionErrorKind::SizeExceeded {
                size: 500,
                limit: 100
            }
        ),
        other => panic!("unexpected error {other}"),
    }
    assert!(files_in(&temp_dir.path().join("avatars")).is_empty());
}

#[tokio::test]
async fn test_understated_stream_is_cut_off() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = pipeline(temp_dir.path(), AdmissionPolicy::default().with_max_bytes(100));
    let upload = Upload::parse("42", "image/png", 10, "png").unwrap();
    let payload = vec![1u8; 4096];

    let err = pipeline
        .admit_stream(&upload, payload.as_slice())
        .await
        .unwrap_err();

    match err.kind() {
        StowageErrorKind::Admission(e) => assert_eq!(
            e.kind,
            AdmissionErrorKind::SizeExceeded {
                size: 101,
                limit: 100
            }
        ),
        other => panic!("unexpected error {other}"),
    }
    // The namespace exists by now, but holds neither the asset nor a temp file.
    assert!(files_in(&temp_dir.path().join("avatars")).is_empty());
}

#[tokio::test]
async fn test_stream_within_limit_is_admitted() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = pipeline(temp_dir.path(), AdmissionPolicy::default());
    let upload = Upload::parse("9", "image/webp", 2048, "webp").unwrap();
    let payload = vec![3u8; 2048];

    let receipt = pipeline
        .admit_stream(&upload, payload.as_slice())
        .await
        .unwrap();

    assert_eq!(*receipt.size_bytes(), 2048);
    assert_eq!(std::fs::read(receipt.storage_path()).unwrap(), payload);
}

#[tokio::test]
async fn test_concurrent_admissions_get_distinct_names() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = pipeline(temp_dir.path(), AdmissionPolicy::default());

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let pipeline = pipeline.clone();
            tokio::spawn(async move {
                let upload = Upload::parse("42", "image/jpeg", 16, "jpg").unwrap();
                pipeline.admit(&upload, &[5u8; 16]).await
            })
        })
        .collect();

    let mut names = HashSet::new();
    for handle in handles {
        let receipt = handle.await.unwrap().unwrap();
        assert!(names.insert(receipt.file_name()));
    }

    let on_disk: HashSet<String> = files_in(&temp_dir.path().join("avatars")).into_iter().collect();
    assert_eq!(on_disk, names);
}

#[tokio::test]
async fn test_existing_namespace_is_reused() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir_all(temp_dir.path().join("avatars")).unwrap();
    std::fs::write(temp_dir.path().join("avatars/previous.png"), b"old").unwrap();
    let pipeline = pipeline(temp_dir.path(), AdmissionPolicy::default());

    let upload = Upload::parse("42", "image/png", 3, "png").unwrap();
    pipeline.admit(&upload, b"new").await.unwrap();

    assert_eq!(files_in(&temp_dir.path().join("avatars")).len(), 2);
}

#[tokio::test]
async fn test_unwritable_namespace_is_a_storage_error() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("avatars"), b"in the way").unwrap();
    let pipeline = pipeline(temp_dir.path(), AdmissionPolicy::default());

    let upload = Upload::parse("42", "image/png", 3, "png").unwrap();
    let err = pipeline.admit(&upload, b"img").await.unwrap_err();

    assert_eq!(err.rejection_reason(), RejectionReason::StorageError);
    assert!(!err.is_rejection());
}

/// Store whose every name is already taken.
#[derive(Clone)]
struct OccupiedStore(FileSystemStore);

#[async_trait::async_trait]
impl AssetStore for OccupiedStore {
    fn backend(&self) -> &'static str {
        "occupied"
    }

    fn locate(&self, namespace: &Namespace) -> String {
        self.0.locate(namespace)
    }

    async fn ensure_namespace(
        &self,
        namespace: &Namespace,
    ) -> stowage_error::StowageResult<String> {
        self.0.ensure_namespace(namespace).await
    }

    async fn contains(&self, _: &Namespace, _: &str) -> stowage_error::StowageResult<bool> {
        Ok(true)
    }

    async fn put(
        &self,
        namespace: &Namespace,
        name: &str,
        data: &[u8],
    ) -> stowage_error::StowageResult<stowage_storage::StoredAsset> {
        self.0.put(namespace, name, data).await
    }

    async fn put_stream(
        &self,
        namespace: &Namespace,
        name: &str,
        reader: &mut (dyn tokio::io::AsyncRead + Unpin + Send),
        limit: u64,
    ) -> stowage_error::StowageResult<stowage_storage::StoredAsset> {
        self.0.put_stream(namespace, name, reader, limit).await
    }

    async fn list(
        &self,
        namespace: &Namespace,
    ) -> stowage_error::StowageResult<Option<Vec<stowage_storage::ListedEntry>>> {
        self.0.list(namespace).await
    }

    async fn remove(
        &self,
        namespace: &Namespace,
        name: &str,
    ) -> stowage_error::StowageResult<bool> {
        self.0.remove(namespace, name).await
    }
}

#[tokio::test]
async fn test_name_collision_is_reported_when_verification_is_enabled() {
    let temp_dir = TempDir::new().unwrap();
    let store = OccupiedStore(FileSystemStore::new(temp_dir.path()));
    let upload = Upload::parse("42", "image/png", 3, "png").unwrap();

    let verifying = UploadPipeline::new(
        Arc::new(store.clone()),
        Namespace::new("avatars").unwrap(),
        NameGenerator::new("avatar").unwrap(),
        AdmissionFilter::new(AdmissionPolicy::default().with_verify_unique_names(true)),
    );
    let err = verifying.admit(&upload, b"img").await.unwrap_err();
    assert!(matches!(
        err.kind(),
        StowageErrorKind::Storage(e) if matches!(e.kind, StorageErrorKind::NameCollision(_))
    ));
    assert!(files_in(&temp_dir.path().join("avatars")).is_empty());

    // Without verification the store is never asked.
    let trusting = UploadPipeline::new(
        Arc::new(store),
        Namespace::new("avatars").unwrap(),
        NameGenerator::new("avatar").unwrap(),
        AdmissionFilter::default(),
    );
    trusting.admit(&upload, b"img").await.unwrap();
    assert_eq!(files_in(&temp_dir.path().join("avatars")).len(), 1);
}
