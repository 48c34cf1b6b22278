//! Filesystem-based asset storage implementation.
//!
//! Each namespace is a directory under a common root; each asset is a file
//! named by the admission pipeline. The filesystem is the system of record:
//! there are no sidecar metadata files.

use crate::{AssetStore, ListedEntry, StoredAsset};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use stowage_core::{AssetRecord, Namespace};
use stowage_error::{StorageError, StorageErrorKind, StowageResult};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use uuid::Uuid;

/// Filesystem storage backend.
///
/// Stores assets as `{root}/{namespace}/{name}`.
///
/// # Example Structure
///
/// ```text
/// uploads/
/// └── avatars/
///     ├── avatar-42-1700000000000-518320977.png
///     ├── avatar-7-1700000360000-9203114.jpg
///     └── .avatar-9-1700000400000-77.png.3f2a...partial   (write in progress)
/// ```
///
/// # Features
///
/// - **Lazy namespaces**: directories are created on first admission, never by a listing
/// - **Atomic writes**: temp file + rename in the same directory
/// - **Hidden temp files**: in-flight writes start with `.` and never clash with generated names
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    root: PathBuf,
}

impl FileSystemStore {
    /// Create a filesystem store rooted at `root`.
    ///
    /// No directories are created until a namespace is first written to.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of a namespace.
    pub fn namespace_dir(&self, namespace: &Namespace) -> PathBuf {
        self.root.join(namespace.relative_path())
    }

    /// Resolve `name` inside a namespace directory.
    ///
    /// Names must be a single path component. Hidden names are reserved for
    /// temporary files and are only accepted when `allow_hidden` is set.
    #[track_caller]
    fn asset_path(
        &self,
        namespace: &Namespace,
        name: &str,
        allow_hidden: bool,
    ) -> Result<PathBuf, StorageError> {
        let single_component = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\', '\0']);
        if !single_component || (!allow_hidden && name.starts_with('.')) {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(format!(
                "{}/{}",
                namespace, name
            ))));
        }
        Ok(self.namespace_dir(namespace).join(name))
    }

    fn temp_path(path: &Path, name: &str) -> PathBuf {
        path.with_file_name(format!(".{}.{}.partial", name, Uuid::new_v4().simple()))
    }

    /// Move a finished temp file onto its final name.
    async fn commit(temp_path: &Path, path: &Path) -> Result<(), StorageError> {
        if let Err(e) = tokio::fs::rename(temp_path, path).await {
            Self::discard(temp_path).await;
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            ))));
        }
        Ok(())
    }

    /// Best-effort removal of an abandoned temp file.
    async fn discard(temp_path: &Path) {
        match tokio::fs::remove_file(temp_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %temp_path.display(),
                error = %e,
                "Failed to remove temporary file"
            ),
        }
    }

    async fn write_stream(
        temp_path: &Path,
        reader: &mut (dyn AsyncRead + Unpin + Send),
        limit: u64,
    ) -> Result<u64, StorageError> {
        let write_err = |e: std::io::Error| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        };

        let mut file = tokio::fs::File::create(temp_path).await.map_err(write_err)?;
        // One byte past the limit is enough to know the payload is too large.
        let mut limited = reader.take(limit.saturating_add(1));
        let written = tokio::io::copy(&mut limited, &mut file)
            .await
            .map_err(write_err)?;
        if written > limit {
            return Err(StorageError::new(StorageErrorKind::LimitExceeded { limit }));
        }
        file.flush().await.map_err(write_err)?;
        file.sync_all().await.map_err(write_err)?;
        Ok(written)
    }

    async fn read_entry(entry: &tokio::fs::DirEntry) -> Option<ListedEntry> {
        let file_name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                return Some(ListedEntry::Unreadable {
                    file_name: raw.to_string_lossy().into_owned(),
                    error: StorageError::new(StorageErrorKind::InvalidPath(format!(
                        "non UTF-8 file name: {}",
                        entry.path().display()
                    ))),
                });
            }
        };

        let metadata_err = |e: std::io::Error| {
            StorageError::new(StorageErrorKind::Metadata(format!(
                "{}: {}",
                entry.path().display(),
                e
            )))
        };

        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            // Removed between listing and stat.
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                return Some(ListedEntry::Unreadable {
                    file_name,
                    error: metadata_err(e),
                });
            }
        };

        if !metadata.is_file() {
            tracing::debug!(entry = %file_name, "Skipping non-file entry");
            return None;
        }

        match metadata.modified() {
            Ok(modified) => Some(ListedEntry::Asset(AssetRecord::new(
                file_name,
                metadata.len(),
                modified,
            ))),
            Err(e) => Some(ListedEntry::Unreadable {
                file_name,
                error: metadata_err(e),
            }),
        }
    }
}

#[async_trait::async_trait]
impl AssetStore for FileSystemStore {
    fn backend(&self) -> &'static str {
        "filesystem"
    }

    fn locate(&self, namespace: &Namespace) -> String {
        self.namespace_dir(namespace).to_string_lossy().into_owned()
    }

    #[tracing::instrument(skip(self), fields(namespace = %namespace))]
    async fn ensure_namespace(&self, namespace: &Namespace) -> StowageResult<String> {
        let dir = self.namespace_dir(namespace);

        // create_dir_all already treats a directory created by a racing caller as success.
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        })?;

        tracing::debug!(path = %dir.display(), "Namespace ready");
        Ok(dir.to_string_lossy().into_owned())
    }

    async fn contains(&self, namespace: &Namespace, name: &str) -> StowageResult<bool> {
        let path = self.asset_path(namespace, name, true)?;
        tokio::fs::try_exists(&path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::Metadata(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()
        })
    }

    #[tracing::instrument(skip(self, data), fields(namespace = %namespace, size = data.len()))]
    async fn put(
        &self,
        namespace: &Namespace,
        name: &str,
        data: &[u8],
    ) -> StowageResult<StoredAsset> {
        let path = self.asset_path(namespace, name, false)?;
        let temp_path = Self::temp_path(&path, name);

        if let Err(e) = tokio::fs::write(&temp_path, data).await {
            Self::discard(&temp_path).await;
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
            .into());
        }
        Self::commit(&temp_path, &path).await?;

        tracing::info!(
            asset = %name,
            path = %path.display(),
            size = data.len(),
            "Stored asset"
        );

        Ok(StoredAsset::new(
            namespace.clone(),
            name,
            path.to_string_lossy(),
            data.len() as u64,
        ))
    }

    #[tracing::instrument(skip(self, reader), fields(namespace = %namespace))]
    async fn put_stream(
        &self,
        namespace: &Namespace,
        name: &str,
        reader: &mut (dyn AsyncRead + Unpin + Send),
        limit: u64,
    ) -> StowageResult<StoredAsset> {
        let path = self.asset_path(namespace, name, false)?;
        let temp_path = Self::temp_path(&path, name);

        let written = match Self::write_stream(&temp_path, reader, limit).await {
            Ok(written) => written,
            Err(e) => {
                Self::discard(&temp_path).await;
                return Err(e.into());
            }
        };
        Self::commit(&temp_path, &path).await?;

        tracing::info!(
            asset = %name,
            path = %path.display(),
            size = written,
            "Stored streamed asset"
        );

        Ok(StoredAsset::new(
            namespace.clone(),
            name,
            path.to_string_lossy(),
            written,
        ))
    }

    #[tracing::instrument(skip(self), fields(namespace = %namespace))]
    async fn list(&self, namespace: &Namespace) -> StowageResult<Option<Vec<ListedEntry>>> {
        let dir = self.namespace_dir(namespace);
        let read_err = |e: std::io::Error| {
            StorageError::new(StorageErrorKind::DirectoryRead(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        };

        let mut read_dir = match tokio::fs::read_dir(&dir).await {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %dir.display(), "Namespace does not exist");
                return Ok(None);
            }
            Err(e) => return Err(read_err(e).into()),
        };

        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await.map_err(read_err)? {
            if let Some(listed) = Self::read_entry(&entry).await {
                entries.push(listed);
            }
        }

        tracing::debug!(count = entries.len(), "Listed namespace");
        Ok(Some(entries))
    }

    #[tracing::instrument(skip(self), fields(namespace = %namespace))]
    async fn remove(&self, namespace: &Namespace, name: &str) -> StowageResult<bool> {
        let path = self.asset_path(namespace, name, true)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed asset file");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::new(StorageErrorKind::Delete(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }
}
