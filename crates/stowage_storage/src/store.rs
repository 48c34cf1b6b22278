//! Storage trait definition.

use stowage_core::{AssetRecord, Namespace};
use stowage_error::{StorageError, StowageResult};
use tokio::io::AsyncRead;

/// Trait for pluggable asset storage backends.
///
/// The admission pipeline is the only writer and the retention sweeper the only
/// deleter; neither holds a lock, so implementations must keep every operation
/// safe under concurrent use.
#[async_trait::async_trait]
pub trait AssetStore: Send + Sync {
    /// Backend name (e.g. "filesystem").
    fn backend(&self) -> &'static str;

    /// Location of a namespace, without creating it.
    fn locate(&self, namespace: &Namespace) -> String;

    /// Make sure the namespace exists and return its location.
    ///
    /// Repeated or concurrent calls must all succeed.
    async fn ensure_namespace(&self, namespace: &Namespace) -> StowageResult<String>;

    /// Check whether `name` is taken in the namespace.
    async fn contains(&self, namespace: &Namespace, name: &str) -> StowageResult<bool>;

    /// Store a buffered asset under `name`.
    ///
    /// Either the asset exists in full under `name` afterwards, or nothing does.
    async fn put(&self, namespace: &Namespace, name: &str, data: &[u8])
    -> StowageResult<StoredAsset>;

    /// Store a streamed asset under `name`, accepting at most `limit` bytes.
    ///
    /// Reading more than `limit` bytes fails with
    /// [`StorageErrorKind::LimitExceeded`](stowage_error::StorageErrorKind::LimitExceeded)
    /// and leaves nothing behind.
    async fn put_stream(
        &self,
        namespace: &Namespace,
        name: &str,
        reader: &mut (dyn AsyncRead + Unpin + Send),
        limit: u64,
    ) -> StowageResult<StoredAsset>;

    /// List the assets of a namespace.
    ///
    /// Returns `None` when the namespace does not exist. Entries that cannot be
    /// inspected are reported individually instead of failing the listing.
    async fn list(&self, namespace: &Namespace) -> StowageResult<Option<Vec<ListedEntry>>>;

    /// Delete `name` from the namespace.
    ///
    /// Returns `false` if it was already gone.
    async fn remove(&self, namespace: &Namespace, name: &str) -> StowageResult<bool>;
}

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct StoredAsset {
    /// Namespace the asset was written to
    namespace: Namespace,
    /// Final name inside the namespace
    file_name: String,
    /// Backend-specific location of the asset
    storage_path: String,
    /// Number of bytes written
    size_bytes: u64,
}

impl StoredAsset {
    /// Describe a stored asset.
    pub fn new(
        namespace: Namespace,
        file_name: impl Into<String>,
        storage_path: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            namespace,
            file_name: file_name.into(),
            storage_path: storage_path.into(),
            size_bytes,
        }
    }
}

/// One entry of a namespace listing.
#[derive(Debug, Clone)]
pub enum ListedEntry {
    /// An asset whose metadata could be read
    Asset(AssetRecord),
    /// An entry whose metadata could not be read
    ///
    /// Names that are not valid UTF-8 land here on every listing. They cannot be
    /// passed to [`AssetStore::remove`] and so are never reclaimed.
    Unreadable {
        /// Name of the entry
        file_name: String,
        /// Why it could not be read
        error: StorageError,
    },
}
