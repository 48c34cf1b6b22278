//! Errors raised by storage backends.

/// What went wrong while touching the storage backend.
///
/// The payload names the path or asset involved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// A namespace directory could not be created
    #[display("Cannot create namespace directory {}", _0)]
    DirectoryCreation(String),
    /// A namespace directory could not be listed
    #[display("Cannot list namespace directory {}", _0)]
    DirectoryRead(String),
    /// Asset bytes could not be written or committed
    #[display("Cannot write asset {}", _0)]
    FileWrite(String),
    /// Source bytes could not be read
    #[display("Cannot read {}", _0)]
    FileRead(String),
    /// Size or modification time could not be read
    #[display("Cannot stat {}", _0)]
    Metadata(String),
    /// An asset could not be removed
    #[display("Cannot delete asset {}", _0)]
    Delete(String),
    /// No asset exists under the given name
    #[display("Asset not found: {}", _0)]
    NotFound(String),
    /// A name that is not a single safe path component
    #[display("Unsafe asset path {}", _0)]
    InvalidPath(String),
    /// A generated name is already taken in its namespace
    #[display("Asset name already in use: {}", _0)]
    NameCollision(String),
    /// More bytes arrived than the write was allowed to accept
    #[display("Payload exceeds limit of {} bytes", limit)]
    LimitExceeded {
        /// Maximum number of bytes the write accepts
        limit: u64,
    },
}

/// A storage failure and the source location that raised it.
///
/// # Examples
///
/// ```
/// use stowage_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("avatars/a.png".to_string()));
/// assert!(err.to_string().contains("not found"));
/// assert!(err.to_string().starts_with("Storage failure"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage failure: {} ({}:{})", kind, file, line)]
pub struct StorageError {
    /// What failed
    pub kind: StorageErrorKind,
    /// Source line that raised the error
    pub line: u32,
    /// Source file that raised the error
    pub file: &'static str,
}

impl StorageError {
    /// Wrap `kind`, recording the caller's location.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let caller = std::panic::Location::caller();
        Self {
            kind,
            line: caller.line(),
            file: caller.file(),
        }
    }
}
