//! Admit command handler.

use std::path::Path;
use stowage::{Extension, OwnerId, StorageError, StorageErrorKind, Stowage, StowageResult, Upload};
use tracing::instrument;

/// Stream `file` through the pipeline of `namespace`.
///
/// The declared size is the file's length on disk; the extension comes from
/// its name.
#[instrument(skip(stowage, file), fields(file = %file.display()))]
pub async fn admit_file(
    stowage: &Stowage,
    namespace: &str,
    owner: &str,
    mime: &str,
    file: &Path,
) -> StowageResult<()> {
    let pipeline = stowage.pipeline(namespace)?;

    let read_err = |e: std::io::Error| {
        StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", file.display(), e)))
    };
    let source = tokio::fs::File::open(file).await.map_err(read_err)?;
    let size = source.metadata().await.map_err(read_err)?.len();

    let upload = Upload::new(
        OwnerId::new(owner)?,
        mime,
        size,
        Extension::from_filename(&file.to_string_lossy())?,
    );

    match pipeline.admit_stream(&upload, source).await {
        Ok(receipt) => {
            println!("admitted {}", receipt.file_name());
            println!("  namespace: {}", receipt.namespace());
            println!("  path:      {}", receipt.storage_path());
            println!("  size:      {} bytes", receipt.size_bytes());
            Ok(())
        }
        Err(e) => {
            eprintln!("rejected: {}", e.rejection_reason());
            Err(e)
        }
    }
}
