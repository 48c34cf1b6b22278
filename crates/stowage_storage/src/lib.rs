//! Namespace-scoped asset storage and upload admission for Stowage.
//!
//! This crate owns the write path of the upload lifecycle: resolving a
//! namespace to a storage location, validating an upload against policy,
//! naming it, and placing its bytes atomically.
//!
//! # Features
//!
//! - **Pluggable backends**: the [`AssetStore`] trait hides the filesystem so a
//!   metadata-backed store can replace it without touching callers
//! - **Idempotent bootstrapping**: namespaces are created on demand and
//!   concurrent creation never fails
//! - **Atomic placement**: bytes go to a hidden temporary file and are renamed
//!   onto their final name, so no reader ever sees a truncated asset
//! - **Authoritative size ceiling**: streamed uploads are cut off as soon as
//!   they exceed the policy limit
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use stowage_core::{AdmissionFilter, NameGenerator, Namespace, Upload};
//! use stowage_storage::{FileSystemStore, UploadPipeline};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(FileSystemStore::new("/tmp/stowage"));
//! let pipeline = UploadPipeline::new(
//!     store,
//!     Namespace::new("avatars")?,
//!     NameGenerator::new("avatar")?,
//!     AdmissionFilter::default(),
//! );
//!
//! let upload = Upload::parse("42", "image/png", 4, "png")?;
//! let receipt = pipeline.admit(&upload, b"\x89PNG").await?;
//! println!("stored {}", receipt.storage_path());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod pipeline;
mod store;

pub use filesystem::FileSystemStore;
pub use pipeline::{AdmissionReceipt, AdmissionStage, UploadPipeline};
pub use store::{AssetStore, ListedEntry, StoredAsset};
pub use stowage_error::{StorageError, StorageErrorKind};
