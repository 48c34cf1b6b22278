//! Age-based retention for Stowage namespaces.
//!
//! A [`Sweeper`] deletes every asset in one namespace whose modification time
//! is older than the namespace's [`RetentionPolicy`](stowage_core::RetentionPolicy).
//! It can be run once on demand or spawned as a background task that sweeps on
//! a fixed interval until cancelled.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use stowage_core::{Namespace, RetentionPolicy};
//! use stowage_retention::Sweeper;
//! use stowage_storage::FileSystemStore;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sweeper = Sweeper::new(
//!     Arc::new(FileSystemStore::new("uploads")),
//!     Namespace::new("avatars")?,
//!     RetentionPolicy::default(),
//! )?;
//!
//! // One pass now.
//! let report = sweeper.sweep().await?;
//! println!("deleted {} assets", report.deleted().len());
//!
//! // Then hourly in the background.
//! let handle = sweeper.spawn(CancellationToken::new());
//! handle.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod handle;
mod report;
mod sweeper;

pub use handle::SweeperHandle;
pub use report::{SweepFailure, SweepReport};
pub use sweeper::Sweeper;
