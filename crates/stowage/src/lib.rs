//! Stowage: upload admission and age-based retention for user assets.
//!
//! Stowage accepts user-submitted files (avatars, attachments) into named
//! namespaces on the local filesystem, and reclaims them once they are older
//! than a configured age.
//!
//! # Features
//!
//! - **Admission**: content-type and size checks before anything touches disk
//! - **Collision-resistant names**: `<prefix>-<owner>-<millis>-<nonce>.<ext>`
//! - **Atomic placement**: no reader ever sees a partially written asset
//! - **Retention**: a cancellable background sweeper per namespace
//! - **Layered configuration**: bundled defaults, user files, environment
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use stowage::{Stowage, StowageConfig, Upload};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let stowage = Stowage::from_config(&StowageConfig::load()?)?;
//!     let retention = stowage.start_retention();
//!
//!     let upload = Upload::parse("42", "image/png", 4, "png")?;
//!     let receipt = stowage.pipeline("avatars")?.admit(&upload, b"\x89PNG").await?;
//!     println!("stored at {}", receipt.storage_path());
//!
//!     retention.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `stowage_error` - Error types and rejection reasons
//! - `stowage_core` - Owners, namespaces, names, policies, admission filter
//! - `stowage_storage` - Storage backend and admission pipeline
//! - `stowage_retention` - Retention sweeper
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod lifecycle;
mod observability;

pub use config::{NamespaceConfig, StorageConfig, StowageConfig};
pub use lifecycle::{RetentionHandles, Stowage};
pub use observability::{ObservabilityConfig, init_observability};

pub use stowage_core::*;
pub use stowage_error::*;
pub use stowage_retention::*;
pub use stowage_storage::*;
