//! Error types for Stowage.
//!
//! This crate provides the foundation error types used throughout the Stowage workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Every error can be mapped to a client-facing [`RejectionReason`] so that a
//! boundary layer can report a precise message without inspecting internals.
//!
//! # Examples
//!
//! ```
//! use stowage_error::{AdmissionError, AdmissionErrorKind, RejectionReason, StowageResult};
//!
//! fn admit() -> StowageResult<()> {
//!     Err(AdmissionError::new(AdmissionErrorKind::InvalidType(
//!         "application/pdf".to_string(),
//!     )))?
//! }
//!
//! let err = admit().unwrap_err();
//! assert_eq!(err.rejection_reason(), RejectionReason::InvalidType);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod admission;
mod config;
mod error;
mod reason;
mod storage;

pub use admission::{AdmissionError, AdmissionErrorKind};
pub use config::ConfigError;
pub use error::{StowageError, StowageErrorKind, StowageResult};
pub use reason::RejectionReason;
pub use storage::{StorageError, StorageErrorKind};
