//! Core data types for Stowage.
//!
//! This crate holds the pure, I/O-free building blocks shared by the storage and
//! retention crates: who owns an asset, where it lives, what it is called, and
//! which policies govern its admission and reclamation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filter;
mod name;
mod namespace;
mod owner;
mod policy;
mod record;
mod upload;

pub use filter::AdmissionFilter;
pub use name::{AssetName, Extension, NONCE_MAX, NameGenerator, extension_of};
pub use namespace::Namespace;
pub use owner::OwnerId;
pub use policy::{
    AdmissionPolicy, DEFAULT_ALLOWED_TYPE_PREFIX, DEFAULT_MAX_AGE_SECONDS, DEFAULT_MAX_BYTES,
    DEFAULT_SWEEP_INTERVAL_SECONDS, MAX_SWEEP_INTERVAL_SECONDS, RetentionPolicy,
};
pub use record::AssetRecord;
pub use upload::Upload;
