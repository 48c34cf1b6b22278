//! Inbound upload descriptors.

use crate::{Extension, OwnerId};
use stowage_error::AdmissionError;

/// Everything the admission pipeline needs to know about an upload except its bytes.
///
/// The owner is assumed to be verified by the caller; Stowage performs no
/// identity or role checks.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct Upload {
    /// Owner of the asset
    owner: OwnerId,
    /// Declared MIME type
    mime_type: String,
    /// Declared size in bytes
    byte_size: u64,
    /// Original extension
    extension: Extension,
}

impl Upload {
    /// Describe an upload from already validated parts.
    pub fn new(
        owner: OwnerId,
        mime_type: impl Into<String>,
        byte_size: u64,
        extension: Extension,
    ) -> Self {
        Self {
            owner,
            mime_type: mime_type.into(),
            byte_size,
            extension,
        }
    }

    /// Describe an upload from raw boundary values.
    ///
    /// # Errors
    ///
    /// Fails with an invalid-owner or invalid-extension admission error.
    ///
    /// # Examples
    ///
    /// ```
    /// use stowage_core::Upload;
    ///
    /// let upload = Upload::parse("42", "image/png", 1_000_000, "png")?;
    /// assert_eq!(upload.owner().as_str(), "42");
    /// assert!(Upload::parse("4/2", "image/png", 1, "png").is_err());
    /// # Ok::<(), stowage_error::AdmissionError>(())
    /// ```
    #[track_caller]
    pub fn parse(
        owner: &str,
        mime_type: impl Into<String>,
        byte_size: u64,
        extension: &str,
    ) -> Result<Self, AdmissionError> {
        Ok(Self::new(
            OwnerId::new(owner)?,
            mime_type,
            byte_size,
            Extension::new(extension)?,
        ))
    }
}
