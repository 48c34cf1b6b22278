//! Admission (validation) error types.

/// Kinds of admission rejections.
///
/// Each kind names the rule that failed so the caller can report it precisely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum AdmissionErrorKind {
    /// Declared content type does not start with an allowed prefix
    #[display("Content type not allowed: {}", _0)]
    InvalidType(String),
    /// Payload is larger than the configured ceiling
    #[display("Payload of {} bytes exceeds limit of {} bytes", size, limit)]
    SizeExceeded {
        /// Size that was declared or observed
        size: u64,
        /// Configured ceiling
        limit: u64,
    },
    /// Owner identifier cannot be used in an asset name
    #[display("Invalid owner identifier: {:?}", _0)]
    InvalidOwner(String),
    /// Extension cannot be used in an asset name
    #[display("Invalid file extension: {:?}", _0)]
    InvalidExtension(String),
}

/// A policy rejection and the source location that raised it.
///
/// # Examples
///
/// ```
/// use stowage_error::{AdmissionError, AdmissionErrorKind};
///
/// let err = AdmissionError::new(AdmissionErrorKind::SizeExceeded {
///     size: 6_000_000,
///     limit: 5_242_880,
/// });
/// assert!(format!("{}", err).contains("exceeds limit"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Upload rejected: {} ({}:{})", kind, file, line)]
pub struct AdmissionError {
    /// Which rule failed
    pub kind: AdmissionErrorKind,
    /// Source line that raised the error
    pub line: u32,
    /// Source file that raised the error
    pub file: &'static str,
}

impl AdmissionError {
    /// Wrap `kind`, recording the caller's location.
    #[track_caller]
    pub fn new(kind: AdmissionErrorKind) -> Self {
        let caller = std::panic::Location::caller();
        Self {
            kind,
            line: caller.line(),
            file: caller.file(),
        }
    }
}
