//! Top-level error wrapper types.

use crate::{AdmissionError, AdmissionErrorKind, ConfigError, RejectionReason, StorageError};

/// Every error condition Stowage can report.
///
/// # Examples
///
/// ```
/// use stowage_error::{StowageError, StorageError, StorageErrorKind};
///
/// let storage_err = StorageError::new(StorageErrorKind::FileWrite("disk full".to_string()));
/// let err: StowageError = storage_err.into();
/// assert!(err.to_string().contains("Storage failure"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StowageErrorKind {
    /// Upload rejected by admission policy
    #[from(AdmissionError)]
    Admission(AdmissionError),
    /// Filesystem or backend failure
    #[from(StorageError)]
    Storage(StorageError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Any error returned by a Stowage operation.
///
/// # Examples
///
/// ```
/// use stowage_error::{ConfigError, StowageResult};
///
/// fn lookup(name: &str) -> StowageResult<()> {
///     Err(ConfigError::new(format!("Unknown namespace: {}", name)))?
/// }
///
/// let err = lookup("banners").unwrap_err();
/// assert!(err.to_string().contains("banners"));
/// assert!(!err.is_rejection());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("{}", _0)]
pub struct StowageError(Box<StowageErrorKind>);

impl StowageError {
    /// Box a kind.
    pub fn new(kind: StowageErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// The underlying kind.
    pub fn kind(&self) -> &StowageErrorKind {
        &self.0
    }

    /// Reason code to report to the caller of an admission.
    pub fn rejection_reason(&self) -> RejectionReason {
        match self.kind() {
            StowageErrorKind::Admission(err) => match err.kind {
                AdmissionErrorKind::InvalidType(_) => RejectionReason::InvalidType,
                AdmissionErrorKind::SizeExceeded { .. } => RejectionReason::SizeExceeded,
                AdmissionErrorKind::InvalidOwner(_) | AdmissionErrorKind::InvalidExtension(_) => {
                    RejectionReason::InvalidRequest
                }
            },
            StowageErrorKind::Storage(_) => RejectionReason::StorageError,
            StowageErrorKind::Config(_) => RejectionReason::InvalidRequest,
        }
    }

    /// Whether the error is a policy rejection rather than an infrastructure failure.
    pub fn is_rejection(&self) -> bool {
        matches!(self.kind(), StowageErrorKind::Admission(_))
    }
}

impl<T> From<T> for StowageError
where
    T: Into<StowageErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Stowage operations.
pub type StowageResult<T> = std::result::Result<T, StowageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageErrorKind;

    #[test]
    fn size_violation_maps_to_size_exceeded() {
        let err: StowageError = AdmissionError::new(AdmissionErrorKind::SizeExceeded {
            size: 10,
            limit: 5,
        })
        .into();
        assert_eq!(err.rejection_reason(), RejectionReason::SizeExceeded);
        assert!(err.is_rejection());
    }

    #[test]
    fn malformed_owner_maps_to_invalid_request() {
        let err: StowageError =
            AdmissionError::new(AdmissionErrorKind::InvalidOwner("../x".to_string())).into();
        assert_eq!(err.rejection_reason(), RejectionReason::InvalidRequest);
    }

    #[test]
    fn storage_failure_maps_to_storage_error() {
        let err: StowageError =
            StorageError::new(StorageErrorKind::DirectoryCreation("denied".to_string())).into();
        assert_eq!(err.rejection_reason(), RejectionReason::StorageError);
        assert!(!err.is_rejection());
    }

    #[test]
    fn location_is_captured() {
        let err = StorageError::new(StorageErrorKind::NotFound("a".to_string()));
        assert!(err.file.ends_with("error.rs"));
        assert!(err.line > 0);
    }
}
