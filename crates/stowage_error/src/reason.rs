//! Client-facing rejection reason codes.

/// Reason code reported to the caller of an admission.
///
/// # Examples
///
/// ```
/// use stowage_error::RejectionReason;
///
/// assert_eq!(RejectionReason::SizeExceeded.to_string(), "size-exceeded");
/// assert_eq!("invalid-type".parse::<RejectionReason>().unwrap(), RejectionReason::InvalidType);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum RejectionReason {
    /// Content type is not allowed
    InvalidType,
    /// Payload exceeds the size ceiling
    SizeExceeded,
    /// Owner, extension or namespace is malformed
    InvalidRequest,
    /// The asset could not be stored
    StorageError,
}
