//! Admission filter: declared content type and size checks.

use crate::AdmissionPolicy;
use stowage_error::{AdmissionError, AdmissionErrorKind};

/// Accepts or rejects an upload from its declared type and size.
///
/// The filter is the only place the size ceiling is enforced; callers must not
/// rely on transport limits. The type rule is checked first.
///
/// # Examples
///
/// ```
/// use stowage_core::{AdmissionFilter, AdmissionPolicy};
///
/// let filter = AdmissionFilter::new(AdmissionPolicy::default());
/// assert!(filter.check("image/png", 1_000_000).is_ok());
/// assert!(filter.check("application/pdf", 10_000).is_err());
/// assert!(filter.check("image/png", 6 * 1024 * 1024).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AdmissionFilter {
    policy: AdmissionPolicy,
}

impl AdmissionFilter {
    /// Create a filter enforcing `policy`.
    pub fn new(policy: AdmissionPolicy) -> Self {
        Self { policy }
    }

    /// The policy being enforced.
    pub fn policy(&self) -> &AdmissionPolicy {
        &self.policy
    }

    /// Largest accepted payload in bytes.
    pub fn max_bytes(&self) -> u64 {
        *self.policy.max_bytes()
    }

    /// Check both rules.
    ///
    /// # Errors
    ///
    /// [`AdmissionErrorKind::InvalidType`] if the type is not allowed, otherwise
    /// [`AdmissionErrorKind::SizeExceeded`] if the size is over the ceiling.
    #[track_caller]
    pub fn check(&self, mime_type: &str, byte_size: u64) -> Result<(), AdmissionError> {
        self.check_type(mime_type)?;
        self.check_size(byte_size)
    }

    /// Check the content-type rule alone.
    ///
    /// Matching is a case-sensitive prefix comparison.
    #[track_caller]
    pub fn check_type(&self, mime_type: &str) -> Result<(), AdmissionError> {
        let allowed = self
            .policy
            .allowed_type_prefixes()
            .iter()
            .any(|prefix| mime_type.starts_with(prefix.as_str()));
        if allowed {
            Ok(())
        } else {
            Err(AdmissionError::new(AdmissionErrorKind::InvalidType(
                mime_type.to_string(),
            )))
        }
    }

    /// Check the size rule alone. A size equal to the ceiling is accepted.
    #[track_caller]
    pub fn check_size(&self, byte_size: u64) -> Result<(), AdmissionError> {
        let limit = self.max_bytes();
        if byte_size > limit {
            return Err(AdmissionError::new(AdmissionErrorKind::SizeExceeded {
                size: byte_size,
                limit,
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_MAX_BYTES;

    #[test]
    fn ceiling_is_inclusive() {
        let filter = AdmissionFilter::default();
        assert!(filter.check_size(DEFAULT_MAX_BYTES).is_ok());
        let err = filter.check_size(DEFAULT_MAX_BYTES + 1).unwrap_err();
        assert_eq!(
            err.kind,
            AdmissionErrorKind::SizeExceeded {
                size: DEFAULT_MAX_BYTES + 1,
                limit: DEFAULT_MAX_BYTES
            }
        );
    }

    #[test]
    fn type_rule_wins_when_both_fail() {
        let filter = AdmissionFilter::default();
        let err = filter.check("text/plain", u64::MAX).unwrap_err();
        assert!(matches!(err.kind, AdmissionErrorKind::InvalidType(_)));
    }

    #[test]
    fn prefix_match_is_case_sensitive() {
        let filter = AdmissionFilter::default();
        assert!(filter.check_type("image/svg+xml").is_ok());
        assert!(filter.check_type("IMAGE/PNG").is_err());
        assert!(filter.check_type("image").is_err());
        assert!(filter.check_type("").is_err());
    }

    #[test]
    fn multiple_prefixes_are_honoured() {
        let policy = AdmissionPolicy::default().with_allowed_type_prefixes(["image/", "video/"]);
        let filter = AdmissionFilter::new(policy);
        assert!(filter.check_type("video/mp4").is_ok());
        assert!(filter.check_type("audio/mpeg").is_err());
    }
}
