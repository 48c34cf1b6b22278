//! Owner identifiers.

use serde::{Deserialize, Serialize};
use stowage_error::{AdmissionError, AdmissionErrorKind};

const MAX_OWNER_LEN: usize = 64;

/// Identifier of the (already authenticated) owner of an asset.
///
/// Owner ids become part of asset names, so they are restricted to ASCII
/// alphanumerics and `_`, between 1 and 64 characters.
///
/// # Examples
///
/// ```
/// use stowage_core::OwnerId;
///
/// let owner = OwnerId::new("64f1c2ab9e")?;
/// assert_eq!(owner.as_str(), "64f1c2ab9e");
/// assert!(OwnerId::new("../etc").is_err());
/// # Ok::<(), stowage_error::AdmissionError>(())
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    derive_more::Display,
    Serialize,
    Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

impl OwnerId {
    /// Validate and wrap an owner identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionErrorKind::InvalidOwner`] if the id is empty, too long,
    /// or contains characters other than ASCII alphanumerics and `_`.
    #[track_caller]
    pub fn new(id: impl Into<String>) -> Result<Self, AdmissionError> {
        let id = id.into();
        let valid = !id.is_empty()
            && id.len() <= MAX_OWNER_LEN
            && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(AdmissionError::new(AdmissionErrorKind::InvalidOwner(id)));
        }
        Ok(Self(id))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for OwnerId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl TryFrom<String> for OwnerId {
    type Error = AdmissionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OwnerId> for String {
    fn from(owner: OwnerId) -> Self {
        owner.0
    }
}

impl std::str::FromStr for OwnerId {
    type Err = AdmissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numeric_and_object_ids() {
        assert!(OwnerId::new("42").is_ok());
        assert!(OwnerId::new("507f1f77bcf86cd799439011").is_ok());
        assert!(OwnerId::new("user_7").is_ok());
    }

    #[test]
    fn rejects_separators_and_empty() {
        for bad in ["", "a-b", "a/b", "a.b", "owner id", "é"] {
            let err = OwnerId::new(bad).unwrap_err();
            assert!(matches!(err.kind, AdmissionErrorKind::InvalidOwner(_)), "{bad}");
        }
    }

    #[test]
    fn rejects_overlong_ids() {
        assert!(OwnerId::new("a".repeat(64)).is_ok());
        assert!(OwnerId::new("a".repeat(65)).is_err());
    }

    #[test]
    fn deserializes_through_validation() {
        let owner: OwnerId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(owner, OwnerId::from(42));
        assert!(serde_json::from_str::<OwnerId>("\"4-2\"").is_err());
    }
}
