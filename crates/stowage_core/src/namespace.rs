//! Storage namespaces.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use stowage_error::ConfigError;

/// Logical category of assets (e.g. `avatars`) bound to one storage location.
///
/// A namespace is one or more `/`-separated segments made of ASCII
/// alphanumerics, `_` and `-`. Dot segments are rejected, so a namespace always
/// resolves beneath the storage root.
///
/// # Examples
///
/// ```
/// use stowage_core::Namespace;
///
/// let ns = Namespace::new("uploads/avatars")?;
/// assert_eq!(ns.segments().collect::<Vec<_>>(), vec!["uploads", "avatars"]);
/// assert!(Namespace::new("../secrets").is_err());
/// # Ok::<(), stowage_error::ConfigError>(())
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
pub struct Namespace(String);

impl Namespace {
    /// Validate and wrap a namespace identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the identifier is empty or contains an
    /// empty, `.`, `..` or otherwise malformed segment.
    #[track_caller]
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        let valid = !name.is_empty()
            && name.split('/').all(|segment| {
                !segment.is_empty()
                    && segment
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            });
        if !valid {
            return Err(ConfigError::new(format!("Invalid namespace: {:?}", name)));
        }
        Ok(Self(name))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments of the namespace.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Location of the namespace relative to a storage root.
    pub fn relative_path(&self) -> PathBuf {
        self.segments().collect()
    }
}

impl TryFrom<String> for Namespace {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Namespace> for String {
    fn from(ns: Namespace) -> Self {
        ns.0
    }
}

impl std::str::FromStr for Namespace {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
