//! Asset naming.
//!
//! Names have the shape `<prefix>-<owner>-<millis>-<nonce>.<extension>`.
//! Uniqueness is probabilistic: two uploads collide only if they share owner,
//! millisecond and nonce. No existence check happens here.

use crate::OwnerId;
use chrono::Utc;
use rand::Rng;
use stowage_error::{AdmissionError, AdmissionErrorKind, ConfigError};

/// Largest nonce the generator draws (inclusive).
pub const NONCE_MAX: u64 = 1_000_000_000;

const MAX_EXTENSION_LEN: usize = 16;

/// Original file extension carried over to the stored name.
///
/// ASCII alphanumerics only, at most 16 characters, possibly empty. A single
/// leading `.` is accepted and stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub struct Extension(String);

impl Extension {
    /// Validate an extension such as `png` or `.png`.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionErrorKind::InvalidExtension`] for anything that is not
    /// a short run of ASCII alphanumerics.
    #[track_caller]
    pub fn new(extension: impl AsRef<str>) -> Result<Self, AdmissionError> {
        let raw = extension.as_ref();
        let ext = raw.strip_prefix('.').unwrap_or(raw);
        if ext.len() > MAX_EXTENSION_LEN || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AdmissionError::new(AdmissionErrorKind::InvalidExtension(
                raw.to_string(),
            )));
        }
        Ok(Self(ext.to_string()))
    }

    /// Extension of an original client filename.
    ///
    /// # Errors
    ///
    /// Same as [`Extension::new`].
    #[track_caller]
    pub fn from_filename(filename: &str) -> Result<Self, AdmissionError> {
        Self::new(extension_of(filename))
    }

    /// The extension without a leading dot.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the asset has no extension.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Extension of the last component of `filename`, without the dot.
///
/// Dotfiles (`.profile`) and names without a dot have no extension.
///
/// # Examples
///
/// ```
/// use stowage_core::extension_of;
///
/// assert_eq!(extension_of("me.png"), "png");
/// assert_eq!(extension_of("photos/archive.tar.gz"), "gz");
/// assert_eq!(extension_of(".profile"), "");
/// assert_eq!(extension_of("README"), "");
/// ```
pub fn extension_of(filename: &str) -> &str {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match base.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &base[idx + 1..],
    }
}

/// Generated asset name, parseable back into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_getters::Getters)]
pub struct AssetName {
    /// Namespace-specific prefix (e.g. `avatar`)
    prefix: String,
    /// Owner of the asset
    owner: OwnerId,
    /// Milliseconds since the Unix epoch at generation time
    timestamp_millis: u64,
    /// Random nonce
    nonce: u64,
    /// Original extension
    extension: Extension,
}

impl AssetName {
    /// Parse a stored file name produced by a [`NameGenerator`].
    ///
    /// Returns `None` for names that were not generated by Stowage.
    ///
    /// # Examples
    ///
    /// ```
    /// use stowage_core::AssetName;
    ///
    /// let name = AssetName::parse("avatar-42-1700000000000-123456789.png").unwrap();
    /// assert_eq!(name.owner().as_str(), "42");
    /// assert_eq!(name.extension().as_str(), "png");
    /// assert!(AssetName::parse("notes.txt").is_none());
    /// ```
    pub fn parse(file_name: &str) -> Option<Self> {
        let (stem, extension) = match file_name.rsplit_once('.') {
            Some((stem, ext)) => (stem, Extension::new(ext).ok()?),
            None => (file_name, Extension::default()),
        };
        let mut parts = stem.split('-');
        let prefix = parts.next()?;
        let owner = parts.next()?;
        let timestamp_millis = parts.next()?;
        let nonce = parts.next()?;
        if parts.next().is_some()
            || !is_valid_prefix(prefix)
            || !is_digits(timestamp_millis)
            || !is_digits(nonce)
        {
            return None;
        }
        Some(Self {
            prefix: prefix.to_string(),
            owner: OwnerId::new(owner).ok()?,
            timestamp_millis: timestamp_millis.parse().ok()?,
            nonce: nonce.parse().ok()?,
            extension,
        })
    }
}

impl std::fmt::Display for AssetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.prefix, self.owner, self.timestamp_millis, self.nonce
        )?;
        if !self.extension.is_empty() {
            write!(f, ".{}", self.extension)?;
        }
        Ok(())
    }
}

/// Produces collision-resistant asset names for one namespace.
///
/// # Examples
///
/// ```
/// use stowage_core::{Extension, NameGenerator, OwnerId};
///
/// let names = NameGenerator::new("avatar")?;
/// let name = names.generate(&OwnerId::from(42), &Extension::new("png").unwrap());
/// assert!(name.to_string().starts_with("avatar-42-"));
/// assert!(name.to_string().ends_with(".png"));
/// # Ok::<(), stowage_error::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameGenerator {
    prefix: String,
}

impl NameGenerator {
    /// Create a generator for names starting with `prefix`.
    ///
    /// # Errors
    ///
    /// The prefix must be non-empty ASCII alphanumerics or `_`; `-` is reserved
    /// as the field separator.
    #[track_caller]
    pub fn new(prefix: impl Into<String>) -> Result<Self, ConfigError> {
        let prefix = prefix.into();
        if !is_valid_prefix(&prefix) {
            return Err(ConfigError::new(format!("Invalid name prefix: {:?}", prefix)));
        }
        Ok(Self { prefix })
    }

    /// The configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Generate a name from the current time and a fresh random nonce.
    pub fn generate(&self, owner: &OwnerId, extension: &Extension) -> AssetName {
        let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let nonce = rand::thread_rng().gen_range(0..=NONCE_MAX);
        self.generate_with(owner, extension, millis, nonce)
    }

    /// Generate a name from explicit time and nonce values.
    pub fn generate_with(
        &self,
        owner: &OwnerId,
        extension: &Extension,
        timestamp_millis: u64,
        nonce: u64,
    ) -> AssetName {
        AssetName {
            prefix: self.prefix.clone(),
            owner: owner.clone(),
            timestamp_millis,
            nonce,
            extension: extension.clone(),
        }
    }
}

fn is_valid_prefix(prefix: &str) -> bool {
    !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_strips_single_leading_dot() {
        assert_eq!(Extension::new(".png").unwrap().as_str(), "png");
        assert_eq!(Extension::new("JPG").unwrap().as_str(), "JPG");
        assert!(Extension::new("..png").is_err());
        assert!(Extension::new("p/ng").is_err());
        assert!(Extension::new("a".repeat(17)).is_err());
    }

    #[test]
    fn empty_extension_omits_dot() {
        let names = NameGenerator::new("avatar").unwrap();
        let name = names.generate_with(&OwnerId::from(7), &Extension::default(), 1, 2);
        assert_eq!(name.to_string(), "avatar-7-1-2");
        assert_eq!(AssetName::parse("avatar-7-1-2"), Some(name));
    }

    #[test]
    fn parse_inverts_display() {
        let names = NameGenerator::new("avatar").unwrap();
        let owner = OwnerId::new("507f1f77bcf86cd799439011").unwrap();
        let name = names.generate(&owner, &Extension::new("webp").unwrap());
        assert_eq!(AssetName::parse(&name.to_string()), Some(name));
    }

    #[test]
    fn parse_rejects_foreign_names() {
        for foreign in [
            "notes.txt",
            "avatar-42-abc-1.png",
            "avatar-42-1-2-3.png",
            "-42-1-2.png",
            ".avatar-42-1-2.png.tmp-x",
            "avatar-42-1-.png",
        ] {
            assert!(AssetName::parse(foreign).is_none(), "{foreign}");
        }
    }

    #[test]
    fn prefix_may_not_contain_separator() {
        assert!(NameGenerator::new("user-avatar").is_err());
        assert!(NameGenerator::new("").is_err());
        assert!(NameGenerator::new("user_avatar").is_ok());
    }

    #[test]
    fn nonce_stays_in_range() {
        let names = NameGenerator::new("avatar").unwrap();
        for _ in 0..1_000 {
            let name = names.generate(&OwnerId::from(1), &Extension::default());
            assert!(*name.nonce() <= NONCE_MAX);
        }
    }
}
