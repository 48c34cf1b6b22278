//! Admission and retention policies.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use stowage_error::ConfigError;

/// Default upload ceiling: 5 MiB.
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Default allowed content-type prefix.
pub const DEFAULT_ALLOWED_TYPE_PREFIX: &str = "image/";

/// Default maximum asset age: 24 hours.
pub const DEFAULT_MAX_AGE_SECONDS: u64 = 24 * 60 * 60;

/// Default pause between sweeps: 1 hour.
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 60 * 60;

/// Longest accepted pause between sweeps: 365 days.
pub const MAX_SWEEP_INTERVAL_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Rules an upload must satisfy before it may reach storage.
///
/// # Examples
///
/// ```
/// use stowage_core::AdmissionPolicy;
///
/// let policy = AdmissionPolicy::default();
/// assert_eq!(*policy.max_bytes(), 5 * 1024 * 1024);
/// assert_eq!(policy.allowed_type_prefixes(), &vec!["image/".to_string()]);
///
/// let strict = AdmissionPolicy::default().with_max_bytes(1024);
/// assert_eq!(*strict.max_bytes(), 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(deny_unknown_fields)]
pub struct AdmissionPolicy {
    /// Content types must start with one of these prefixes.
    #[serde(default = "default_allowed_type_prefixes")]
    allowed_type_prefixes: Vec<String>,

    /// Largest accepted payload in bytes.
    #[serde(default = "default_max_bytes")]
    max_bytes: u64,

    /// Check that a generated name is unused before committing a write.
    #[serde(default)]
    verify_unique_names: bool,
}

fn default_allowed_type_prefixes() -> Vec<String> {
    vec![DEFAULT_ALLOWED_TYPE_PREFIX.to_string()]
}

fn default_max_bytes() -> u64 {
    DEFAULT_MAX_BYTES
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            allowed_type_prefixes: default_allowed_type_prefixes(),
            max_bytes: default_max_bytes(),
            verify_unique_names: false,
        }
    }
}

impl AdmissionPolicy {
    /// Replace the allowed content-type prefixes.
    pub fn with_allowed_type_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_type_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the upload ceiling in bytes.
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Enable or disable the name precondition check.
    pub fn with_verify_unique_names(mut self, enabled: bool) -> Self {
        self.verify_unique_names = enabled;
        self
    }

    /// Validates the policy.
    ///
    /// # Errors
    ///
    /// Returns an error if no prefix is allowed, a prefix is empty, or the
    /// ceiling is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allowed_type_prefixes.is_empty() {
            return Err(ConfigError::new(
                "admission.allowed_type_prefixes must not be empty",
            ));
        }
        if self.allowed_type_prefixes.iter().any(String::is_empty) {
            return Err(ConfigError::new(
                "admission.allowed_type_prefixes must not contain empty prefixes",
            ));
        }
        if self.max_bytes == 0 {
            return Err(ConfigError::new("admission.max_bytes must be positive"));
        }
        Ok(())
    }
}

/// Age-based reclamation settings for one namespace.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use stowage_core::RetentionPolicy;
///
/// let policy = RetentionPolicy::default();
/// assert_eq!(policy.max_age(), Duration::from_secs(86_400));
/// assert_eq!(policy.sweep_interval(), Duration::from_secs(3_600));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(deny_unknown_fields)]
pub struct RetentionPolicy {
    /// Assets strictly older than this many seconds are deleted.
    #[serde(default = "default_max_age_seconds")]
    max_age_seconds: u64,

    /// Seconds between two sweeps.
    #[serde(default = "default_sweep_interval_seconds")]
    sweep_interval_seconds: u64,

    /// Sweep once immediately when the sweeper starts.
    #[serde(default)]
    sweep_on_start: bool,
}

fn default_max_age_seconds() -> u64 {
    DEFAULT_MAX_AGE_SECONDS
}

fn default_sweep_interval_seconds() -> u64 {
    DEFAULT_SWEEP_INTERVAL_SECONDS
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_age_seconds: default_max_age_seconds(),
            sweep_interval_seconds: default_sweep_interval_seconds(),
            sweep_on_start: false,
        }
    }
}

impl RetentionPolicy {
    /// Create a policy from durations, truncated to whole seconds.
    pub fn new(max_age: Duration, sweep_interval: Duration) -> Self {
        Self {
            max_age_seconds: max_age.as_secs(),
            sweep_interval_seconds: sweep_interval.as_secs(),
            sweep_on_start: false,
        }
    }

    /// Enable or disable the start-up sweep.
    pub fn with_sweep_on_start(mut self, enabled: bool) -> Self {
        self.sweep_on_start = enabled;
        self
    }

    /// Maximum age as a duration.
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_seconds)
    }

    /// Sweep interval as a duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }

    /// Validates the policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the sweep interval is zero or longer than
    /// [`MAX_SWEEP_INTERVAL_SECONDS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep_interval_seconds == 0 {
            return Err(ConfigError::new(
                "retention.sweep_interval_seconds must be positive",
            ));
        }
        if self.sweep_interval_seconds > MAX_SWEEP_INTERVAL_SECONDS {
            return Err(ConfigError::new(format!(
                "retention.sweep_interval_seconds must not exceed {}",
                MAX_SWEEP_INTERVAL_SECONDS
            )));
        }
        Ok(())
    }
}
