//! Configuration errors.

/// A configuration value is missing, malformed or inconsistent.
///
/// Raised while loading layered configuration and by the `validate` methods
/// of policies and namespaces.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Invalid configuration: {} ({}:{})", message, file, line)]
pub struct ConfigError {
    /// What is wrong, naming the offending key where possible
    pub message: String,
    /// Source line that raised the error
    pub line: u32,
    /// Source file that raised the error
    pub file: &'static str,
}

impl ConfigError {
    /// Describe a configuration problem, recording the caller's location.
    ///
    /// # Examples
    ///
    /// ```
    /// use stowage_error::ConfigError;
    ///
    /// let err = ConfigError::new("Unknown namespace: banners");
    /// assert!(err.message.contains("banners"));
    /// assert!(err.to_string().starts_with("Invalid configuration"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let caller = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: caller.line(),
            file: caller.file(),
        }
    }
}
