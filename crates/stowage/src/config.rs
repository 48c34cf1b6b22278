//! Layered configuration.
//!
//! Sources, later ones overriding earlier ones:
//! - Bundled defaults (include_str! from stowage.toml)
//! - User config in home directory (~/.config/stowage/stowage.toml)
//! - User config in current directory (./stowage.toml)
//! - `STOWAGE__<SECTION>__<KEY>` environment variables
//!
//! An explicit file given to [`StowageConfig::load_from`] takes the place of
//! both user files.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use stowage_core::{AdmissionPolicy, NameGenerator, Namespace, RetentionPolicy};
use stowage_error::{ConfigError, StowageError, StowageResult};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../stowage.toml");

/// Where assets are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding one subdirectory per namespace.
    #[serde(default = "default_root")]
    root: PathBuf,
}

fn default_root() -> PathBuf {
    PathBuf::from("uploads")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

impl StorageConfig {
    /// Set the storage root.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }
}

/// One namespace and the rules that apply to it.
///
/// # Example
///
/// ```toml
/// [[namespaces]]
/// name = "avatars"
/// prefix = "avatar"
///
/// [namespaces.retention]
/// max_age_seconds = 86_400
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(deny_unknown_fields)]
pub struct NamespaceConfig {
    /// Namespace name, e.g. `avatars`
    name: Namespace,
    /// Prefix of generated asset names, e.g. `avatar`
    prefix: String,
    /// Retention applied by this namespace's sweeper
    #[serde(default)]
    retention: RetentionPolicy,
}

impl NamespaceConfig {
    /// Describe a namespace.
    pub fn new(name: Namespace, prefix: impl Into<String>, retention: RetentionPolicy) -> Self {
        Self {
            name,
            prefix: prefix.into(),
            retention,
        }
    }
}

/// Top-level Stowage configuration.
///
/// # Example
///
/// ```no_run
/// use stowage::StowageConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StowageConfig::load()?;
/// for ns in config.namespaces() {
///     println!("{} keeps assets for {:?}", ns.name(), ns.retention().max_age());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(deny_unknown_fields)]
pub struct StowageConfig {
    /// Storage location
    #[serde(default)]
    storage: StorageConfig,
    /// Admission rules shared by every namespace
    #[serde(default)]
    admission: AdmissionPolicy,
    /// Configured namespaces
    #[serde(default)]
    namespaces: Vec<NamespaceConfig>,
}

impl StowageConfig {
    /// Build a configuration directly, without reading any source.
    pub fn new(
        storage: StorageConfig,
        admission: AdmissionPolicy,
        namespaces: Vec<NamespaceConfig>,
    ) -> Self {
        Self {
            storage,
            admission,
            namespaces,
        }
    }

    /// Load configuration from every default source.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a source cannot be read or parsed, or
    /// if the merged result does not validate.
    #[instrument]
    pub fn load() -> StowageResult<Self> {
        Self::load_from(None)
    }

    /// Load configuration, replacing the user files with `path` when given.
    ///
    /// # Errors
    ///
    /// Same as [`StowageConfig::load`]. An explicit file must exist.
    #[instrument]
    pub fn load_from(path: Option<&Path>) -> StowageResult<Self> {
        let mut builder = Self::defaults();

        match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading explicit configuration file");
                builder = builder.add_source(File::from(path));
            }
            None => {
                if let Some(home) = dirs::home_dir() {
                    let home_config = home.join(".config/stowage/stowage.toml");
                    builder = builder.add_source(File::from(home_config).required(false));
                }
                builder = builder.add_source(File::with_name("stowage").required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("STOWAGE")
                .separator("__")
                .try_parsing(true),
        );

        Self::finish(builder)
    }

    /// Bundled defaults merged with a TOML document.
    ///
    /// # Errors
    ///
    /// Same as [`StowageConfig::load`].
    pub fn from_toml_str(toml: &str) -> StowageResult<Self> {
        Self::finish(Self::defaults().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    /// Bundled defaults only.
    ///
    /// # Errors
    ///
    /// Fails only if the bundled file is broken.
    pub fn bundled() -> StowageResult<Self> {
        Self::finish(Self::defaults())
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> StowageResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                StowageError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                StowageError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validate()?;
        debug!(
            root = %config.storage.root.display(),
            namespaces = config.namespaces.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a policy is degenerate, a prefix is unusable, no
    /// namespace is configured, or a namespace is configured twice.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.admission.validate()?;
        if self.namespaces.is_empty() {
            return Err(ConfigError::new("At least one namespace must be configured"));
        }

        let mut seen = HashSet::new();
        for ns in &self.namespaces {
            if !seen.insert(ns.name.as_str()) {
                return Err(ConfigError::new(format!(
                    "Namespace configured more than once: {}",
                    ns.name
                )));
            }
            NameGenerator::new(ns.prefix.as_str())?;
            ns.retention.validate().map_err(|e| {
                ConfigError::new(format!("Namespace {}: {}", ns.name, e.message))
            })?;
        }
        Ok(())
    }

    /// Look up a namespace by name.
    pub fn namespace(&self, name: &str) -> Option<&NamespaceConfig> {
        self.namespaces.iter().find(|ns| ns.name.as_str() == name)
    }

    /// Set the storage root.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.storage = self.storage.with_root(root);
        self
    }
}
