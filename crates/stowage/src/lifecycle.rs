//! Process-wide context: one store, a pipeline and a sweeper per namespace.

use crate::StowageConfig;
use std::collections::BTreeMap;
use std::sync::Arc;
use stowage_core::{AdmissionFilter, NameGenerator, Namespace};
use stowage_error::{ConfigError, StowageResult};
use stowage_retention::{SweepReport, Sweeper, SweeperHandle};
use stowage_storage::{AssetStore, FileSystemStore, UploadPipeline};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

/// Everything configured for one namespace.
#[derive(Debug, Clone)]
struct NamespaceRuntime {
    pipeline: UploadPipeline,
    sweeper: Sweeper,
}

/// The assembled upload lifecycle.
///
/// Built once at start-up from a [`StowageConfig`] and shared by whoever
/// admits uploads. The filesystem store is the only shared state.
#[derive(Debug, Clone)]
pub struct Stowage {
    store: Arc<FileSystemStore>,
    namespaces: BTreeMap<Namespace, NamespaceRuntime>,
}

impl Stowage {
    /// Assemble the lifecycle from configuration.
    ///
    /// No I/O happens here; namespace directories appear on first admission.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the configuration does not validate.
    #[instrument(skip(config), fields(root = %config.storage().root().display()))]
    pub fn from_config(config: &StowageConfig) -> StowageResult<Self> {
        config.validate()?;

        let store = Arc::new(FileSystemStore::new(config.storage().root()));
        let shared: Arc<dyn AssetStore> = store.clone();
        let filter = AdmissionFilter::new(config.admission().clone());

        let mut namespaces = BTreeMap::new();
        for ns in config.namespaces() {
            let pipeline = UploadPipeline::new(
                Arc::clone(&shared),
                ns.name().clone(),
                NameGenerator::new(ns.prefix().as_str())?,
                filter.clone(),
            );
            let sweeper = Sweeper::new(
                Arc::clone(&shared),
                ns.name().clone(),
                ns.retention().clone(),
            )?;
            namespaces.insert(ns.name().clone(), NamespaceRuntime { pipeline, sweeper });
        }

        info!(namespaces = namespaces.len(), "Stowage assembled");
        Ok(Self { store, namespaces })
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<FileSystemStore> {
        &self.store
    }

    /// Configured namespaces, in name order.
    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.keys()
    }

    /// Admission pipeline for a namespace.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown namespace.
    pub fn pipeline(&self, namespace: &str) -> StowageResult<&UploadPipeline> {
        Ok(&self.runtime(namespace)?.pipeline)
    }

    /// Sweeper for a namespace.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown namespace.
    pub fn sweeper(&self, namespace: &str) -> StowageResult<&Sweeper> {
        Ok(&self.runtime(namespace)?.sweeper)
    }

    fn runtime(&self, namespace: &str) -> Result<&NamespaceRuntime, ConfigError> {
        self.namespaces
            .iter()
            .find(|(name, _)| name.as_str() == namespace)
            .map(|(_, runtime)| runtime)
            .ok_or_else(|| ConfigError::new(format!("Unknown namespace: {}", namespace)))
    }

    /// Sweep every namespace once, in name order.
    ///
    /// # Errors
    ///
    /// Stops at the first namespace whose listing fails.
    pub async fn sweep_all(&self) -> StowageResult<Vec<SweepReport>> {
        let mut reports = Vec::with_capacity(self.namespaces.len());
        for runtime in self.namespaces.values() {
            reports.push(runtime.sweeper.sweep().await?);
        }
        Ok(reports)
    }

    /// Start a background sweeper for every namespace.
    ///
    /// Must be called within a Tokio runtime.
    pub fn start_retention(&self) -> RetentionHandles {
        let token = CancellationToken::new();
        let handles = self
            .namespaces
            .values()
            .map(|runtime| runtime.sweeper.clone().spawn(token.child_token()))
            .collect();
        RetentionHandles { token, handles }
    }
}

/// Running sweepers started by [`Stowage::start_retention`].
#[derive(Debug)]
pub struct RetentionHandles {
    token: CancellationToken,
    handles: Vec<SweeperHandle>,
}

impl RetentionHandles {
    /// Handles of the individual sweepers.
    pub fn handles(&self) -> &[SweeperHandle] {
        &self.handles
    }

    /// Ask every sweeper to stop.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Stop every sweeper and wait for all of them to exit.
    #[instrument(skip(self), fields(sweepers = self.handles.len()))]
    pub async fn shutdown(self) {
        self.token.cancel();
        for handle in self.handles {
            handle.shutdown().await;
        }
        info!("Retention stopped");
    }
}
