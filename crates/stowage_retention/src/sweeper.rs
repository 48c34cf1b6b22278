//! One-shot and scheduled sweeps.

use crate::{SweepFailure, SweepReport, SweeperHandle};
use std::sync::Arc;
use std::time::SystemTime;
use stowage_core::{AssetRecord, Namespace, RetentionPolicy};
use stowage_error::{ConfigError, StowageResult};
use stowage_storage::{AssetStore, ListedEntry};
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Deletes expired assets from one namespace.
///
/// The sweeper shares the store with the admission pipeline and takes no lock:
/// an asset admitted during a pass is either missed (and seen next time) or
/// found with a fresh modification time and kept.
#[derive(Clone)]
pub struct Sweeper {
    store: Arc<dyn AssetStore>,
    namespace: Namespace,
    policy: RetentionPolicy,
}

impl std::fmt::Debug for Sweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sweeper")
            .field("backend", &self.store.backend())
            .field("namespace", &self.namespace)
            .field("policy", &self.policy)
            .finish()
    }
}

impl Sweeper {
    /// Create a sweeper for `namespace`.
    ///
    /// # Errors
    ///
    /// Fails if the policy does not validate.
    pub fn new(
        store: Arc<dyn AssetStore>,
        namespace: Namespace,
        policy: RetentionPolicy,
    ) -> Result<Self, ConfigError> {
        policy.validate()?;
        Ok(Self {
            store,
            namespace,
            policy,
        })
    }

    /// Namespace being swept.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Policy being applied.
    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    /// Run one pass against the current time.
    ///
    /// # Errors
    ///
    /// Only a failure to list the namespace fails the pass. Per-asset errors
    /// are logged and collected in the report.
    pub async fn sweep(&self) -> StowageResult<SweepReport> {
        self.sweep_at(SystemTime::now()).await
    }

    /// Run one pass, judging ages against `now`.
    ///
    /// # Errors
    ///
    /// Same as [`Sweeper::sweep`].
    #[tracing::instrument(skip(self, now), fields(namespace = %self.namespace))]
    pub async fn sweep_at(&self, now: SystemTime) -> StowageResult<SweepReport> {
        let Some(entries) = self.store.list(&self.namespace).await? else {
            tracing::debug!(
                location = %self.store.locate(&self.namespace),
                "Namespace absent, nothing to sweep"
            );
            return Ok(SweepReport::absent(self.namespace.clone()));
        };

        let mut report = SweepReport::new(self.namespace.clone());
        for entry in entries {
            report.record_scanned();
            match entry {
                ListedEntry::Asset(record) => self.reclaim(record, now, &mut report).await,
                ListedEntry::Unreadable { file_name, error } => {
                    tracing::warn!(
                        asset = %file_name,
                        error = %error,
                        "Skipping unreadable asset"
                    );
                    report.record_failure(SweepFailure::new(file_name, error));
                }
            }
        }

        tracing::debug!(
            scanned = report.scanned(),
            deleted = report.deleted().len(),
            failures = report.failures().len(),
            "Sweep complete"
        );
        Ok(report)
    }

    async fn reclaim(&self, record: AssetRecord, now: SystemTime, report: &mut SweepReport) {
        if !record.is_expired(&self.policy, now) {
            report.record_retained();
            return;
        }

        match self.store.remove(&self.namespace, record.file_name()).await {
            Ok(true) => {
                tracing::info!(
                    asset = %record.file_name(),
                    age_secs = record.age_at(now).as_secs(),
                    "Cleaned up old file"
                );
                report.record_deleted(record.file_name().clone(), *record.size_bytes());
            }
            Ok(false) => {
                tracing::debug!(asset = %record.file_name(), "Asset already gone");
            }
            Err(e) => {
                tracing::warn!(
                    asset = %record.file_name(),
                    error = %e,
                    "Failed to delete expired asset"
                );
                report.record_failure(SweepFailure::new(record.file_name().clone(), e));
            }
        }
    }

    /// Sweep on the policy's interval until `token` is cancelled.
    ///
    /// The first pass runs one interval after spawning, or immediately when
    /// the policy asks for a start-up sweep. A pass in progress when the
    /// token fires is allowed to finish. Must be called within a Tokio runtime.
    pub fn spawn(self, token: CancellationToken) -> SweeperHandle {
        let period = self.policy.sweep_interval();
        let start = if *self.policy.sweep_on_start() {
            Instant::now()
        } else {
            Instant::now() + period
        };
        let namespace = self.namespace.clone();
        let (reports_tx, reports_rx) = watch::channel(None);
        let task_token = token.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(
                namespace = %self.namespace,
                interval_secs = period.as_secs(),
                max_age_secs = self.policy.max_age().as_secs(),
                "Retention sweeper started"
            );

            loop {
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                match self.sweep().await {
                    Ok(report) => {
                        reports_tx.send_replace(Some(report));
                    }
                    Err(e) => {
                        tracing::error!(namespace = %self.namespace, error = %e, "Sweep failed");
                    }
                }
            }

            tracing::info!(namespace = %self.namespace, "Retention sweeper stopped");
        });

        SweeperHandle::new(namespace, token, task, reports_rx)
    }
}
