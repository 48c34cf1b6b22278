//! Handle to a running sweeper.

use crate::SweepReport;
use stowage_core::Namespace;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Controls a background sweeper spawned by [`Sweeper::spawn`](crate::Sweeper::spawn).
///
/// Dropping the handle does not stop the sweeper; call [`SweeperHandle::cancel`]
/// or [`SweeperHandle::shutdown`], or cancel the token it was spawned with.
#[derive(Debug)]
pub struct SweeperHandle {
    namespace: Namespace,
    token: CancellationToken,
    task: JoinHandle<()>,
    reports: watch::Receiver<Option<SweepReport>>,
}

impl SweeperHandle {
    pub(crate) fn new(
        namespace: Namespace,
        token: CancellationToken,
        task: JoinHandle<()>,
        reports: watch::Receiver<Option<SweepReport>>,
    ) -> Self {
        Self {
            namespace,
            token,
            task,
            reports,
        }
    }

    /// Namespace the sweeper is responsible for.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Ask the sweeper to stop. No new pass starts afterwards.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the background task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Receiver for the report of the most recent completed pass.
    pub fn reports(&self) -> watch::Receiver<Option<SweepReport>> {
        self.reports.clone()
    }

    /// Cancel the sweeper and wait for it to exit.
    pub async fn shutdown(self) {
        self.token.cancel();
        if let Err(e) = self.task.await {
            tracing::error!(
                namespace = %self.namespace,
                error = %e,
                "Sweeper task ended abnormally"
            );
        }
    }
}
