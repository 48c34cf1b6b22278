//! Serve command handler.

use stowage::{ConfigError, Stowage, StowageResult};
use tracing::info;

/// Run every namespace's sweeper until Ctrl-C.
pub async fn serve(stowage: &Stowage) -> StowageResult<()> {
    let retention = stowage.start_retention();
    info!(sweepers = retention.handles().len(), "Serving; press Ctrl-C to stop");

    let signal = tokio::signal::ctrl_c().await;
    retention.shutdown().await;

    signal.map_err(|e| ConfigError::new(format!("Failed to listen for Ctrl-C: {}", e)))?;
    Ok(())
}
