//! # Tangle Node
//!
//! Binary entry point. Loads configuration from the environment, installs
//! telemetry, starts the workers and waits for Ctrl+C.

use anyhow::{Context, Result};
use node_runtime::{NodeConfig, NodeRuntime};
use tangle_telemetry::{init_telemetry, TelemetryConfig};
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::from_env()).context("Failed to initialize telemetry")?;

    let config = NodeConfig::from_env().context("Failed to load node configuration")?;

    info!("===========================================");
    info!("  Tangle Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let mut runtime = NodeRuntime::new(config)?;
    runtime.start().await?;

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown().await;

    match tangle_telemetry::encode_metrics() {
        Ok(text) => debug!(metrics = %text, "Final metrics"),
        Err(e) => debug!(error = %e, "Failed to encode final metrics"),
    }
    Ok(())
}
