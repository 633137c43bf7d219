//! # Tangle Telemetry
//!
//! Logging and metrics bootstrap for the tangle node.
//!
//! ## Components
//!
//! - **Logs**: `tracing-subscriber` registry with an `EnvFilter` and a
//!   human readable or JSON layer
//! - **Metrics**: Prometheus default registry, shared with the subsystem
//!   crates' `metrics` features
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tangle_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = TelemetryConfig::from_env();
//!     init_telemetry(&config)?;
//!     // Logs and metrics are now being collected
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TANGLE_SERVICE_NAME` | `tangle-node` | Service label on `tangle_node_info` |
//! | `TANGLE_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `TANGLE_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |
//! | `TANGLE_LOG_TARGET` | `true` | Include event targets |
//! | `TANGLE_NETWORK` | `testnet` | Network label |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging};
pub use metrics::{encode_metrics, record_worker_error, TickTimer};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to encode Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and publish the node info metric.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    logging::init_logging(config)?;
    metrics::set_node_info(
        &config.service_name,
        env!("CARGO_PKG_VERSION"),
        &config.network,
    );
    tracing::info!(
        service = %config.service_name,
        network = %config.network,
        "Telemetry initialized"
    );
    Ok(())
}
