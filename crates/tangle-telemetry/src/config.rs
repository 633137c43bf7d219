//! Telemetry configuration from environment variables.

use std::env;

use serde::{Deserialize, Serialize};

/// Configuration for logging and metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name attached to the node info metric
    pub service_name: String,

    /// Log filter directive (trace, debug, info, warn, error or a full
    /// `EnvFilter` expression)
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Whether to include the event target in log lines
    pub with_target: bool,

    /// Network identifier (mainnet, testnet, devnet)
    pub network: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "tangle-node".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_target: true,
            network: "testnet".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TANGLE_SERVICE_NAME`: Service name (default: tangle-node)
    /// - `TANGLE_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `TANGLE_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    /// - `TANGLE_LOG_TARGET`: Include targets in log lines (default: true)
    /// - `TANGLE_NETWORK`: Network name (default: testnet)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        Self {
            service_name: lookup("TANGLE_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: lookup("TANGLE_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            json_logs: lookup("TANGLE_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(is_container),

            with_target: lookup("TANGLE_LOG_TARGET")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.with_target),

            network: lookup("TANGLE_NETWORK").unwrap_or(defaults.network),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
