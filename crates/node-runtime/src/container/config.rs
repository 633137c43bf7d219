//! # Node Configuration
//!
//! Unified configuration for all subsystems and runtime parameters.
//!
//! Every value has a default. Environment variables override them; a value
//! that is present but malformed is an error rather than silently ignored.

use std::collections::BTreeMap;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared_types::{Address, TOTAL_SUPPLY};
use tangle_ledger::{LedgerConfig, DEFAULT_APPLY_INTERVAL};
use tangle_tip_selection::TipSelectionConfig;
use tangle_validator_manager::ValidatorTrackerConfig;
use thiserror::Error;

use crate::genesis::GenesisConfig;

/// Complete node configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Round clock and replay timestamps.
    pub ledger: LedgerConfig,
    /// Walk validation policy.
    pub tip_selection: TipSelectionConfig,
    /// Validator candidate tracking.
    pub validators: ValidatorTrackerConfig,
    /// Initial snapshot.
    pub genesis: GenesisConfig,
    /// Background worker cadence.
    pub runtime: RuntimeConfig,
}

/// Background worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Pause between round application passes.
    pub apply_interval: Duration,
    /// Pause between status reports.
    pub status_interval: Duration,
    /// Time allowed for workers to stop after cancellation.
    pub shutdown_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            apply_interval: DEFAULT_APPLY_INTERVAL,
            status_interval: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable holds a value that does not parse.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// Quorum confirmation needs at least one validator.
    #[error("No initial validators configured (set TANGLE_VALIDATORS)")]
    NoValidators,
}

impl NodeConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TANGLE_GENESIS_TIME_MS`: Round clock origin
    /// - `TANGLE_ROUND_DURATION_MS`: Round length
    /// - `TANGLE_GENESIS_ADDRESS`: Hex address holding the total supply
    /// - `TANGLE_TRACKER_ADDRESS`: Hex address application bundles are sent to
    /// - `TANGLE_VALIDATORS`: Comma separated hex addresses of the initial validators
    /// - `TANGLE_BELOW_MAX_DEPTH`: Enable the below-max-depth walk check
    /// - `TANGLE_MAX_DEPTH`: Depth limit for the walk check
    /// - `TANGLE_RESCAN_INTERVAL_MS`: Candidate scan cadence
    /// - `TANGLE_APPLY_INTERVAL_MS`: Round application cadence
    /// - `TANGLE_STATUS_INTERVAL_MS`: Status report cadence
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parse::<u64, _>(&lookup, "TANGLE_GENESIS_TIME_MS")? {
            config.ledger.genesis_time_ms = v;
        }
        if let Some(v) = parse::<u64, _>(&lookup, "TANGLE_ROUND_DURATION_MS")? {
            if v == 0 {
                return Err(invalid("TANGLE_ROUND_DURATION_MS", "must be positive"));
            }
            config.ledger.round_duration_ms = v;
        }
        if let Some(address) = parse::<Address, _>(&lookup, "TANGLE_GENESIS_ADDRESS")? {
            config.genesis.allocations = BTreeMap::from([(address, TOTAL_SUPPLY)]);
        }
        config.genesis.timestamp_ms = config.ledger.genesis_time_ms;

        if let Some(address) = parse::<Address, _>(&lookup, "TANGLE_TRACKER_ADDRESS")? {
            config.validators.tracker_address = address;
        }
        if let Some(list) = lookup("TANGLE_VALIDATORS") {
            config.validators.initial_validators = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    Address::from_str(s).map_err(|e| invalid("TANGLE_VALIDATORS", e))
                })
                .collect::<Result<_, _>>()?;
        }
        if let Some(v) = parse::<u64, _>(&lookup, "TANGLE_RESCAN_INTERVAL_MS")? {
            config.validators.rescan_interval = Duration::from_millis(v);
        }

        if let Some(v) = lookup("TANGLE_BELOW_MAX_DEPTH") {
            config.tip_selection.below_max_depth_enabled =
                v.eq_ignore_ascii_case("true") || v == "1";
        }
        if let Some(v) = parse::<u32, _>(&lookup, "TANGLE_MAX_DEPTH")? {
            config.tip_selection.max_depth = v;
        }

        if let Some(v) = parse::<u64, _>(&lookup, "TANGLE_APPLY_INTERVAL_MS")? {
            config.runtime.apply_interval = Duration::from_millis(v);
        }
        if let Some(v) = parse::<u64, _>(&lookup, "TANGLE_STATUS_INTERVAL_MS")? {
            config.runtime.status_interval = Duration::from_millis(v);
        }

        Ok(config)
    }

    /// Check settings that have no safe default.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.validators.initial_validators.is_empty() {
            return Err(ConfigError::NoValidators);
        }
        Ok(())
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| raw.trim().parse::<T>().map_err(|e| invalid(key, e)))
        .transpose()
}

fn invalid(key: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
