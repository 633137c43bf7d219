//! # Genesis Snapshot Builder
//!
//! Creates and validates the initial ledger snapshot.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use shared_types::{Address, RoundIndex, GENESIS_TIME_MS, NULL_HASH, TOTAL_SUPPLY};
use tangle_ledger::{Snapshot, SnapshotMetadata, SnapshotState};
use thiserror::Error;

/// Genesis snapshot creation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenesisError {
    /// No address holds any balance.
    #[error("Genesis allocation is empty")]
    EmptyAllocation,

    /// An allocation is negative.
    #[error("Negative genesis allocation for {address}: {amount}")]
    NegativeAllocation { address: Address, amount: i64 },

    /// Allocations do not add up to the configured supply.
    #[error("Genesis allocations sum to {actual}, expected {expected}")]
    SupplyMismatch { expected: i64, actual: i128 },
}

/// Genesis snapshot configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Round index the ledger starts at.
    pub initial_index: RoundIndex,

    /// Genesis timestamp (Unix milliseconds).
    pub timestamp_ms: u64,

    /// Total supply the allocations must add up to.
    pub total_supply: i64,

    /// Initial balances.
    pub allocations: BTreeMap<Address, i64>,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            initial_index: 0,
            timestamp_ms: GENESIS_TIME_MS,
            total_supply: TOTAL_SUPPLY,
            allocations: BTreeMap::from([(NULL_HASH, TOTAL_SUPPLY)]),
        }
    }
}

impl GenesisConfig {
    /// Entire supply held by one address.
    pub fn single_holder(address: Address) -> Self {
        Self {
            allocations: BTreeMap::from([(address, TOTAL_SUPPLY)]),
            ..Self::default()
        }
    }
}

/// Builder for the genesis snapshot.
pub struct GenesisBuilder {
    config: GenesisConfig,
}

impl GenesisBuilder {
    pub fn new(config: GenesisConfig) -> Self {
        Self { config }
    }

    /// Validate the allocations and build the snapshot.
    ///
    /// Zero allocations are dropped. The only solid entry point is the null
    /// hash, confirmed at the initial index.
    pub fn build(&self) -> Result<Snapshot, GenesisError> {
        let mut balances = HashMap::new();
        let mut total: i128 = 0;
        for (&address, &amount) in &self.config.allocations {
            if amount < 0 {
                return Err(GenesisError::NegativeAllocation { address, amount });
            }
            if amount == 0 {
                continue;
            }
            total += i128::from(amount);
            balances.insert(address, amount);
        }

        if balances.is_empty() {
            return Err(GenesisError::EmptyAllocation);
        }
        if total != i128::from(self.config.total_supply) {
            return Err(GenesisError::SupplyMismatch {
                expected: self.config.total_supply,
                actual: total,
            });
        }

        Ok(Snapshot::new(
            SnapshotMetadata::genesis(self.config.initial_index, self.config.timestamp_ms),
            SnapshotState::new(balances),
        ))
    }
}
