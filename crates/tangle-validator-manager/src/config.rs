//! Configuration for the candidate tracker

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared_types::{
    Address, RoundIndex, CANDIDATE_RESCAN_INTERVAL_MS, MAX_CANDIDATES_TO_ANALYZE, NULL_HASH,
    START_ROUND_DELAY, VALIDATOR_SECURITY,
};

/// Hash function family used by candidate signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SignatureMode {
    #[default]
    Sha3,
    Keccak,
}

/// Candidate tracker configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidatorTrackerConfig {
    /// Address application bundles are sent to
    pub tracker_address: Address,
    /// Validators used when nothing was persisted
    pub initial_validators: BTreeSet<Address>,
    /// Rounds between accepting a candidate and its activation
    pub start_round_delay: RoundIndex,
    /// Signature security level of application bundles
    pub security_level: u64,
    pub signature_mode: SignatureMode,
    /// Candidates analyzed per tick
    pub max_candidates_per_tick: usize,
    /// Pause between ticks
    pub rescan_interval: Duration,
}

impl Default for ValidatorTrackerConfig {
    fn default() -> Self {
        Self {
            tracker_address: NULL_HASH,
            initial_validators: BTreeSet::new(),
            start_round_delay: START_ROUND_DELAY,
            security_level: VALIDATOR_SECURITY,
            signature_mode: SignatureMode::default(),
            max_candidates_per_tick: MAX_CANDIDATES_TO_ANALYZE,
            rescan_interval: Duration::from_millis(CANDIDATE_RESCAN_INTERVAL_MS),
        }
    }
}
