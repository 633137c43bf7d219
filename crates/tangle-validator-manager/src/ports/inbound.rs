//! Driving Ports (API - Inbound)

use std::collections::BTreeSet;

use shared_types::{Address, Hash, RoundIndex};

use crate::error::ValidatorManagerResult;

/// Read access to the validator set, plus early candidate notification.
pub trait ValidatorTrackerApi: Send + Sync {
    /// Snapshot of the current validators.
    fn validators(&self) -> BTreeSet<Address>;

    /// Round at which the current validators take effect.
    fn start_round(&self) -> RoundIndex;

    /// Validators in effect at `round`.
    fn validators_of_round(&self, round: RoundIndex) -> ValidatorManagerResult<BTreeSet<Address>>;

    /// Queue a candidate ahead of the next scan. Returns `false` if it was
    /// seen before.
    fn add_candidate(&self, hash: Hash) -> bool;
}
