//! Active validator set

use std::collections::BTreeSet;

use shared_types::{Address, RoundIndex};
use tangle_ledger::ValidatorSetRecord;

/// Validators together with the round they take effect.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidatorSet {
    pub validators: BTreeSet<Address>,
    pub start_round: RoundIndex,
}

impl ValidatorSet {
    pub fn new(validators: BTreeSet<Address>, start_round: RoundIndex) -> Self {
        Self {
            validators,
            start_round,
        }
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.validators.contains(address)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Replace `old` by `new`, effective from `start_round`.
    ///
    /// Returns `false` and leaves the set unchanged when `old` is not a
    /// member.
    pub fn rotate(&mut self, old: &Address, new: Address, start_round: RoundIndex) -> bool {
        if !self.validators.remove(old) {
            return false;
        }
        self.validators.insert(new);
        self.start_round = start_round;
        true
    }

    pub fn to_record(&self) -> ValidatorSetRecord {
        ValidatorSetRecord {
            start_round: self.start_round,
            validators: self.validators.clone(),
        }
    }
}

impl From<ValidatorSetRecord> for ValidatorSet {
    fn from(record: ValidatorSetRecord) -> Self {
        Self::new(record.validators, record.start_round)
    }
}
