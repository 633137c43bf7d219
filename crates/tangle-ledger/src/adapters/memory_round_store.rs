//! In-memory round store
//!
//! Rounds, state diffs and validator sets keyed by round index.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use shared_types::{Round, RoundIndex};

use crate::domain::StateDiff;
use crate::error::LedgerResult;
use crate::ports::outbound::{RoundStore, ValidatorSetRecord};

#[derive(Default)]
pub struct InMemoryRoundStore {
    rounds: RwLock<BTreeMap<RoundIndex, Round>>,
    state_diffs: RwLock<BTreeMap<RoundIndex, StateDiff>>,
    validator_sets: RwLock<BTreeMap<RoundIndex, ValidatorSetRecord>>,
}

impl InMemoryRoundStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_diff_count(&self) -> usize {
        self.state_diffs.read().len()
    }
}

impl RoundStore for InMemoryRoundStore {
    fn store_round(&self, round: Round) -> LedgerResult<()> {
        self.rounds.write().entry(round.index).or_insert(round);
        Ok(())
    }

    fn load_round(&self, index: RoundIndex) -> LedgerResult<Option<Round>> {
        Ok(self.rounds.read().get(&index).cloned())
    }

    fn latest_round(&self) -> LedgerResult<Option<Round>> {
        Ok(self
            .rounds
            .read()
            .last_key_value()
            .map(|(_, round)| round.clone()))
    }

    fn store_state_diff(&self, index: RoundIndex, diff: &StateDiff) -> LedgerResult<()> {
        self.state_diffs.write().insert(index, diff.clone());
        Ok(())
    }

    fn load_state_diff(&self, index: RoundIndex) -> LedgerResult<Option<StateDiff>> {
        Ok(self.state_diffs.read().get(&index).cloned())
    }

    fn store_validator_set(&self, record: ValidatorSetRecord) -> LedgerResult<()> {
        self.validator_sets.write().insert(record.start_round, record);
        Ok(())
    }

    fn load_validator_set_at_or_before(
        &self,
        index: RoundIndex,
    ) -> LedgerResult<Option<ValidatorSetRecord>> {
        Ok(self
            .validator_sets
            .read()
            .range(..=index)
            .next_back()
            .map(|(_, record)| record.clone()))
    }
}
