//! Quorum confirmed-tip resolver
//!
//! Every milestone bundle lists the tips its validator saw, written into the
//! signature region of the transactions that follow the signature fragments
//! (`current_index > security`). A tip is confirmed for the round when at
//! least two thirds of the validators active in that round reference it.
//! The active set comes from the validator-set records in the round store;
//! rounds before the first record use the configured count.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use shared_types::{Hash, HashKind, RoundIndex, MAX_TIPS_PER_MILESTONE};
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::ports::outbound::{ConfirmedTipResolver, RoundStore, TransactionStore};

pub struct QuorumConfirmedTips {
    transactions: Arc<dyn TransactionStore>,
    rounds: Arc<dyn RoundStore>,
    initial_validators: usize,
    security: u64,
}

impl QuorumConfirmedTips {
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        rounds: Arc<dyn RoundStore>,
        initial_validators: usize,
        security: u64,
    ) -> Self {
        Self {
            transactions,
            rounds,
            initial_validators,
            security,
        }
    }

    /// Size of the validator set active in `round`.
    pub fn active_validators(&self, round: RoundIndex) -> LedgerResult<usize> {
        match self.rounds.load_validator_set_at_or_before(round)? {
            Some(record) if !record.validators.is_empty() => Ok(record.validators.len()),
            _ => Ok(self.initial_validators),
        }
    }

    /// References required for a tip to count as confirmed in `round`.
    pub fn quorum(&self, round: RoundIndex) -> LedgerResult<usize> {
        Ok((2 * self.active_validators(round)? / 3).max(1))
    }

    /// Tips referenced by the bundle of one milestone transaction.
    pub fn tip_set(&self, milestone: &Hash) -> LedgerResult<HashSet<Hash>> {
        let milestone_tx = self.transactions.load(milestone)?;
        let mut tips = HashSet::new();
        if milestone_tx.is_prefilled() {
            return Ok(tips);
        }

        for hash in self.transactions.bundle_transactions(&milestone_tx.bundle)? {
            let tx = self.transactions.load(&hash)?;
            if tx.current_index <= self.security {
                continue;
            }
            for slot in 0..MAX_TIPS_PER_MILESTONE {
                let offset = slot * Hash::SIZE_IN_BYTES;
                if offset + Hash::SIZE_IN_BYTES > tx.signature.len() {
                    break;
                }
                let tip = HashKind::Transaction
                    .create_at(&tx.signature, offset)
                    .map_err(|e| LedgerError::storage(e.to_string()))?;
                if tip.is_null() {
                    break;
                }
                tips.insert(tip);
            }
        }
        Ok(tips)
    }
}

impl ConfirmedTipResolver for QuorumConfirmedTips {
    fn confirmed_tips(&self, round: RoundIndex) -> LedgerResult<HashSet<Hash>> {
        let Some(round) = self.rounds.load_round(round)? else {
            return Ok(HashSet::new());
        };

        let mut occurrences: HashMap<Hash, usize> = HashMap::new();
        for milestone in &round.milestones {
            for tip in self.tip_set(milestone)? {
                *occurrences.entry(tip).or_insert(0) += 1;
            }
        }

        let quorum = self.quorum(round.index)?;
        let confirmed: HashSet<Hash> = occurrences
            .into_iter()
            .filter(|(_, count)| *count >= quorum)
            .map(|(tip, _)| tip)
            .collect();
        debug!(
            round = round.index,
            quorum,
            confirmed = confirmed.len(),
            "Resolved confirmed tips"
        );
        Ok(confirmed)
    }
}
