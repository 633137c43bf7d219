//! Driven Ports (SPI - Outbound Dependencies)
//!
//! Collaborators the ledger consumes. Implementations must tolerate
//! concurrent reads while a DAG walk is in progress.

use std::collections::{BTreeSet, HashSet};

use shared_types::{Address, Hash, Round, RoundIndex, Transaction};

use crate::domain::StateDiff;
use crate::error::LedgerResult;

/// Transaction storage keyed by hash.
pub trait TransactionStore: Send + Sync {
    /// Load a transaction.
    ///
    /// A hash that is not stored yields a `Prefilled` placeholder carrying
    /// that hash, never an error.
    fn load(&self, hash: &Hash) -> LedgerResult<Transaction>;

    fn exists(&self, hash: &Hash) -> LedgerResult<bool>;

    /// Store a transaction. Returns `false` if it was already present.
    fn store(&self, transaction: Transaction) -> LedgerResult<bool>;

    /// Set the confirming round of an unconfirmed transaction.
    ///
    /// Already confirmed transactions keep their round.
    fn set_round_index(&self, hash: &Hash, round: RoundIndex) -> LedgerResult<()>;

    /// Confirm a batch of transactions.
    ///
    /// Adapters that can commit atomically should override this.
    fn set_round_indexes(&self, hashes: &[Hash], round: RoundIndex) -> LedgerResult<()> {
        for hash in hashes {
            self.set_round_index(hash, round)?;
        }
        Ok(())
    }

    /// Hashes of all transactions sharing a bundle hash.
    fn bundle_transactions(&self, bundle: &Hash) -> LedgerResult<Vec<Hash>>;

    /// Hashes of all transactions sent to an address, in arrival order.
    fn address_transactions(&self, address: &Address) -> LedgerResult<Vec<Hash>>;
}

/// Signature-independent bundle integrity check.
pub trait BundleValidator: Send + Sync {
    /// Candidate bundles starting at `tail`, each ordered tail to head.
    ///
    /// Structurally invalid bundles yield an empty list.
    fn validate(&self, tail: &Hash) -> LedgerResult<Vec<Vec<Transaction>>>;

    /// A bundle is inconsistent when it is empty or its values do not
    /// sum to zero.
    fn is_inconsistent(&self, bundle: &[Transaction]) -> bool {
        if bundle.is_empty() {
            return true;
        }
        let sum: i128 = bundle
            .iter()
            .filter(|tx| tx.value != 0)
            .map(|tx| i128::from(tx.value))
            .sum();
        sum != 0
    }
}

/// Tips a round confirms.
pub trait ConfirmedTipResolver: Send + Sync {
    fn confirmed_tips(&self, round: RoundIndex) -> LedgerResult<HashSet<Hash>>;
}

/// A validator set together with the round it became active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorSetRecord {
    pub start_round: RoundIndex,
    pub validators: BTreeSet<Address>,
}

/// Persistence for rounds, their state diffs and validator sets.
pub trait RoundStore: Send + Sync {
    /// Store a round. Stored rounds are immutable; a second store of the
    /// same index is ignored.
    fn store_round(&self, round: Round) -> LedgerResult<()>;

    fn load_round(&self, index: RoundIndex) -> LedgerResult<Option<Round>>;

    /// Round with the highest stored index.
    fn latest_round(&self) -> LedgerResult<Option<Round>>;

    fn store_state_diff(&self, index: RoundIndex, diff: &StateDiff) -> LedgerResult<()>;

    fn load_state_diff(&self, index: RoundIndex) -> LedgerResult<Option<StateDiff>>;

    fn store_validator_set(&self, record: ValidatorSetRecord) -> LedgerResult<()>;

    /// Newest validator set whose start round is at or before `index`.
    fn load_validator_set_at_or_before(
        &self,
        index: RoundIndex,
    ) -> LedgerResult<Option<ValidatorSetRecord>>;
}
