//! # Test Fixtures
//!
//! A ledger harness over the in-memory adapters plus builders for transfers
//! and milestones. Shared by the integration scenarios and the benchmarks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared_types::{
    compute_bundle_hash, Address, Hash, Round, RoundIndex, Transaction, NULL_HASH,
    VALIDATOR_SECURITY,
};
use tangle_ledger::adapters::{
    InMemoryRoundStore, InMemoryTangle, QuorumConfirmedTips, StructuralBundleValidator,
};
use tangle_ledger::{
    LedgerConfig, LedgerDependencies, LedgerResult, LedgerService, RoundStore, Snapshot,
    SnapshotMetadata, SnapshotProvider, SnapshotState, TransactionStore,
};

pub fn h(b: u8) -> Hash {
    Hash([b; 32])
}

/// Address number `n`. Never collides with [`Harness::fresh_hash`] or `h`.
pub fn address(n: u32) -> Address {
    let mut bytes = [0x11u8; 32];
    bytes[..4].copy_from_slice(&n.to_be_bytes());
    Hash(bytes)
}

/// Genesis snapshot at index 0 holding `balances`.
pub fn genesis(balances: &[(Address, i64)]) -> Snapshot {
    Snapshot::new(
        SnapshotMetadata::genesis(0, 0),
        SnapshotState::new(balances.iter().copied().collect()),
    )
}

/// Ledger over in-memory stores with a single-validator quorum.
pub struct Harness {
    pub tangle: Arc<InMemoryTangle>,
    pub rounds: Arc<InMemoryRoundStore>,
    pub snapshots: Arc<SnapshotProvider>,
    pub bundle_validator: Arc<StructuralBundleValidator>,
    pub ledger: Arc<LedgerService>,
    counter: AtomicU64,
}

impl Harness {
    pub fn new(balances: &[(Address, i64)]) -> Self {
        let tangle = Arc::new(InMemoryTangle::new());
        let rounds = Arc::new(InMemoryRoundStore::new());
        Self::with_stores(balances, tangle, rounds)
    }

    /// Harness over existing stores, e.g. to simulate a restart.
    pub fn with_stores(
        balances: &[(Address, i64)],
        tangle: Arc<InMemoryTangle>,
        rounds: Arc<InMemoryRoundStore>,
    ) -> Self {
        let snapshots = Arc::new(
            SnapshotProvider::new(genesis(balances)).expect("genesis balances are consistent"),
        );
        let bundle_validator = Arc::new(StructuralBundleValidator::new(tangle.clone()));
        let ledger = Arc::new(LedgerService::new(LedgerDependencies {
            transactions: tangle.clone(),
            bundle_validator: bundle_validator.clone(),
            rounds: rounds.clone(),
            confirmed_tips: Arc::new(QuorumConfirmedTips::new(
                tangle.clone(),
                rounds.clone(),
                1,
                VALIDATOR_SECURITY,
            )),
            snapshots: snapshots.clone(),
            config: LedgerConfig {
                genesis_time_ms: 0,
                round_duration_ms: 1_000,
            },
        }));
        Self {
            tangle,
            rounds,
            snapshots,
            bundle_validator,
            ledger,
            counter: AtomicU64::new(1),
        }
    }

    /// A hash no other fixture call returns.
    pub fn fresh_hash(&self) -> Hash {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let mut bytes = [0xA5u8; 32];
        bytes[..8].copy_from_slice(&n.to_be_bytes());
        Hash(bytes)
    }

    /// Unstored bundle with one transaction per `(address, value)` entry,
    /// chained by trunk. The head's trunk is `trunk`; every branch is `branch`.
    pub fn bundle(&self, entries: &[(Address, i64)], trunk: Hash, branch: Hash) -> Vec<Transaction> {
        let last_index = entries.len().saturating_sub(1) as u64;
        let mut txs: Vec<Transaction> = entries
            .iter()
            .enumerate()
            .map(|(index, &(address, value))| {
                let mut tx = Transaction::new(self.fresh_hash(), address, value);
                tx.current_index = index as u64;
                tx.last_index = last_index;
                tx.timestamp = self.counter.load(Ordering::SeqCst);
                tx.branch = branch;
                tx.solid = true;
                tx
            })
            .collect();

        let bundle = compute_bundle_hash(txs.iter());
        let hashes: Vec<Hash> = txs.iter().map(|tx| tx.hash).collect();
        for (index, tx) in txs.iter_mut().enumerate() {
            tx.bundle = bundle;
            tx.trunk = hashes.get(index + 1).copied().unwrap_or(trunk);
        }
        txs
    }

    pub fn store_all(&self, txs: Vec<Transaction>) -> Hash {
        let tail = txs.first().map(|tx| tx.hash).unwrap_or(NULL_HASH);
        for tx in txs {
            self.tangle.store(tx).expect("in-memory store");
        }
        tail
    }

    /// Stored solid transfer. Returns the tail hash.
    pub fn transfer(&self, from: Address, to: Address, amount: i64, trunk: Hash, branch: Hash) -> Hash {
        let txs = self.bundle(&[(from, -amount), (to, amount)], trunk, branch);
        self.store_all(txs)
    }

    /// Stored milestone bundle listing `tips` after the signature fragments.
    pub fn milestone(&self, tips: &[Hash]) -> Hash {
        let validator = address(9_999);
        let entries: Vec<(Address, i64)> = (0..=VALIDATOR_SECURITY + 1).map(|_| (validator, 0)).collect();
        let mut txs = self.bundle(&entries, NULL_HASH, NULL_HASH);
        if let Some(carrier) = txs.last_mut() {
            carrier.signature = tips.iter().flat_map(|tip| tip.0).collect();
        }
        self.store_all(txs)
    }

    /// Store a round whose single milestone confirms `tips`.
    pub fn round(&self, index: RoundIndex, tips: &[Hash]) -> Round {
        let round = Round::with_milestones(index, [self.milestone(tips)]);
        self.rounds.store_round(round.clone()).expect("in-memory store");
        round
    }

    pub fn balance(&self, address: &Address) -> i64 {
        self.snapshots.latest().state.balance(address)
    }

    pub fn total(&self) -> i128 {
        self.snapshots.latest().state.total()
    }
}

/// Store double that hands out trunk and branch in random order.
///
/// The balance diff walk must not depend on the order in which it explores
/// a transaction's parents.
pub struct ShufflingStore {
    inner: Arc<InMemoryTangle>,
    rng: Mutex<StdRng>,
}

impl ShufflingStore {
    pub fn new(inner: Arc<InMemoryTangle>, seed: u64) -> Self {
        Self {
            inner,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl TransactionStore for ShufflingStore {
    fn load(&self, hash: &Hash) -> LedgerResult<Transaction> {
        let mut tx = self.inner.load(hash)?;
        if self.rng.lock().gen_bool(0.5) {
            std::mem::swap(&mut tx.trunk, &mut tx.branch);
        }
        Ok(tx)
    }

    fn exists(&self, hash: &Hash) -> LedgerResult<bool> {
        self.inner.exists(hash)
    }

    fn store(&self, transaction: Transaction) -> LedgerResult<bool> {
        self.inner.store(transaction)
    }

    fn set_round_index(&self, hash: &Hash, round: RoundIndex) -> LedgerResult<()> {
        self.inner.set_round_index(hash, round)
    }

    fn set_round_indexes(&self, hashes: &[Hash], round: RoundIndex) -> LedgerResult<()> {
        self.inner.set_round_indexes(hashes, round)
    }

    fn bundle_transactions(&self, bundle: &Hash) -> LedgerResult<Vec<Hash>> {
        self.inner.bundle_transactions(bundle)
    }

    fn address_transactions(&self, address: &Address) -> LedgerResult<Vec<Hash>> {
        self.inner.address_transactions(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tangle_ledger::BundleValidator;

    #[test]
    fn test_transfer_is_a_valid_bundle() {
        let harness = Harness::new(&[(address(0), 10)]);
        let tail = harness.transfer(address(0), address(1), 4, NULL_HASH, NULL_HASH);
        let bundles = harness.bundle_validator.validate(&tail).unwrap();
        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles[0].len(), 2);
    }

    #[test]
    fn test_fresh_hashes_are_unique() {
        let harness = Harness::new(&[(address(0), 10)]);
        assert_ne!(harness.fresh_hash(), harness.fresh_hash());
        assert_ne!(harness.fresh_hash(), address(0));
    }
}
