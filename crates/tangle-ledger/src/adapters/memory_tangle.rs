//! In-memory Tangle
//!
//! Implements `TransactionStore` over hash maps guarded by a single
//! read/write lock. Batch confirmation happens under one write guard, so a
//! reader never observes half of a round's confirmations.

use std::collections::{BTreeSet, HashMap};

use parking_lot::RwLock;
use shared_types::{Address, Hash, RoundIndex, Transaction, NULL_HASH};

use crate::error::LedgerResult;
use crate::ports::outbound::TransactionStore;

#[derive(Default)]
struct TangleIndex {
    transactions: HashMap<Hash, Transaction>,
    bundles: HashMap<Hash, BTreeSet<Hash>>,
    addresses: HashMap<Address, Vec<Hash>>,
}

impl TangleIndex {
    fn confirm(&mut self, hash: &Hash, round: RoundIndex) {
        if let Some(tx) = self.transactions.get_mut(hash) {
            if tx.round_index == 0 {
                tx.round_index = round;
            }
        }
    }
}

/// Hash-map backed transaction store.
#[derive(Default)]
pub struct InMemoryTangle {
    inner: RwLock<TangleIndex>,
}

impl InMemoryTangle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a stored transaction to solid. Returns `false` if it was
    /// unknown or already solid.
    pub fn mark_solid(&self, hash: &Hash) -> bool {
        let mut inner = self.inner.write();
        match inner.transactions.get_mut(hash) {
            Some(tx) if !tx.solid => {
                tx.solid = true;
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The genesis vertex every walk ends in.
fn genesis() -> Transaction {
    let mut tx = Transaction::new(NULL_HASH, NULL_HASH, 0);
    tx.solid = true;
    tx
}

impl TransactionStore for InMemoryTangle {
    fn load(&self, hash: &Hash) -> LedgerResult<Transaction> {
        if hash.is_null() {
            return Ok(genesis());
        }
        Ok(self
            .inner
            .read()
            .transactions
            .get(hash)
            .cloned()
            .unwrap_or_else(|| Transaction::prefilled(*hash)))
    }

    fn exists(&self, hash: &Hash) -> LedgerResult<bool> {
        Ok(hash.is_null() || self.inner.read().transactions.contains_key(hash))
    }

    fn store(&self, transaction: Transaction) -> LedgerResult<bool> {
        let mut inner = self.inner.write();
        if inner.transactions.contains_key(&transaction.hash) {
            return Ok(false);
        }
        inner
            .bundles
            .entry(transaction.bundle)
            .or_default()
            .insert(transaction.hash);
        inner
            .addresses
            .entry(transaction.address)
            .or_default()
            .push(transaction.hash);
        inner.transactions.insert(transaction.hash, transaction);
        Ok(true)
    }

    fn set_round_index(&self, hash: &Hash, round: RoundIndex) -> LedgerResult<()> {
        self.inner.write().confirm(hash, round);
        Ok(())
    }

    fn set_round_indexes(&self, hashes: &[Hash], round: RoundIndex) -> LedgerResult<()> {
        let mut inner = self.inner.write();
        for hash in hashes {
            inner.confirm(hash, round);
        }
        Ok(())
    }

    fn bundle_transactions(&self, bundle: &Hash) -> LedgerResult<Vec<Hash>> {
        Ok(self
            .inner
            .read()
            .bundles
            .get(bundle)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }

    fn address_transactions(&self, address: &Address) -> LedgerResult<Vec<Hash>> {
        Ok(self
            .inner
            .read()
            .addresses
            .get(address)
            .cloned()
            .unwrap_or_default())
    }
}
