//! Snapshot model: balances plus the metadata of the last applied round.
//!
//! The provider keeps two snapshots. The initial one is immutable and owns
//! the solid entry points. The latest one is the only shared mutable ledger
//! state of the node and sits behind a read/write lock.

use std::collections::{BTreeSet, HashMap};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash, RoundIndex, NULL_HASH};

use crate::error::{LedgerError, LedgerResult};

/// Address to signed delta, produced by a DAG walk.
pub type BalanceDiff = HashMap<Address, i64>;

/// Add `delta` to the entry for `address`, failing on overflow.
pub fn accumulate(diff: &mut BalanceDiff, address: Address, delta: i64) -> LedgerResult<()> {
    let entry = diff.entry(address).or_insert(0);
    *entry = entry
        .checked_add(delta)
        .ok_or(LedgerError::BalanceOverflow { address })?;
    Ok(())
}

/// Sum of two diffs. Neither input is modified.
pub fn merge_diffs(base: &BalanceDiff, other: &BalanceDiff) -> LedgerResult<BalanceDiff> {
    let mut merged = base.clone();
    for (address, delta) in other {
        accumulate(&mut merged, *address, *delta)?;
    }
    Ok(merged)
}

/// Balance changes committed for one round.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateDiff {
    pub state: BalanceDiff,
}

impl StateDiff {
    pub fn new(state: BalanceDiff) -> Self {
        Self { state }
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// A diff conserves supply when its deltas sum to zero.
    pub fn is_zero_sum(&self) -> bool {
        self.state.values().map(|v| i128::from(*v)).sum::<i128>() == 0
    }
}

/// Address balances.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SnapshotState {
    balances: HashMap<Address, i64>,
}

impl SnapshotState {
    pub fn new(balances: HashMap<Address, i64>) -> Self {
        Self { balances }
    }

    pub fn balance(&self, address: &Address) -> i64 {
        self.balances.get(address).copied().unwrap_or(0)
    }

    pub fn balances(&self) -> &HashMap<Address, i64> {
        &self.balances
    }

    /// No address holds a negative balance.
    pub fn is_consistent(&self) -> bool {
        self.balances.values().all(|b| *b >= 0)
    }

    pub fn total(&self) -> i128 {
        self.balances.values().map(|v| i128::from(*v)).sum()
    }

    pub fn has_correct_supply(&self, supply: i64) -> bool {
        self.total() == i128::from(supply)
    }

    /// Resulting balances of the addresses touched by `diff`.
    ///
    /// Only those addresses are present in the returned state.
    pub fn patched_state(&self, diff: &BalanceDiff) -> LedgerResult<SnapshotState> {
        let mut patched = HashMap::with_capacity(diff.len());
        for (address, delta) in diff {
            let balance = self
                .balance(address)
                .checked_add(*delta)
                .ok_or(LedgerError::BalanceOverflow { address: *address })?;
            patched.insert(*address, balance);
        }
        Ok(SnapshotState::new(patched))
    }

    /// Apply a zero-sum diff in place. Nothing changes on error.
    pub fn apply_state_diff(&mut self, round: RoundIndex, diff: &StateDiff) -> LedgerResult<()> {
        if !diff.is_zero_sum() {
            return Err(LedgerError::InconsistentStateDiff { round });
        }
        let patched = self.patched_state(&diff.state)?;
        for (address, balance) in patched.balances {
            if balance == 0 {
                self.balances.remove(&address);
            } else {
                self.balances.insert(address, balance);
            }
        }
        Ok(())
    }
}

/// Position of a snapshot in round history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Last applied round.
    pub index: RoundIndex,
    /// Merkle root of the last applied round.
    pub hash: Hash,
    /// Start time of the last applied round, in milliseconds.
    pub timestamp: u64,
    pub initial_index: RoundIndex,
    /// Boundary transactions below which history is not replayed, with the
    /// round that confirmed them.
    pub solid_entry_points: HashMap<Hash, RoundIndex>,
    /// Rounds passed over during replay because they were never stored.
    pub skipped_rounds: BTreeSet<RoundIndex>,
}

impl SnapshotMetadata {
    pub fn genesis(index: RoundIndex, timestamp: u64) -> Self {
        let mut solid_entry_points = HashMap::new();
        solid_entry_points.insert(NULL_HASH, index);
        Self {
            index,
            hash: NULL_HASH,
            timestamp,
            initial_index: index,
            solid_entry_points,
            skipped_rounds: BTreeSet::new(),
        }
    }

    pub fn is_solid_entry_point(&self, hash: &Hash) -> bool {
        self.solid_entry_points.contains_key(hash)
    }
}

/// Ledger state at one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    pub state: SnapshotState,
}

impl Snapshot {
    pub fn new(metadata: SnapshotMetadata, state: SnapshotState) -> Self {
        Self { metadata, state }
    }

    pub fn index(&self) -> RoundIndex {
        self.metadata.index
    }

    pub fn hash(&self) -> Hash {
        self.metadata.hash
    }
}

/// Holder of the initial and latest snapshots.
#[derive(Debug)]
pub struct SnapshotProvider {
    initial: Snapshot,
    total_supply: i64,
    latest: RwLock<Snapshot>,
}

impl SnapshotProvider {
    /// Build a provider from a genesis snapshot.
    ///
    /// The snapshot must be consistent. Its balances define the total supply.
    pub fn new(initial: Snapshot) -> LedgerResult<Self> {
        if !initial.state.is_consistent() {
            return Err(LedgerError::InvalidSnapshot {
                reason: "initial balances contain a negative entry".to_string(),
            });
        }
        let total = initial.state.total();
        let total_supply = i64::try_from(total).map_err(|_| LedgerError::SupplyMismatch {
            expected: i64::MAX,
            actual: total,
        })?;
        Ok(Self {
            latest: RwLock::new(initial.clone()),
            initial,
            total_supply,
        })
    }

    /// Build a provider and require the balances to equal `supply`.
    pub fn with_supply(initial: Snapshot, supply: i64) -> LedgerResult<Self> {
        if !initial.state.has_correct_supply(supply) {
            return Err(LedgerError::SupplyMismatch {
                expected: supply,
                actual: initial.state.total(),
            });
        }
        Self::new(initial)
    }

    pub fn initial(&self) -> &Snapshot {
        &self.initial
    }

    pub fn total_supply(&self) -> i64 {
        self.total_supply
    }

    pub fn is_solid_entry_point(&self, hash: &Hash) -> bool {
        self.initial.metadata.is_solid_entry_point(hash)
    }

    /// Round that confirmed a solid entry point.
    pub fn solid_entry_point_index(&self, hash: &Hash) -> Option<RoundIndex> {
        self.initial.metadata.solid_entry_points.get(hash).copied()
    }

    /// Shared access for consistency checks.
    pub fn latest(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.latest.read()
    }

    /// Exclusive access for round replay.
    pub fn latest_mut(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.latest.write()
    }

    pub fn latest_index(&self) -> RoundIndex {
        self.latest.read().index()
    }
}
