//! Balance diff generation
//!
//! Walks the DAG backwards from a set of start transactions and sums the
//! values of every valid bundle that is not yet confirmed.
//!
//! ```text
//!   start ──► FIFO queue ──► visited? ──► confirmed? ──► prefilled ──► None
//!                ▲                                         │
//!                │                                    tail: bundle ──► counted? ──► accumulate
//!                └──────────── trunk, branch ◄─────────────┘
//! ```
//!
//! Every transaction hash is counted at most once per walk, so the result
//! does not depend on the order in which trunk and branch are explored.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use shared_types::{Hash, RoundIndex, Transaction};
use tracing::trace;

use crate::domain::{accumulate, BalanceDiff, SnapshotProvider};
use crate::error::LedgerResult;
use crate::metrics;
use crate::ports::outbound::{BundleValidator, TransactionStore};

pub struct BalanceDiffEngine {
    transactions: Arc<dyn TransactionStore>,
    bundle_validator: Arc<dyn BundleValidator>,
    snapshots: Arc<SnapshotProvider>,
}

impl BalanceDiffEngine {
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        bundle_validator: Arc<dyn BundleValidator>,
        snapshots: Arc<SnapshotProvider>,
    ) -> Self {
        Self {
            transactions,
            bundle_validator,
            snapshots,
        }
    }

    /// Net balance change of everything reachable from `start` that is not
    /// confirmed at or before `boundary`.
    ///
    /// `visited` is extended with every hash the walk dequeues; hashes that
    /// are already in it are not walked again. Returns `None` when the walk
    /// meets a transaction that is missing or the tail of an invalid bundle.
    /// Solidity is not checked here; a stored transaction with missing
    /// ancestors still ends the walk at the first missing one.
    pub fn generate_balance_diff<I>(
        &self,
        visited: &mut HashSet<Hash>,
        start: I,
        boundary: RoundIndex,
    ) -> LedgerResult<Option<BalanceDiff>>
    where
        I: IntoIterator<Item = Hash>,
    {
        let entry_points = &self.snapshots.initial().metadata.solid_entry_points;
        let mut counted: HashSet<Hash> = entry_points.keys().copied().collect();
        visited.extend(entry_points.keys().copied());

        let mut queue: VecDeque<Hash> = start.into_iter().collect();
        let mut diff = BalanceDiff::new();
        let mut walked = 0usize;

        while let Some(hash) = queue.pop_front() {
            if !visited.insert(hash) {
                continue;
            }
            walked += 1;

            let tx = self.transactions.load(&hash)?;
            if tx.is_confirmed_by(boundary) {
                continue;
            }
            if tx.is_prefilled() {
                trace!(tx = %hash, "Walk reached a transaction that is not stored");
                metrics::record_balance_diff_visited(walked);
                return Ok(None);
            }

            if tx.is_tail() && !self.count_bundle(&tx, &mut counted, &mut diff)? {
                metrics::record_balance_diff_visited(walked);
                return Ok(None);
            }

            if !visited.contains(&tx.trunk) {
                queue.push_back(tx.trunk);
            }
            if !visited.contains(&tx.branch) {
                queue.push_back(tx.branch);
            }
        }

        diff.retain(|_, delta| *delta != 0);
        metrics::record_balance_diff_visited(walked);
        Ok(Some(diff))
    }

    /// Accumulate the bundle that starts at `tail`. Returns `false` when no
    /// consistent bundle starts there.
    fn count_bundle(
        &self,
        tail: &Transaction,
        counted: &mut HashSet<Hash>,
        diff: &mut BalanceDiff,
    ) -> LedgerResult<bool> {
        for bundle in self.bundle_validator.validate(&tail.hash)? {
            if self.bundle_validator.is_inconsistent(&bundle) {
                trace!(tail = %tail.hash, "Bundle values do not sum to zero");
                return Ok(false);
            }
            if bundle.first().map(|first| first.hash) != Some(tail.hash) {
                continue;
            }
            for tx in &bundle {
                if tx.value != 0 && counted.insert(tx.hash) {
                    accumulate(diff, tx.address, tx.value)?;
                }
            }
            return Ok(true);
        }
        trace!(tail = %tail.hash, "No valid bundle starts at tail");
        Ok(false)
    }
}
