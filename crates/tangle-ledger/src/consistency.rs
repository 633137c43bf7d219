//! Ledger consistency checks for tip selection
//!
//! Answers "would accepting this tip keep every balance non-negative and the
//! supply conserved", memoizing accepted walks inside a
//! [`ConsistencySession`].

use std::sync::Arc;

use shared_types::Hash;
use tracing::debug;

use crate::balance_diff::BalanceDiffEngine;
use crate::domain::{merge_diffs, ConsistencySession, SnapshotProvider, StateDiff};
use crate::error::{LedgerError, LedgerResult};
use crate::metrics;
use crate::ports::outbound::TransactionStore;

pub struct LedgerConsistencyChecker {
    transactions: Arc<dyn TransactionStore>,
    engine: Arc<BalanceDiffEngine>,
    snapshots: Arc<SnapshotProvider>,
}

impl LedgerConsistencyChecker {
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        engine: Arc<BalanceDiffEngine>,
        snapshots: Arc<SnapshotProvider>,
    ) -> Self {
        Self {
            transactions,
            engine,
            snapshots,
        }
    }

    /// Check `tip` against the session and commit it on success.
    ///
    /// Fails with [`LedgerError::TipNotSolid`] for a tip that is not solid.
    /// A rejected tip leaves the session untouched.
    pub fn is_balance_diff_consistent(
        &self,
        session: &mut ConsistencySession,
        tip: &Hash,
    ) -> LedgerResult<bool> {
        let tip_tx = self.transactions.load(tip)?;
        if !tip_tx.solid {
            return Err(LedgerError::TipNotSolid { tip: *tip });
        }
        if session.is_approved(tip) {
            metrics::record_consistency_check("memoized");
            return Ok(true);
        }

        let mut visited = session.fork_visited();
        let snapshot = self.snapshots.latest();
        let Some(local) = self
            .engine
            .generate_balance_diff(&mut visited, [*tip], snapshot.index())?
        else {
            debug!(tip = %tip, "Balance diff unavailable");
            metrics::record_consistency_check("unavailable");
            return Ok(false);
        };

        let merged = merge_diffs(session.diff(), &local)?;
        let conserves_supply = StateDiff::new(merged.clone()).is_zero_sum();
        let consistent = conserves_supply && snapshot.state.patched_state(&merged)?.is_consistent();
        drop(snapshot);

        if !consistent {
            debug!(tip = %tip, conserves_supply, "Tip would make the ledger inconsistent");
            metrics::record_consistency_check("inconsistent");
            return Ok(false);
        }

        session.commit(visited, merged);
        metrics::record_consistency_check("consistent");
        Ok(true)
    }

    /// Check a list of tips in order against one fresh session.
    ///
    /// Stops at the first tip that is not consistent.
    pub fn tips_consistent(&self, tips: &[Hash]) -> LedgerResult<bool> {
        let mut session = ConsistencySession::new();
        for tip in tips {
            if !self.is_balance_diff_consistent(&mut session, tip)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
