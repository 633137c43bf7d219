//! Below-max-depth analysis
//!
//! A tip is too deep when its unconfirmed past references a transaction that
//! was confirmed more than `max_depth` rounds before the snapshot, or when
//! that past is too large to analyze within the budget.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use shared_types::{Hash, RoundIndex, Transaction};
use tangle_ledger::{LedgerApi, TransactionStore};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::error::{TipSelectionError, TipSelectionResult};
use crate::metrics;

pub struct DepthAnalyzer {
    transactions: Arc<dyn TransactionStore>,
    ledger: Arc<dyn LedgerApi>,
    max_depth: RoundIndex,
    max_analyzed: usize,
}

impl DepthAnalyzer {
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        ledger: Arc<dyn LedgerApi>,
        max_depth: RoundIndex,
        max_analyzed: usize,
    ) -> Self {
        Self {
            transactions,
            ledger,
            max_depth,
            max_analyzed,
        }
    }

    /// Oldest round a referenced confirmation may carry.
    pub fn lower_bound(&self) -> RoundIndex {
        self.ledger
            .latest_snapshot_index()
            .saturating_sub(self.max_depth)
    }

    /// Walk the unconfirmed past of `tip`.
    ///
    /// Hashes in `cleared` were analyzed before and are not walked again.
    /// A tip found not below max depth is added to `cleared`.
    pub fn is_below_max_depth(
        &self,
        tip: &Transaction,
        cleared: &mut HashSet<Hash>,
        cancel: Option<&CancellationToken>,
    ) -> TipSelectionResult<bool> {
        let lower_bound = self.lower_bound();
        if tip.round_index != 0 {
            return Ok(tip.round_index < lower_bound);
        }

        let mut queue = VecDeque::from([tip.hash]);
        let mut analyzed: HashSet<Hash> = HashSet::new();

        while let Some(hash) = queue.pop_front() {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return Err(TipSelectionError::Cancelled);
            }
            if !analyzed.insert(hash) || cleared.contains(&hash) {
                continue;
            }
            if analyzed.len() > self.max_analyzed {
                trace!(tip = %tip.hash, analyzed = analyzed.len(), "Depth analysis budget exceeded");
                metrics::record_depth_analyzed(analyzed.len());
                return Ok(true);
            }

            let tx = self.transactions.load(&hash)?;
            let confirmed_in = match self.ledger.solid_entry_point_index(&hash) {
                Some(round) => Some(round),
                None if tx.round_index != 0 => Some(tx.round_index),
                None => None,
            };
            if let Some(round) = confirmed_in {
                if round < lower_bound {
                    trace!(
                        tip = %tip.hash,
                        reference = %hash,
                        round,
                        lower_bound,
                        "Reference confirmed too long ago"
                    );
                    metrics::record_depth_analyzed(analyzed.len());
                    return Ok(true);
                }
                continue;
            }
            queue.push_back(tx.trunk);
            queue.push_back(tx.branch);
        }

        metrics::record_depth_analyzed(analyzed.len());
        cleared.insert(tip.hash);
        Ok(false)
    }
}
