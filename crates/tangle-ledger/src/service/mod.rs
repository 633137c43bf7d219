//! Ledger Service - Core business logic
//!
//! Owns the balance diff engine, the consistency checker and the round
//! applier, wired from explicit dependencies.
//!
//! # Round application
//!
//! ```text
//! apply(round N)
//!   ├─ N <= snapshot index ─────────────────────────────► Ok(false)  already applied
//!   ├─ stored round in (index, N) ──────────────────────► RoundOutOfOrder
//!   ├─ milestones already confirmed with N ──┐
//!   └─ read lock: tips → diff → patch check  │  None / negative ─► Ok(false)  retry later
//!        └─ persist StateDiff                │
//!        └─ confirm walk + milestones (batch)│
//!                                            ▼
//!                        replay (index, N] under write lock ─────► Ok(true)
//! ```
//!
//! The StateDiff is persisted before the confirmations. A round whose
//! milestones carry its index is therefore fully committed, and restart only
//! has to replay it.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use shared_types::{
    round_start_time, Hash, Round, RoundIndex, EMPTY_ROUND_HASH, GENESIS_TIME_MS,
    ROUND_DURATION_MS,
};
use tracing::{debug, info, warn};

use crate::balance_diff::BalanceDiffEngine;
use crate::consistency::LedgerConsistencyChecker;
use crate::domain::{accumulate, BalanceDiff, ConsistencySession, Snapshot, SnapshotProvider, StateDiff};
use crate::error::{LedgerError, LedgerResult};
use crate::metrics;
use crate::ports::inbound::LedgerApi;
use crate::ports::outbound::{BundleValidator, ConfirmedTipResolver, RoundStore, TransactionStore};


/// Ledger configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Genesis timestamp (milliseconds)
    pub genesis_time_ms: u64,
    /// Round length (milliseconds)
    pub round_duration_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            genesis_time_ms: GENESIS_TIME_MS,
            round_duration_ms: ROUND_DURATION_MS,
        }
    }
}

/// Dependencies for LedgerService
pub struct LedgerDependencies {
    pub transactions: Arc<dyn TransactionStore>,
    pub bundle_validator: Arc<dyn BundleValidator>,
    pub rounds: Arc<dyn RoundStore>,
    pub confirmed_tips: Arc<dyn ConfirmedTipResolver>,
    pub snapshots: Arc<SnapshotProvider>,
    pub config: LedgerConfig,
}

/// Ledger Service
pub struct LedgerService {
    config: LedgerConfig,
    transactions: Arc<dyn TransactionStore>,
    rounds: Arc<dyn RoundStore>,
    confirmed_tips: Arc<dyn ConfirmedTipResolver>,
    snapshots: Arc<SnapshotProvider>,
    engine: Arc<BalanceDiffEngine>,
    checker: LedgerConsistencyChecker,
    /// Serializes round application and replay.
    apply_lock: Mutex<()>,
}

impl LedgerService {
    /// Create a new LedgerService
    pub fn new(deps: LedgerDependencies) -> Self {
        let engine = Arc::new(BalanceDiffEngine::new(
            Arc::clone(&deps.transactions),
            deps.bundle_validator,
            Arc::clone(&deps.snapshots),
        ));
        let checker = LedgerConsistencyChecker::new(
            Arc::clone(&deps.transactions),
            Arc::clone(&engine),
            Arc::clone(&deps.snapshots),
        );
        Self {
            config: deps.config,
            transactions: deps.transactions,
            rounds: deps.rounds,
            confirmed_tips: deps.confirmed_tips,
            snapshots: deps.snapshots,
            engine,
            checker,
            apply_lock: Mutex::new(()),
        }
    }

    pub fn snapshots(&self) -> &Arc<SnapshotProvider> {
        &self.snapshots
    }

    /// Copy of the latest snapshot.
    pub fn latest_snapshot(&self) -> Snapshot {
        self.snapshots.latest().clone()
    }

    /// A round is committed once every milestone carries its index.
    fn is_committed(&self, round: &Round) -> LedgerResult<bool> {
        if round.milestones.is_empty() {
            return Ok(false);
        }
        for milestone in &round.milestones {
            if self.transactions.load(milestone)?.round_index != round.index {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Compute, check and persist the effects of `round`.
    ///
    /// Returns `false` when the round cannot be applied yet.
    fn commit_round(&self, round: &Round) -> LedgerResult<bool> {
        let (diff, visited) = {
            let snapshot = self.snapshots.latest();
            let tips = self.confirmed_tips.confirmed_tips(round.index)?;
            let mut visited = HashSet::new();
            // Stops only at rounds the snapshot already holds, so a retry
            // walks through transactions a failed commit already marked.
            let boundary = snapshot.index();

            let Some(diff) = self
                .engine
                .generate_balance_diff(&mut visited, tips, boundary)?
            else {
                debug!(round = round.index, "Round is not processable yet");
                metrics::record_round_deferred("diff_unavailable");
                return Ok(false);
            };

            if !snapshot.state.patched_state(&diff)?.is_consistent() {
                warn!(round = round.index, "Round would leave a negative balance");
                metrics::record_round_deferred("inconsistent");
                return Ok(false);
            }
            (diff, visited)
        };

        let state_diff = StateDiff::new(diff);
        if !state_diff.is_zero_sum() {
            return Err(LedgerError::InconsistentStateDiff { round: round.index });
        }
        if !state_diff.is_empty() {
            self.rounds.store_state_diff(round.index, &state_diff)?;
        }

        // Milestones go last: the round only counts as committed once
        // everything it confirms carries its index.
        let mut confirmed: Vec<Hash> = visited
            .into_iter()
            .filter(|hash| {
                !self.snapshots.is_solid_entry_point(hash) && !round.milestones.contains(hash)
            })
            .collect();
        confirmed.sort_unstable();
        self.transactions
            .set_round_indexes(&confirmed, round.index)?;
        let milestones: Vec<Hash> = round.milestones.iter().copied().collect();
        self.transactions
            .set_round_indexes(&milestones, round.index)?;

        debug!(
            round = round.index,
            addresses = state_diff.state.len(),
            confirmed = confirmed.len() + round.milestones.len(),
            "Round committed"
        );
        Ok(true)
    }

    /// Advance the snapshot to `target` by summing the stored diffs of every
    /// round after the current index. Caller holds `apply_lock`.
    fn replay_to(&self, target: RoundIndex) -> LedgerResult<()> {
        let current = self.snapshots.latest_index();
        if target <= current {
            return Ok(());
        }

        let mut combined = BalanceDiff::new();
        let mut skipped = Vec::new();
        let mut target_round = None;
        for index in current + 1..=target {
            match self.rounds.load_round(index)? {
                Some(round) => {
                    if let Some(diff) = self.rounds.load_state_diff(index)? {
                        for (address, delta) in diff.state {
                            accumulate(&mut combined, address, delta)?;
                        }
                    }
                    if index == target {
                        target_round = Some(round);
                    }
                }
                None => skipped.push(index),
            }
        }
        combined.retain(|_, delta| *delta != 0);
        let state_diff = StateDiff::new(combined);

        let mut snapshot = self.snapshots.latest_mut();
        if !snapshot.state.patched_state(&state_diff.state)?.is_consistent() {
            return Err(LedgerError::InconsistentStateDiff { round: target });
        }
        snapshot.state.apply_state_diff(target, &state_diff)?;
        snapshot.metadata.index = target;
        snapshot.metadata.hash = target_round
            .map(|round| round.merkle_root())
            .unwrap_or(EMPTY_ROUND_HASH);
        snapshot.metadata.timestamp = round_start_time(
            target,
            self.config.genesis_time_ms,
            self.config.round_duration_ms,
        );
        snapshot.metadata.skipped_rounds.extend(skipped.iter().copied());

        if !skipped.is_empty() {
            debug!(target, skipped = ?skipped, "Skipped rounds during replay");
        }
        Ok(())
    }
}

impl LedgerApi for LedgerService {
    fn restore_ledger_state(&self) -> LedgerResult<()> {
        let _apply = self.apply_lock.lock();
        let current = self.snapshots.latest_index();
        let Some(latest) = self.rounds.latest_round()? else {
            info!("No stored rounds, ledger starts from the initial snapshot");
            return Ok(());
        };

        let mut index = latest.index;
        while index > current {
            if let Some(round) = self.rounds.load_round(index)? {
                if self.is_committed(&round)? {
                    self.replay_to(index)?;
                    info!(round = index, "Restored ledger state");
                    metrics::record_round_applied(index);
                    return Ok(());
                }
            }
            index -= 1;
        }
        info!(round = current, "Ledger state already current");
        Ok(())
    }

    fn apply_round_to_ledger(&self, round: &Round) -> LedgerResult<bool> {
        let _apply = self.apply_lock.lock();
        let current = self.snapshots.latest_index();
        if round.index <= current {
            debug!(round = round.index, snapshot = current, "Round already applied");
            return Ok(false);
        }

        for pending in current + 1..round.index {
            if self.rounds.load_round(pending)?.is_some() {
                return Err(LedgerError::RoundOutOfOrder {
                    expected: pending,
                    actual: round.index,
                });
            }
        }

        if self.rounds.load_round(round.index)?.is_none() {
            self.rounds.store_round(round.clone())?;
        }

        if !self.is_committed(round)? && !self.commit_round(round)? {
            return Ok(false);
        }

        self.replay_to(round.index)?;
        let snapshot = self.snapshots.latest();
        info!(
            round = round.index,
            hash = %snapshot.hash(),
            "Applied round to ledger"
        );
        metrics::record_round_applied(round.index);
        Ok(true)
    }

    fn tips_consistent(&self, tips: &[Hash]) -> LedgerResult<bool> {
        self.checker.tips_consistent(tips)
    }

    fn is_balance_diff_consistent(
        &self,
        session: &mut ConsistencySession,
        tip: &Hash,
    ) -> LedgerResult<bool> {
        self.checker.is_balance_diff_consistent(session, tip)
    }

    fn generate_balance_diff(
        &self,
        visited: &mut HashSet<Hash>,
        start: &[Hash],
        boundary: RoundIndex,
    ) -> LedgerResult<Option<BalanceDiff>> {
        self.engine
            .generate_balance_diff(visited, start.iter().copied(), boundary)
    }

    fn latest_snapshot_index(&self) -> RoundIndex {
        self.snapshots.latest_index()
    }

    fn is_solid_entry_point(&self, hash: &Hash) -> bool {
        self.snapshots.is_solid_entry_point(hash)
    }

    fn solid_entry_point_index(&self, hash: &Hash) -> Option<RoundIndex> {
        self.snapshots.solid_entry_point_index(hash)
    }
}
