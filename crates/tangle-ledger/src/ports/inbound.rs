//! Driving Ports (API - Inbound)

use std::collections::HashSet;

use shared_types::{Hash, Round, RoundIndex};

use crate::domain::{BalanceDiff, ConsistencySession};
use crate::error::LedgerResult;

/// Ledger operations used by tip selection, round processing and startup.
pub trait LedgerApi: Send + Sync {
    /// Replay stored state diffs up to the newest fully confirmed round.
    fn restore_ledger_state(&self) -> LedgerResult<()>;

    /// Apply one round.
    ///
    /// Returns `Ok(false)` when the round is already applied or cannot be
    /// applied yet; the caller retries later.
    fn apply_round_to_ledger(&self, round: &Round) -> LedgerResult<bool>;

    /// Check tips in order against one fresh session.
    fn tips_consistent(&self, tips: &[Hash]) -> LedgerResult<bool>;

    /// Check one tip against a walk's session and commit it on success.
    fn is_balance_diff_consistent(
        &self,
        session: &mut ConsistencySession,
        tip: &Hash,
    ) -> LedgerResult<bool>;

    fn generate_balance_diff(
        &self,
        visited: &mut HashSet<Hash>,
        start: &[Hash],
        boundary: RoundIndex,
    ) -> LedgerResult<Option<BalanceDiff>>;

    /// Index of the latest applied round.
    fn latest_snapshot_index(&self) -> RoundIndex;

    fn is_solid_entry_point(&self, hash: &Hash) -> bool;

    /// Round that confirmed a solid entry point, `None` for other hashes.
    fn solid_entry_point_index(&self, hash: &Hash) -> Option<RoundIndex>;
}
