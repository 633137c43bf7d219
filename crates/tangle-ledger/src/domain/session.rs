//! Consistency session owned by one tip-selection walk.
//!
//! ## Commit/rollback contract
//!
//! A check works on copies of the session data. The session is changed only
//! through [`ConsistencySession::commit`], and only after the merged diff has
//! been found consistent. A rejected tip leaves the session exactly as it was.

use std::collections::HashSet;

use shared_types::Hash;

use super::snapshot::BalanceDiff;

/// Accumulated approvals and balance changes of one walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencySession {
    approved: HashSet<Hash>,
    diff: BalanceDiff,
}

impl ConsistencySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_approved(&self, hash: &Hash) -> bool {
        self.approved.contains(hash)
    }

    pub fn approved(&self) -> &HashSet<Hash> {
        &self.approved
    }

    pub fn diff(&self) -> &BalanceDiff {
        &self.diff
    }

    /// Private copy of the approved set used to seed a walk.
    pub fn fork_visited(&self) -> HashSet<Hash> {
        self.approved.clone()
    }

    /// Replace the running diff and absorb the hashes of an accepted walk.
    pub fn commit(&mut self, visited: HashSet<Hash>, merged: BalanceDiff) {
        self.approved.extend(visited);
        self.diff = merged;
    }
}
