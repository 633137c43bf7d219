//! Error types for the ledger subsystem
//!
//! "Not yet processable" and "rejected" outcomes are plain `false`/`None`
//! returns. The variants below abort the operation that raised them.

use shared_types::{Address, Hash, RoundIndex};
use thiserror::Error;

/// Ledger subsystem errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Storage collaborator failed unexpectedly
    #[error("Storage error: {reason}")]
    Storage { reason: String },

    /// Balance accumulation overflowed, the stored data is corrupt
    #[error("Balance overflow while accumulating address {address}")]
    BalanceOverflow { address: Address },

    /// Consistency was requested for a tip that is not solid
    #[error("Tip is not solid: {tip}")]
    TipNotSolid { tip: Hash },

    /// A stored round with a lower index has not been applied yet
    #[error("Round out of order: round {expected} must be applied before round {actual}")]
    RoundOutOfOrder {
        expected: RoundIndex,
        actual: RoundIndex,
    },

    /// Stored state diffs do not sum to zero
    #[error("Inconsistent state diff for round {round}")]
    InconsistentStateDiff { round: RoundIndex },

    /// Balances no longer add up to the total supply
    #[error("Supply mismatch: expected {expected}, got {actual}")]
    SupplyMismatch { expected: i64, actual: i128 },

    /// Snapshot could not be constructed
    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },
}

impl LedgerError {
    pub fn storage(reason: impl Into<String>) -> Self {
        Self::Storage {
            reason: reason.into(),
        }
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
