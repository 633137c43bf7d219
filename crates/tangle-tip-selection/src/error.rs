//! Error types for tip selection
//!
//! A rejected candidate is `Ok(false)`. Errors mean the check itself could
//! not complete.

use tangle_ledger::LedgerError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TipSelectionError {
    /// Ledger or storage failure
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Shutdown requested during analysis
    #[error("Tip validation cancelled")]
    Cancelled,
}

/// Result type for tip selection operations
pub type TipSelectionResult<T> = Result<T, TipSelectionError>;
