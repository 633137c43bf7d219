//! Error types for the validator manager
//!
//! Candidate outcomes (`Invalid`, `Incomplete`, ...) are values, not errors.

use shared_types::{Hash, HashError};
use tangle_ledger::LedgerError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidatorManagerError {
    /// Storage failure in a ledger collaborator
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// The signature region does not hold an address
    #[error("Malformed signature region of {transaction}: {source}")]
    MalformedSignature {
        transaction: Hash,
        #[source]
        source: HashError,
    },
}

/// Result type for validator manager operations
pub type ValidatorManagerResult<T> = Result<T, ValidatorManagerError>;
