//! Ports for tip selection
//!
//! Inbound: [`TipValidator`], the per-step predicate a random walk consults.
//! Outbound: the ledger's `TransactionStore` and `LedgerApi`.

use shared_types::Hash;

use crate::error::TipSelectionResult;

pub use tangle_ledger::ports::{LedgerApi, TransactionStore};

/// Acceptance predicate for one walk.
///
/// Implementations are stateful: a candidate accepted earlier in the walk
/// constrains later candidates.
pub trait TipValidator: Send {
    fn is_valid(&mut self, candidate: &Hash) -> TipSelectionResult<bool>;
}
