//! Adapters for the ledger ports
//!
//! - `InMemoryTangle`: hash-map transaction store
//! - `InMemoryRoundStore`: rounds, state diffs and validator sets
//! - `StructuralBundleValidator`: signature-independent bundle checks
//! - `QuorumConfirmedTips`: two-thirds milestone tip resolution

mod bundle_validator;
mod memory_round_store;
mod memory_tangle;
mod quorum_tips;

pub use bundle_validator::StructuralBundleValidator;
pub use memory_round_store::InMemoryRoundStore;
pub use memory_tangle::InMemoryTangle;
pub use quorum_tips::QuorumConfirmedTips;
