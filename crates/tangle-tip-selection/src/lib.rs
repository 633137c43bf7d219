//! # Tip Selection Subsystem
//!
//! Acceptance predicate for the tip-selection random walk. A walk creates one
//! [`WalkValidator`] and asks it about every candidate it steps on. Accepted
//! candidates accumulate in the validator's ledger session, so a later
//! candidate that double-spends against an earlier one is rejected.
//!
//! ```text
//! random walk ──► WalkValidatorFactory::create() ──► WalkValidator
//!                                                      │ is_valid(tip)
//!                                                      ├─ TransactionStore (shape, solidity)
//!                                                      ├─ DepthAnalyzer    (optional)
//!                                                      └─ LedgerApi        (consistency)
//! ```
//!
//! Rejections are not errors. Errors are reserved for storage failures and
//! cancellation.

pub mod config;
pub mod depth;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod walk_validator;

pub use config::TipSelectionConfig;
pub use depth::DepthAnalyzer;
pub use error::{TipSelectionError, TipSelectionResult};
pub use ports::TipValidator;
pub use walk_validator::{WalkValidator, WalkValidatorFactory};
