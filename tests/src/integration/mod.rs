//! Cross-crate scenarios over the in-memory adapters.

pub mod ledger_properties;
pub mod validator_rotation;
pub mod walk_validation;
