//! Domain layer for the validator manager

mod candidate;
mod validator_set;

pub use candidate::*;
pub use validator_set::*;
