//! Adapters for the validator manager ports

mod clock;
mod solidifier;
mod verifier;

pub use clock::{ManualRoundClock, SystemRoundClock};
pub use solidifier::InMemorySolidifier;
pub use verifier::{BundleCandidateVerifier, UncheckedSignatures};
