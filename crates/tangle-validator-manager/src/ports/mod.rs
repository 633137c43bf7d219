//! Ports layer (Hexagonal Architecture)

pub mod inbound;
pub mod outbound;

pub use inbound::ValidatorTrackerApi;
pub use outbound::{CandidateSolidifier, CandidateVerifier, RoundClock, SignatureScheme};
