//! # Validator Manager Subsystem
//!
//! Maintains the rotating set of validators whose milestones confirm rounds.
//! Validators rotate through application bundles sent to a well-known
//! tracker address: the bundle is signed by the outgoing validator and
//! announces its successor.
//!
//! ## Candidate lifecycle
//!
//! ```text
//! [tracker address] ──collect──► [queued] ──analyze──► Valid ─────────► [rotated]
//!                                   ▲                  Invalid ───────► [dropped]
//!                                   │                  AlreadyProcessed ► [dropped]
//!                                   └──── release ◄─── Incomplete / error
//! ```
//!
//! A rotated set takes effect `start_round_delay` rounds after acceptance and
//! is persisted in the `RoundStore`, keyed by that start round. Startup
//! recovers the most recent persisted set.
//!
//! ## Module Structure
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  adapters/ - BundleCandidateVerifier, clocks, solidifier         │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - ValidatorTrackerApi                         │
//! │  ports/outbound.rs - CandidateVerifier, SignatureScheme, ...     │
//! │  tracker/          - CandidateTracker                            │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/ - CandidateValidity, CandidateQueue, ValidatorSet       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod tracker;

pub use config::{SignatureMode, ValidatorTrackerConfig};
pub use domain::*;
pub use error::{ValidatorManagerError, ValidatorManagerResult};
pub use ports::*;
pub use tracker::{CandidateTracker, TrackerDependencies};
