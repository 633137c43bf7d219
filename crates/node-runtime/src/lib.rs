//! # Node Runtime Library
//!
//! Wires the ledger, tip-selection and validator-manager subsystems over
//! shared stores and runs their background workers. The main entry point is
//! the `main.rs` binary; the library is exposed for tests.
//!
//! ## Modular Structure
//!
//! - `container/` - Node configuration and subsystem construction
//! - `genesis/` - Initial ledger snapshot
//! - `runtime` - Worker startup and cooperative shutdown
//! - `status` - Periodic status reporting
//!
//! ## Worker Layout
//!
//! ```text
//!                    ┌──────────── shutdown token ────────────┐
//!                    │                  │                     │
//!                    ▼                  ▼                     ▼
//!      RoundApplicationWorker   CandidateTracker::run   StatusReporter::run
//!                    │                  │                     │
//!                    ▼                  ▼                     │
//!             LedgerService      RoundStore (validator sets)  │
//!                    │                  │                     │
//!                    └──── InMemoryTangle / InMemoryRoundStore ◄┘
//! ```

pub mod container;
pub mod genesis;
pub mod runtime;
pub mod status;

pub use container::{ConfigError, NodeConfig, NodeContainer, RuntimeConfig};
pub use runtime::NodeRuntime;
pub use status::{NodeStatus, StatusReporter};
