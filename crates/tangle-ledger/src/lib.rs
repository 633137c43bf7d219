//! # Tangle Ledger Subsystem
//!
//! Maintains the balance snapshot of a DAG ledger. Decides whether a set of
//! tips can be accepted without overspending, and advances the snapshot one
//! confirmed round at a time.
//!
//! ## Components
//!
//! | Component | Responsibility |
//! |-----------|----------------|
//! | `BalanceDiffEngine` | Net balance change of an unconfirmed sub-DAG |
//! | `LedgerConsistencyChecker` | Tip acceptance against a `ConsistencySession` |
//! | `LedgerService` | Round application, replay and restart recovery |
//! | `RoundApplicationWorker` | Periodic application of stored rounds |
//!
//! ## Outbound Dependencies
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `TransactionStore` | Transactions, bundle and address indexes |
//! | `BundleValidator` | Structural bundle checks |
//! | `ConfirmedTipResolver` | Tips a round confirms |
//! | `RoundStore` | Rounds, state diffs, validator sets |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  adapters/ - in-memory stores, bundle validator, quorum tips    │
//! │  worker.rs - background round application                       │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - LedgerApi trait                            │
//! │  ports/outbound.rs - TransactionStore, RoundStore, ...          │
//! │  service/          - LedgerService                              │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/snapshot.rs - Snapshot, SnapshotProvider, StateDiff     │
//! │  domain/session.rs  - ConsistencySession                        │
//! │  balance_diff.rs    - DAG walk                                  │
//! │  consistency.rs     - tip acceptance                            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//!
//! The latest snapshot is the only shared mutable ledger state. Walks and
//! consistency checks hold its read guard; replay holds the write guard.
//! Round application is serialized by the service.

pub mod adapters;
pub mod balance_diff;
pub mod consistency;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod worker;

pub use balance_diff::BalanceDiffEngine;
pub use consistency::LedgerConsistencyChecker;
pub use domain::*;
pub use error::{LedgerError, LedgerResult};
pub use ports::*;
pub use service::{LedgerConfig, LedgerDependencies, LedgerService};
pub use worker::{RoundApplicationWorker, DEFAULT_APPLY_INTERVAL};
