//! # Genesis Module
//!
//! Initial ledger snapshot for a fresh node.
//!
//! The genesis snapshot has special properties:
//!
//! - Index: the configured initial round (default 0)
//! - Hash: the null hash
//! - Solid entry points: the null hash only
//! - Balances: the configured allocations, summing to the total supply

pub mod builder;

pub use builder::{GenesisBuilder, GenesisConfig, GenesisError};
