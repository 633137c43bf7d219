//! # Shared Types Crate
//!
//! This crate contains the Tangle entities shared by every subsystem of the
//! node: the fixed-size [`Hash`], the [`Transaction`] vertex, the consensus
//! [`Round`], and the protocol constants.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: cross-crate types are defined here only.
//! - **One Hash Type**: transactions, addresses, bundles and tags share
//!   [`Hash`]; [`HashKind`] tags the role where a factory needs it.
//! - **Immutable Confirmation**: a transaction's `round_index` moves from
//!   `0` to a round exactly once and never changes afterwards.

pub mod constants;
pub mod entities;
pub mod errors;
pub mod hash;

pub use constants::*;
pub use entities::*;
pub use errors::*;
pub use hash::{Address, Hash, HashKind, NULL_HASH};
