//! # Error Types
//!
//! Errors raised while constructing shared entities.

use thiserror::Error;

/// Errors that can occur when building a [`crate::Hash`] from raw input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// The source slice does not hold enough bytes for a hash.
    #[error("Invalid hash length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// The hex representation could not be decoded.
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),
}
