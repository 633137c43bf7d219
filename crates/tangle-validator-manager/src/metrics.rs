//! # Validator Manager Metrics
//!
//! Enable with the `metrics` feature.
//!
//! - `validator_candidates_total` - Counter of analyzed candidates (by outcome)
//! - `validator_set_size` - Gauge of active validators

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter_vec, register_int_gauge, IntCounterVec, IntGauge};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Analyzed candidates, labeled by outcome
    pub static ref CANDIDATES: IntCounterVec = register_int_counter_vec!(
        "validator_candidates_total",
        "Total number of analyzed validator candidates",
        &["outcome"]
    )
    .expect("Failed to create CANDIDATES metric");

    /// Active validators
    pub static ref VALIDATOR_SET_SIZE: IntGauge = register_int_gauge!(
        "validator_set_size",
        "Number of validators in the current set"
    )
    .expect("Failed to create VALIDATOR_SET_SIZE metric");
}

#[cfg(feature = "metrics")]
pub fn record_candidate(outcome: &str) {
    CANDIDATES.with_label_values(&[outcome]).inc();
}

#[cfg(feature = "metrics")]
pub fn set_validator_set_size(size: usize) {
    VALIDATOR_SET_SIZE.set(size as i64);
}

#[cfg(not(feature = "metrics"))]
pub fn record_candidate(_outcome: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn set_validator_set_size(_size: usize) {}
