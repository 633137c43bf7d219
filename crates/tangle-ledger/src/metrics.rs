//! # Ledger Metrics
//!
//! Prometheus metrics for round application and consistency checks.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! tangle-ledger = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `ledger_rounds_applied_total` - Counter of rounds applied to the snapshot
//! - `ledger_rounds_deferred_total` - Counter of rounds not yet processable (by reason)
//! - `ledger_snapshot_index` - Gauge of the latest snapshot round index
//! - `ledger_balance_diff_visited` - Histogram of transactions visited per walk
//! - `ledger_consistency_checks_total` - Counter of consistency checks (by outcome)

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_gauge, register_histogram, register_int_counter, register_int_counter_vec, Gauge,
    Histogram, IntCounter, IntCounterVec,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total rounds applied
    pub static ref ROUNDS_APPLIED: IntCounter = register_int_counter!(
        "ledger_rounds_applied_total",
        "Total number of rounds applied to the ledger snapshot"
    )
    .expect("Failed to create ROUNDS_APPLIED metric");

    /// Rounds that could not be applied yet, labeled by reason
    pub static ref ROUNDS_DEFERRED: IntCounterVec = register_int_counter_vec!(
        "ledger_rounds_deferred_total",
        "Total number of round applications deferred for retry",
        &["reason"]
    )
    .expect("Failed to create ROUNDS_DEFERRED metric");

    /// Latest snapshot index
    pub static ref SNAPSHOT_INDEX: Gauge = register_gauge!(
        "ledger_snapshot_index",
        "Round index of the latest ledger snapshot"
    )
    .expect("Failed to create SNAPSHOT_INDEX metric");

    /// Transactions visited by one balance diff walk
    pub static ref BALANCE_DIFF_VISITED: Histogram = register_histogram!(
        "ledger_balance_diff_visited",
        "Transactions visited per balance diff walk",
        vec![1.0, 10.0, 100.0, 1_000.0, 10_000.0, 100_000.0]
    )
    .expect("Failed to create BALANCE_DIFF_VISITED metric");

    /// Consistency checks, labeled by outcome
    pub static ref CONSISTENCY_CHECKS: IntCounterVec = register_int_counter_vec!(
        "ledger_consistency_checks_total",
        "Total number of tip consistency checks",
        &["outcome"]
    )
    .expect("Failed to create CONSISTENCY_CHECKS metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record a round applied and the new snapshot index
#[cfg(feature = "metrics")]
pub fn record_round_applied(index: u32) {
    ROUNDS_APPLIED.inc();
    SNAPSHOT_INDEX.set(f64::from(index));
}

/// Record a round deferred with reason
#[cfg(feature = "metrics")]
pub fn record_round_deferred(reason: &str) {
    ROUNDS_DEFERRED.with_label_values(&[reason]).inc();
}

/// Record the size of a balance diff walk
#[cfg(feature = "metrics")]
pub fn record_balance_diff_visited(count: usize) {
    BALANCE_DIFF_VISITED.observe(count as f64);
}

/// Record a consistency check outcome
#[cfg(feature = "metrics")]
pub fn record_consistency_check(outcome: &str) {
    CONSISTENCY_CHECKS.with_label_values(&[outcome]).inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_round_applied(_index: u32) {}

#[cfg(not(feature = "metrics"))]
pub fn record_round_deferred(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_balance_diff_visited(_count: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn record_consistency_check(_outcome: &str) {}
