//! # Tip Selection Metrics
//!
//! Enable with the `metrics` feature.
//!
//! - `tip_selection_rejections_total` - Counter of rejected candidates (by reason)
//! - `tip_selection_depth_analyzed` - Histogram of transactions visited by depth analysis

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_histogram, register_int_counter_vec, Histogram, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Rejected candidates, labeled by reason
    pub static ref WALK_REJECTIONS: IntCounterVec = register_int_counter_vec!(
        "tip_selection_rejections_total",
        "Total number of candidate tips rejected by the walk validator",
        &["reason"]
    )
    .expect("Failed to create WALK_REJECTIONS metric");

    /// Transactions visited per depth analysis
    pub static ref DEPTH_ANALYZED: Histogram = register_histogram!(
        "tip_selection_depth_analyzed",
        "Transactions visited per below-max-depth analysis",
        vec![1.0, 10.0, 100.0, 1_000.0, 10_000.0, 20_000.0]
    )
    .expect("Failed to create DEPTH_ANALYZED metric");
}

#[cfg(feature = "metrics")]
pub fn record_rejection(reason: &str) {
    WALK_REJECTIONS.with_label_values(&[reason]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_depth_analyzed(count: usize) {
    DEPTH_ANALYZED.observe(count as f64);
}

#[cfg(not(feature = "metrics"))]
pub fn record_rejection(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_depth_analyzed(_count: usize) {}
