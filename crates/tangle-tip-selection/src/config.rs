//! Configuration for the walk validator

use serde::{Deserialize, Serialize};
use shared_types::{RoundIndex, MAX_ANALYZED_TRANSACTIONS, MAX_DEPTH};

/// Walk validator configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipSelectionConfig {
    /// Reject tips whose unconfirmed past reaches too far below the snapshot
    pub below_max_depth_enabled: bool,
    /// Rounds behind the snapshot index a referenced confirmation may lag
    pub max_depth: RoundIndex,
    /// Transactions a depth analysis may visit before giving up
    pub max_analyzed_transactions: usize,
}

impl Default for TipSelectionConfig {
    fn default() -> Self {
        Self {
            below_max_depth_enabled: false,
            max_depth: MAX_DEPTH,
            max_analyzed_transactions: MAX_ANALYZED_TRANSACTIONS,
        }
    }
}
