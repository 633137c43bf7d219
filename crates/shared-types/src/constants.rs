//! # Protocol Constants
//!
//! Values every node of the network must agree on, plus the round clock
//! arithmetic derived from them.

use crate::entities::RoundIndex;

/// Total number of base units in existence.
pub const TOTAL_SUPPLY: i64 = 4_292_493_394_837_504;

/// Genesis timestamp in milliseconds since the Unix epoch.
pub const GENESIS_TIME_MS: u64 = 1_569_024_001_000;

/// Length of a consensus round in milliseconds.
pub const ROUND_DURATION_MS: u64 = 15_000;

/// Quiet period at the end of each round in milliseconds.
pub const ROUND_PAUSE_MS: u64 = 5_000;

/// Rounds between a validator-set change and its activation.
pub const START_ROUND_DELAY: RoundIndex = 2;

/// Signature security level of validator keys.
pub const VALIDATOR_SECURITY: u64 = 2;

/// Accepted confirmation lag for tip selection.
pub const MAX_DEPTH: RoundIndex = 15;

/// Transactions analysed before a below-max-depth walk gives up.
pub const MAX_ANALYZED_TRANSACTIONS: usize = 20_000;

/// Candidates analysed per tracker tick.
pub const MAX_CANDIDATES_TO_ANALYZE: usize = 5;

/// Tracker rescan interval in milliseconds.
pub const CANDIDATE_RESCAN_INTERVAL_MS: u64 = 1_000;

/// Round indices are stored in 21 bits.
pub const ROUND_INDEX_MASK: u64 = 0x1f_ffff;

/// Maximum number of tip references carried by one milestone transaction.
pub const MAX_TIPS_PER_MILESTONE: usize = 16;

/// Round index for `time_ms`, shifted forward by `offset` rounds.
///
/// Times before genesis map to round `offset`.
pub fn round_index_at(
    time_ms: u64,
    genesis_time_ms: u64,
    round_duration_ms: u64,
    offset: RoundIndex,
) -> RoundIndex {
    let duration = round_duration_ms.max(1);
    let elapsed = time_ms.saturating_sub(genesis_time_ms) / duration;
    ((elapsed + u64::from(offset)) & ROUND_INDEX_MASK) as RoundIndex
}

/// Start time of `round` in milliseconds.
pub fn round_start_time(round: RoundIndex, genesis_time_ms: u64, round_duration_ms: u64) -> u64 {
    genesis_time_ms.saturating_add(u64::from(round).saturating_mul(round_duration_ms))
}
