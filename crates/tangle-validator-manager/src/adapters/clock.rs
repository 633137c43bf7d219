//! Round clocks

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use shared_types::{round_index_at, RoundIndex};

use crate::ports::outbound::RoundClock;

/// Derives the round from the system clock.
#[derive(Debug, Clone)]
pub struct SystemRoundClock {
    genesis_time_ms: u64,
    round_duration_ms: u64,
}

impl SystemRoundClock {
    pub fn new(genesis_time_ms: u64, round_duration_ms: u64) -> Self {
        Self {
            genesis_time_ms,
            round_duration_ms,
        }
    }
}

impl RoundClock for SystemRoundClock {
    fn current_round(&self) -> RoundIndex {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0);
        round_index_at(now_ms, self.genesis_time_ms, self.round_duration_ms, 0)
    }
}

/// Clock advanced by hand, for simulations and tests.
#[derive(Debug, Default)]
pub struct ManualRoundClock {
    round: AtomicU32,
}

impl ManualRoundClock {
    pub fn new(round: RoundIndex) -> Self {
        Self {
            round: AtomicU32::new(round),
        }
    }

    pub fn set(&self, round: RoundIndex) {
        self.round.store(round, Ordering::SeqCst);
    }
}

impl RoundClock for ManualRoundClock {
    fn current_round(&self) -> RoundIndex {
        self.round.load(Ordering::SeqCst)
    }
}
