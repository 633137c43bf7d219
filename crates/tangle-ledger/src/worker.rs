//! Background round application
//!
//! Periodically applies every stored round above the snapshot index, lowest
//! first. Stops a pass at the first round that is not applicable yet.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::error::LedgerResult;
use crate::ports::inbound::LedgerApi;
use crate::ports::outbound::RoundStore;

/// Default pause between application passes.
pub const DEFAULT_APPLY_INTERVAL: Duration = Duration::from_millis(500);

pub struct RoundApplicationWorker {
    ledger: Arc<dyn LedgerApi>,
    rounds: Arc<dyn RoundStore>,
    interval: Duration,
}

impl RoundApplicationWorker {
    pub fn new(ledger: Arc<dyn LedgerApi>, rounds: Arc<dyn RoundStore>, interval: Duration) -> Self {
        Self {
            ledger,
            rounds,
            interval,
        }
    }

    /// One pass. Returns the number of rounds applied.
    pub fn apply_pending(&self) -> LedgerResult<usize> {
        let Some(latest) = self.rounds.latest_round()? else {
            return Ok(0);
        };

        let mut applied = 0;
        let mut index = self.ledger.latest_snapshot_index() + 1;
        while index <= latest.index {
            if let Some(round) = self.rounds.load_round(index)? {
                if !self.ledger.apply_round_to_ledger(&round)? {
                    debug!(round = index, "Round not applicable yet");
                    break;
                }
                applied += 1;
            }
            index += 1;
        }
        Ok(applied)
    }

    /// Run until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) {
        info!(interval_ms = self.interval.as_millis() as u64, "Round application worker started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Round application worker stopped");
                    return;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.apply_pending() {
                        error!(error = %e, "Round application failed");
                    }
                }
            }
        }
    }
}
