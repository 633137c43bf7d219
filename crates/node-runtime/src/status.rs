//! # Status Reporter
//!
//! Periodically logs where the ledger and the validator tracker stand.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use shared_types::RoundIndex;
use tangle_ledger::{LedgerApi, LedgerResult, RoundStore};
use tangle_telemetry::{log_event, record_worker_error, TickTimer};
use tangle_validator_manager::{CandidateTracker, ValidatorTrackerApi};
use tokio_util::sync::CancellationToken;

/// Point-in-time view of the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeStatus {
    pub snapshot_index: RoundIndex,
    pub latest_round: Option<RoundIndex>,
    /// Stored rounds above the snapshot index.
    pub rounds_behind: RoundIndex,
    pub validators: usize,
    pub validator_start_round: RoundIndex,
    pub pending_candidates: usize,
    pub tracker_initialized: bool,
}

pub struct StatusReporter {
    ledger: Arc<dyn LedgerApi>,
    rounds: Arc<dyn RoundStore>,
    tracker: Arc<CandidateTracker>,
    interval: Duration,
}

impl StatusReporter {
    pub fn new(
        ledger: Arc<dyn LedgerApi>,
        rounds: Arc<dyn RoundStore>,
        tracker: Arc<CandidateTracker>,
        interval: Duration,
    ) -> Self {
        Self {
            ledger,
            rounds,
            tracker,
            interval,
        }
    }

    pub fn report(&self) -> LedgerResult<NodeStatus> {
        let snapshot_index = self.ledger.latest_snapshot_index();
        let latest_round = self.rounds.latest_round()?.map(|round| round.index);
        Ok(NodeStatus {
            snapshot_index,
            latest_round,
            rounds_behind: latest_round
                .map(|latest| latest.saturating_sub(snapshot_index))
                .unwrap_or(0),
            validators: self.tracker.validators().len(),
            validator_start_round: self.tracker.start_round(),
            pending_candidates: self.tracker.pending_candidates(),
            tracker_initialized: self.tracker.is_initialized(),
        })
    }

    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = ticker.tick() => {
                    let _timer = TickTimer::new("status");
                    match self.report() {
                        Ok(status) => log_event!(
                            info,
                            "node",
                            "Node status",
                            snapshot_index = status.snapshot_index,
                            rounds_behind = status.rounds_behind,
                            validators = status.validators,
                            pending_candidates = status.pending_candidates,
                            tracker_initialized = status.tracker_initialized
                        ),
                        Err(e) => {
                            record_worker_error("status", "storage");
                            log_event!(warn, "node", "Status report failed", error = %e);
                        }
                    }
                }
            }
        }
    }
}
