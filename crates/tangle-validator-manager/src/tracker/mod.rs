//! Candidate tracker
//!
//! Scans the tracker address for application bundles and rotates the
//! validator set when one checks out.
//!
//! ```text
//! tick
//!  ├─ collect: address_transactions(tracker) ──► queue.offer (dedup by seen)
//!  └─ analyze: up to N pops
//!       ├─ Valid            ─► rotate, persist, maybe solidify   (done)
//!       ├─ Invalid          ─►                                   (done)
//!       ├─ AlreadyProcessed ─►                                   (done)
//!       ├─ Incomplete/no tail ─► release, next scan retries
//!       └─ error            ─► warn, release, continue
//! ```

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use shared_types::{Address, Hash, RoundIndex, Transaction};
use tangle_ledger::{RoundStore, TransactionStore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::ValidatorTrackerConfig;
use crate::domain::{CandidateQueue, CandidateValidity, ValidatorSet};
use crate::error::ValidatorManagerResult;
use crate::metrics;
use crate::ports::inbound::ValidatorTrackerApi;
use crate::ports::outbound::{CandidateSolidifier, CandidateVerifier, RoundClock};


/// Dependencies for CandidateTracker
pub struct TrackerDependencies {
    pub transactions: Arc<dyn TransactionStore>,
    pub rounds: Arc<dyn RoundStore>,
    pub verifier: Arc<dyn CandidateVerifier>,
    pub solidifier: Arc<dyn CandidateSolidifier>,
    pub clock: Arc<dyn RoundClock>,
}

pub struct CandidateTracker {
    config: ValidatorTrackerConfig,
    transactions: Arc<dyn TransactionStore>,
    rounds: Arc<dyn RoundStore>,
    verifier: Arc<dyn CandidateVerifier>,
    solidifier: Arc<dyn CandidateSolidifier>,
    clock: Arc<dyn RoundClock>,
    current: RwLock<ValidatorSet>,
    queue: Mutex<CandidateQueue>,
    first_run: AtomicBool,
    initialized: AtomicBool,
}

impl CandidateTracker {
    /// Tracker seeded with the configured initial validators.
    pub fn new(config: ValidatorTrackerConfig, deps: TrackerDependencies) -> Self {
        let start_round = deps
            .clock
            .current_round()
            .saturating_add(config.start_round_delay);
        let current = ValidatorSet::new(config.initial_validators.clone(), start_round);
        Self {
            config,
            transactions: deps.transactions,
            rounds: deps.rounds,
            verifier: deps.verifier,
            solidifier: deps.solidifier,
            clock: deps.clock,
            current: RwLock::new(current),
            queue: Mutex::new(CandidateQueue::new()),
            first_run: AtomicBool::new(true),
            initialized: AtomicBool::new(false),
        }
    }

    /// Recover the most recently persisted validator set.
    ///
    /// Keeps the initial validators when nothing non-empty was persisted.
    pub fn init(&self) -> ValidatorManagerResult<()> {
        match self.rounds.load_validator_set_at_or_before(RoundIndex::MAX)? {
            Some(record) if !record.validators.is_empty() => {
                info!(
                    validators = record.validators.len(),
                    start_round = record.start_round,
                    "Recovered validator set"
                );
                *self.current.write() = ValidatorSet::from(record);
            }
            _ => {
                info!(
                    validators = self.config.initial_validators.len(),
                    "Using initial validator set"
                );
            }
        }
        metrics::set_validator_set_size(self.current.read().len());
        Ok(())
    }

    pub fn validator_set(&self) -> ValidatorSet {
        self.current.read().clone()
    }

    /// True once a scan left nothing to analyze.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn pending_candidates(&self) -> usize {
        self.queue.lock().len()
    }

    /// Queue every unseen transaction sent to the tracker address.
    pub fn collect_new_candidates(&self, cancel: &CancellationToken) -> ValidatorManagerResult<usize> {
        let hashes = self
            .transactions
            .address_transactions(&self.config.tracker_address)?;
        let mut queue = self.queue.lock();
        let mut added = 0;
        for hash in hashes {
            if cancel.is_cancelled() {
                break;
            }
            if queue.offer(hash) {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Analyze up to `max_candidates_per_tick` queued candidates. Returns
    /// the number analyzed.
    pub fn analyze_candidates(&self, cancel: &CancellationToken) -> usize {
        let budget = self
            .pending_candidates()
            .min(self.config.max_candidates_per_tick);
        let mut analyzed = 0;
        for _ in 0..budget {
            if cancel.is_cancelled() {
                break;
            }
            let Some(hash) = self.queue.lock().pop() else {
                break;
            };
            analyzed += 1;
            match self.process_candidate(&hash) {
                Ok(true) => {}
                Ok(false) => self.queue.lock().release(&hash),
                Err(e) => {
                    warn!(candidate = %hash, error = %e, "Failed to analyze candidate");
                    self.queue.lock().release(&hash);
                }
            }
        }
        analyzed
    }

    /// Analyze one candidate. Returns `false` when it should be retried.
    pub fn process_candidate(&self, hash: &Hash) -> ValidatorManagerResult<bool> {
        let transaction = self.transactions.load(hash)?;
        if transaction.address != self.config.tracker_address
            || transaction.current_index != transaction.last_index
        {
            return Ok(true);
        }
        debug!(candidate = %hash, "Processing candidate");

        let Some(tail) = self.find_tail(&transaction)? else {
            debug!(candidate = %hash, "Candidate bundle has no tail yet");
            metrics::record_candidate(CandidateValidity::Incomplete.as_str());
            return Ok(false);
        };

        let validators = self.current.read().validators.clone();
        let validity = self.verifier.validate_candidate(
            &tail,
            self.config.signature_mode,
            self.config.security_level,
            &validators,
        )?;
        metrics::record_candidate(validity.as_str());

        match validity {
            CandidateValidity::Valid => {
                self.accept(&transaction, &tail)?;
                Ok(true)
            }
            CandidateValidity::Incomplete => {
                info!(candidate = %hash, "Candidate is incomplete");
                Ok(false)
            }
            CandidateValidity::Invalid => {
                info!(candidate = %hash, "Candidate is invalid");
                Ok(true)
            }
            CandidateValidity::AlreadyProcessed => {
                debug!(candidate = %hash, "Candidate already processed");
                Ok(true)
            }
        }
    }

    /// One scan: collect, then analyze.
    pub fn tick(&self, cancel: &CancellationToken) -> ValidatorManagerResult<()> {
        let added = self.collect_new_candidates(cancel)?;
        if self.first_run.swap(false, Ordering::SeqCst) && added > 0 {
            info!(candidates = added, "Processing validator candidates");
        }
        self.analyze_candidates(cancel);

        if !self.is_initialized() && self.pending_candidates() == 0 && !cancel.is_cancelled() {
            self.initialized.store(true, Ordering::SeqCst);
            info!("Processing validator candidates ... done");
        }
        Ok(())
    }

    /// Scan on `rescan_interval` until `cancel` fires.
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        info!(
            interval_ms = self.config.rescan_interval.as_millis() as u64,
            "Candidate tracker started"
        );
        let mut ticker = tokio::time::interval(self.config.rescan_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Candidate tracker stopped");
                    return;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.tick(&cancel) {
                        error!(error = %e, "Candidate scan failed");
                    }
                }
            }
        }
    }

    fn find_tail(&self, transaction: &Transaction) -> ValidatorManagerResult<Option<Transaction>> {
        for hash in self.transactions.bundle_transactions(&transaction.bundle)? {
            let tx = self.transactions.load(&hash)?;
            if !tx.is_prefilled() && tx.is_tail() {
                return Ok(Some(tx));
            }
        }
        Ok(None)
    }

    /// Replace the signer by the announced address and persist the new set
    /// before it becomes visible.
    fn accept(&self, application: &Transaction, tail: &Transaction) -> ValidatorManagerResult<()> {
        let announced = self.verifier.derive_address_from_signature(application)?;
        let current_round = self.clock.current_round();
        let start_round = current_round.saturating_add(self.config.start_round_delay);

        let mut next = self.current.read().clone();
        if !next.rotate(&tail.address, announced, start_round) {
            warn!(
                candidate = %application.hash,
                signer = %tail.address,
                "Application signer is not a validator"
            );
            return Ok(());
        }
        self.rounds.store_validator_set(next.to_record())?;
        let size = next.len();
        *self.current.write() = next;

        info!(
            candidate = %application.hash,
            removed = %tail.address,
            added = %announced,
            start_round,
            "Validator set rotated"
        );
        metrics::set_validator_set_size(size);

        if !application.solid {
            self.solidifier.add(application.hash, current_round);
        }
        Ok(())
    }
}

impl ValidatorTrackerApi for CandidateTracker {
    fn validators(&self) -> BTreeSet<Address> {
        self.current.read().validators.clone()
    }

    fn start_round(&self) -> RoundIndex {
        self.current.read().start_round
    }

    fn validators_of_round(&self, round: RoundIndex) -> ValidatorManagerResult<BTreeSet<Address>> {
        match self.rounds.load_validator_set_at_or_before(round)? {
            Some(record) => Ok(record.validators),
            None => Ok(self.validators()),
        }
    }

    fn add_candidate(&self, hash: Hash) -> bool {
        self.queue.lock().offer(hash)
    }
}
