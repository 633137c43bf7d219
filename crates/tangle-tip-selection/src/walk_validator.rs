//! Walk validator
//!
//! One instance per random walk. Checks run in order and the first failing
//! check rejects the candidate:
//!
//! ```text
//! NULL ─► accept
//! placeholder ─► reject "unknown"
//! not a tail ─► reject "not_tail"
//! not solid ─► reject "not_solid"
//! below max depth (optional) ─► reject "below_max_depth"
//! ledger inconsistent ─► reject "inconsistent"
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use shared_types::Hash;
use tangle_ledger::{ConsistencySession, LedgerApi, TransactionStore};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::TipSelectionConfig;
use crate::depth::DepthAnalyzer;
use crate::error::TipSelectionResult;
use crate::metrics;
use crate::ports::TipValidator;

pub struct WalkValidator {
    transactions: Arc<dyn TransactionStore>,
    ledger: Arc<dyn LedgerApi>,
    depth: Option<DepthAnalyzer>,
    session: ConsistencySession,
    max_depth_ok: HashSet<Hash>,
    cancel: Option<CancellationToken>,
}

impl WalkValidator {
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        ledger: Arc<dyn LedgerApi>,
        config: &TipSelectionConfig,
    ) -> Self {
        let depth = config.below_max_depth_enabled.then(|| {
            DepthAnalyzer::new(
                Arc::clone(&transactions),
                Arc::clone(&ledger),
                config.max_depth,
                config.max_analyzed_transactions,
            )
        });
        Self {
            transactions,
            ledger,
            depth,
            session: ConsistencySession::new(),
            max_depth_ok: HashSet::new(),
            cancel: None,
        }
    }

    /// Abort depth analysis when `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Tips accepted so far and their combined diff.
    pub fn session(&self) -> &ConsistencySession {
        &self.session
    }

    pub fn is_valid(&mut self, candidate: &Hash) -> TipSelectionResult<bool> {
        if candidate.is_null() {
            return Ok(true);
        }

        let tx = self.transactions.load(candidate)?;
        if tx.is_prefilled() {
            return Ok(reject(candidate, "unknown"));
        }
        if !tx.is_tail() {
            return Ok(reject(candidate, "not_tail"));
        }
        if !tx.solid {
            return Ok(reject(candidate, "not_solid"));
        }
        if let Some(depth) = &self.depth {
            if depth.is_below_max_depth(&tx, &mut self.max_depth_ok, self.cancel.as_ref())? {
                return Ok(reject(candidate, "below_max_depth"));
            }
        }
        if !self
            .ledger
            .is_balance_diff_consistent(&mut self.session, candidate)?
        {
            return Ok(reject(candidate, "inconsistent"));
        }
        Ok(true)
    }
}

impl TipValidator for WalkValidator {
    fn is_valid(&mut self, candidate: &Hash) -> TipSelectionResult<bool> {
        WalkValidator::is_valid(self, candidate)
    }
}

fn reject(candidate: &Hash, reason: &'static str) -> bool {
    debug!(tip = %candidate, reason, "Rejected candidate tip");
    metrics::record_rejection(reason);
    false
}

/// Creates one fresh validator per walk.
#[derive(Clone)]
pub struct WalkValidatorFactory {
    transactions: Arc<dyn TransactionStore>,
    ledger: Arc<dyn LedgerApi>,
    config: TipSelectionConfig,
    cancel: Option<CancellationToken>,
}

impl WalkValidatorFactory {
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        ledger: Arc<dyn LedgerApi>,
        config: TipSelectionConfig,
    ) -> Self {
        Self {
            transactions,
            ledger,
            config,
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn create(&self) -> WalkValidator {
        let validator = WalkValidator::new(
            Arc::clone(&self.transactions),
            Arc::clone(&self.ledger),
            &self.config,
        );
        match &self.cancel {
            Some(cancel) => validator.with_cancellation(cancel.clone()),
            None => validator,
        }
    }
}
