//! # Node Container
//!
//! Builds every subsystem over one shared transaction store and round store.
//!
//! ## Initialization Order
//!
//! 1. Stores: `InMemoryTangle`, `InMemoryRoundStore`
//! 2. Genesis snapshot and `SnapshotProvider`
//! 3. Ledger: bundle validator, quorum tip resolver, `LedgerService`
//! 4. Tip selection: `WalkValidatorFactory` over the ledger
//! 5. Validator manager: verifier, solidifier, clock, `CandidateTracker`

use std::sync::Arc;

use anyhow::{Context, Result};
use tangle_ledger::adapters::{
    InMemoryRoundStore, InMemoryTangle, QuorumConfirmedTips, StructuralBundleValidator,
};
use tangle_ledger::{
    LedgerApi, LedgerDependencies, LedgerService, RoundApplicationWorker, SnapshotProvider,
};
use tangle_tip_selection::WalkValidatorFactory;
use tangle_validator_manager::adapters::{
    BundleCandidateVerifier, InMemorySolidifier, SystemRoundClock, UncheckedSignatures,
};
use tangle_validator_manager::{CandidateTracker, TrackerDependencies};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::config::NodeConfig;
use crate::genesis::GenesisBuilder;

/// Container holding all subsystem instances.
pub struct NodeContainer {
    pub config: NodeConfig,
    pub tangle: Arc<InMemoryTangle>,
    pub rounds: Arc<InMemoryRoundStore>,
    pub snapshots: Arc<SnapshotProvider>,
    pub ledger: Arc<LedgerService>,
    pub tracker: Arc<CandidateTracker>,
    pub solidifier: Arc<InMemorySolidifier>,
    pub walk_validators: WalkValidatorFactory,
    /// Cancelled once on shutdown; every worker holds a child token.
    pub shutdown: CancellationToken,
}

impl NodeContainer {
    pub fn new(config: NodeConfig) -> Result<Self> {
        config.validate().context("Invalid node configuration")?;

        let tangle = Arc::new(InMemoryTangle::new());
        let rounds = Arc::new(InMemoryRoundStore::new());

        let genesis = GenesisBuilder::new(config.genesis.clone())
            .build()
            .context("Failed to build genesis snapshot")?;
        let snapshots = Arc::new(
            SnapshotProvider::with_supply(genesis, config.genesis.total_supply)
                .context("Genesis snapshot rejected")?,
        );

        let bundle_validator = Arc::new(StructuralBundleValidator::new(tangle.clone()));
        // Rotations are read back from the round store per round; the
        // configured set covers rounds before the first rotation.
        let confirmed_tips = Arc::new(QuorumConfirmedTips::new(
            tangle.clone(),
            rounds.clone(),
            config.validators.initial_validators.len(),
            config.validators.security_level,
        ));
        let ledger = Arc::new(LedgerService::new(LedgerDependencies {
            transactions: tangle.clone(),
            bundle_validator: bundle_validator.clone(),
            rounds: rounds.clone(),
            confirmed_tips,
            snapshots: snapshots.clone(),
            config: config.ledger.clone(),
        }));

        let shutdown = CancellationToken::new();
        let walk_validators = WalkValidatorFactory::new(
            tangle.clone(),
            ledger.clone(),
            config.tip_selection.clone(),
        )
        .with_cancellation(shutdown.child_token());

        let solidifier = Arc::new(InMemorySolidifier::new());
        let tracker = Arc::new(CandidateTracker::new(
            config.validators.clone(),
            TrackerDependencies {
                transactions: tangle.clone(),
                rounds: rounds.clone(),
                verifier: Arc::new(BundleCandidateVerifier::new(
                    bundle_validator,
                    Arc::new(UncheckedSignatures::new()),
                )),
                solidifier: solidifier.clone(),
                clock: Arc::new(SystemRoundClock::new(
                    config.ledger.genesis_time_ms,
                    config.ledger.round_duration_ms,
                )),
            },
        ));

        info!(
            validators = config.validators.initial_validators.len(),
            tracker = %config.validators.tracker_address,
            below_max_depth = config.tip_selection.below_max_depth_enabled,
            "Subsystems initialized"
        );

        Ok(Self {
            config,
            tangle,
            rounds,
            snapshots,
            ledger,
            tracker,
            solidifier,
            walk_validators,
            shutdown,
        })
    }

    /// Worker applying stored rounds to the ledger.
    pub fn round_worker(&self) -> RoundApplicationWorker {
        let ledger: Arc<dyn LedgerApi> = self.ledger.clone();
        RoundApplicationWorker::new(
            ledger,
            self.rounds.clone(),
            self.config.runtime.apply_interval,
        )
    }
}
