//! # Validator Rotation
//!
//! The candidate tracker over the real bundle validator and round store.
//!
//! ## Properties Tested
//!
//! 10. A valid application replaces its signer, takes effect after the
//!     start round delay and survives a restart
//! 11. Applications signed outside the current set never change it

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use std::time::Duration;

    use shared_types::{Address, Hash, Transaction, NULL_HASH};
    use tangle_ledger::{RoundStore, ValidatorSetRecord};
    use tangle_validator_manager::adapters::{
        BundleCandidateVerifier, InMemorySolidifier, ManualRoundClock, UncheckedSignatures,
    };
    use tangle_validator_manager::{
        CandidateTracker, TrackerDependencies, ValidatorTrackerApi, ValidatorTrackerConfig,
    };
    use tokio_util::sync::CancellationToken;

    use crate::fixtures::{address, Harness};

    const CLOCK_ROUND: u32 = 6;

    fn tracker_address() -> Address {
        address(500)
    }

    fn x() -> Address {
        address(10)
    }

    fn y() -> Address {
        address(11)
    }

    struct Scenario {
        harness: Harness,
        solidifier: Arc<InMemorySolidifier>,
        clock: Arc<ManualRoundClock>,
    }

    impl Scenario {
        /// Stores hold a persisted set `{X}` starting at round 5.
        fn new() -> Self {
            let harness = Harness::new(&[(address(0), 1)]);
            harness
                .rounds
                .store_validator_set(ValidatorSetRecord {
                    start_round: 5,
                    validators: [x()].into_iter().collect(),
                })
                .unwrap();
            Self {
                harness,
                solidifier: Arc::new(InMemorySolidifier::new()),
                clock: Arc::new(ManualRoundClock::new(CLOCK_ROUND)),
            }
        }

        fn tracker(&self) -> CandidateTracker {
            let config = ValidatorTrackerConfig {
                tracker_address: tracker_address(),
                initial_validators: [address(99)].into_iter().collect(),
                rescan_interval: Duration::from_millis(100),
                ..ValidatorTrackerConfig::default()
            };
            let verifier = BundleCandidateVerifier::new(
                self.harness.bundle_validator.clone(),
                Arc::new(UncheckedSignatures::new()),
            );
            CandidateTracker::new(
                config,
                TrackerDependencies {
                    transactions: self.harness.tangle.clone(),
                    rounds: self.harness.rounds.clone(),
                    verifier: Arc::new(verifier),
                    solidifier: self.solidifier.clone(),
                    clock: self.clock.clone(),
                },
            )
        }

        /// Stored application signed by `signer` announcing `announced`.
        /// Returns the hash of the transaction sent to the tracker address.
        fn apply(&self, signer: Address, announced: Address) -> Hash {
            let txs = application(&self.harness, signer, announced);
            let hash = txs[txs.len() - 1].hash;
            self.harness.store_all(txs);
            hash
        }
    }

    /// Tail plus two signature fragments from `signer` (security 2), then
    /// the transaction to the tracker address. Not stored.
    fn application(harness: &Harness, signer: Address, announced: Address) -> Vec<Transaction> {
        let mut txs = harness.bundle(
            &[(signer, 0), (signer, 0), (signer, 0), (tracker_address(), 0)],
            NULL_HASH,
            NULL_HASH,
        );
        let last = txs.len() - 1;
        txs[last].signature = announced.0.to_vec();
        txs
    }

    fn set(addresses: &[Address]) -> BTreeSet<Address> {
        addresses.iter().copied().collect()
    }

    #[test]
    fn test_valid_application_rotates_and_persists() {
        let scenario = Scenario::new();
        let tracker = scenario.tracker();
        tracker.init().unwrap();
        assert_eq!(tracker.validators(), set(&[x()]));
        assert_eq!(tracker.start_round(), 5);

        scenario.apply(x(), y());
        tracker.tick(&CancellationToken::new()).unwrap();

        assert_eq!(tracker.validators(), set(&[y()]));
        assert_eq!(tracker.start_round(), CLOCK_ROUND + 2);
        assert!(tracker.is_initialized());
        // Solid applications need no solidification request.
        assert!(scenario.solidifier.requested().is_empty());

        assert_eq!(tracker.validators_of_round(7).unwrap(), set(&[x()]));
        assert_eq!(tracker.validators_of_round(8).unwrap(), set(&[y()]));

        let restarted = scenario.tracker();
        restarted.init().unwrap();
        assert_eq!(restarted.validators(), set(&[y()]));
        assert_eq!(restarted.start_round(), 8);
    }

    #[test]
    fn test_application_for_active_validator_is_ignored() {
        let scenario = Scenario::new();
        let tracker = scenario.tracker();
        tracker.init().unwrap();

        scenario.apply(x(), x());
        tracker.tick(&CancellationToken::new()).unwrap();

        assert_eq!(tracker.validators(), set(&[x()]));
        assert_eq!(tracker.start_round(), 5);
        assert_eq!(tracker.pending_candidates(), 0);
    }

    // =========================================================================
    // Property 11: only current validators can hand over their slot
    // =========================================================================

    #[test]
    fn test_outsider_application_is_rejected() {
        let scenario = Scenario::new();
        let tracker = scenario.tracker();
        tracker.init().unwrap();
        let outsider = address(30);
        let w = address(31);

        scenario.apply(outsider, w);
        tracker.tick(&CancellationToken::new()).unwrap();

        assert_eq!(tracker.validators(), set(&[x()]));
        assert_eq!(tracker.start_round(), 5);
        assert_eq!(tracker.pending_candidates(), 0);
        let persisted = scenario
            .harness
            .rounds
            .load_validator_set_at_or_before(u32::MAX)
            .unwrap()
            .unwrap();
        assert_eq!(persisted.validators, set(&[x()]));
        assert_eq!(persisted.start_round, 5);
    }

    #[test]
    fn test_application_with_misaligned_branches_is_rejected() {
        let scenario = Scenario::new();
        let tracker = scenario.tracker();
        tracker.init().unwrap();

        let mut txs = application(&scenario.harness, x(), y());
        txs[1].branch = address(77);
        scenario.harness.store_all(txs);
        tracker.tick(&CancellationToken::new()).unwrap();

        assert_eq!(tracker.validators(), set(&[x()]));
        assert_eq!(tracker.pending_candidates(), 0);
    }

    #[test]
    fn test_incomplete_application_is_retried() {
        let scenario = Scenario::new();
        let tracker = scenario.tracker();
        tracker.init().unwrap();

        // Everything but the tail has arrived.
        let mut txs = application(&scenario.harness, x(), y());
        let tail = txs.remove(0);
        scenario.harness.store_all(txs);

        let cancel = CancellationToken::new();
        tracker.tick(&cancel).unwrap();
        assert_eq!(tracker.validators(), set(&[x()]));
        assert_eq!(tracker.pending_candidates(), 0);

        // Released, so the next scan queues it again.
        scenario.harness.store_all(vec![tail]);
        tracker.tick(&cancel).unwrap();
        assert_eq!(tracker.validators(), set(&[y()]));
        assert_eq!(tracker.start_round(), CLOCK_ROUND + 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_tracker_picks_up_applications() {
        let scenario = Scenario::new();
        let tracker = Arc::new(scenario.tracker());
        tracker.init().unwrap();

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(tracker.clone().run(cancel.child_token()));

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(tracker.is_initialized());
        assert_eq!(tracker.validators(), set(&[x()]));

        scenario.clock.set(10);
        scenario.apply(x(), y());
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(tracker.validators(), set(&[y()]));
        assert_eq!(tracker.start_round(), 12);

        cancel.cancel();
        handle.await.unwrap();
    }
}
