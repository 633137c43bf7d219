//! # Ledger Properties
//!
//! Round application and balance diffs across the full ledger stack:
//! structural bundle validation, quorum tip resolution, the balance diff
//! engine and the round applier.
//!
//! ## Properties Tested
//!
//! 1. Conservation: the supply is unchanged by any sequence of rounds
//! 2. Non-negativity: an applied round never leaves a negative balance
//! 3. Idempotence: re-applying a round changes nothing
//! 4. Ordering: a later round cannot overtake a stored earlier one
//! 5. Determinism: trunk/branch exploration order does not affect diffs
//! 8. A three-transaction bundle yields the expected diff
//! 9. The same bundle with a broken value sum yields no diff

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashSet};
    use std::sync::Arc;

    use proptest::prelude::*;
    use shared_types::{Address, Hash, NULL_HASH};
    use tangle_ledger::{
        BalanceDiffEngine, BundleValidator, LedgerApi, LedgerError, TransactionStore,
    };

    use crate::fixtures::{address, Harness, ShufflingStore};

    const ACCOUNTS: u32 = 4;
    const START_BALANCE: i64 = 1_000;

    fn balances() -> Vec<(Address, i64)> {
        (0..ACCOUNTS).map(|n| (address(n), START_BALANCE)).collect()
    }

    fn supply() -> i128 {
        i128::from(START_BALANCE) * i128::from(ACCOUNTS)
    }

    // =========================================================================
    // Properties 1 & 2: conservation and non-negativity
    // =========================================================================

    /// Transfers grouped by round: (from, to, amount).
    fn rounds_strategy() -> impl Strategy<Value = Vec<Vec<(u32, u32, i64)>>> {
        let transfer = (0..ACCOUNTS, 0..ACCOUNTS, 1..600i64);
        prop::collection::vec(prop::collection::vec(transfer, 1..4), 1..6)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn test_supply_conserved_and_balances_non_negative(rounds in rounds_strategy()) {
            let harness = Harness::new(&balances());
            let mut model: BTreeMap<Address, i64> = balances().into_iter().collect();
            let mut parent = NULL_HASH;

            for (offset, transfers) in rounds.iter().enumerate() {
                let index = offset as u32 + 1;
                let mut delta: BTreeMap<Address, i64> = BTreeMap::new();
                for &(from, to, amount) in transfers {
                    parent = harness.transfer(address(from), address(to), amount, parent, NULL_HASH);
                    *delta.entry(address(from)).or_insert(0) -= amount;
                    *delta.entry(address(to)).or_insert(0) += amount;
                }
                let round = harness.round(index, &[parent]);

                let acceptable = delta
                    .iter()
                    .all(|(addr, change)| model.get(addr).copied().unwrap_or(0) + change >= 0);
                let applied = harness.ledger.apply_round_to_ledger(&round).unwrap();
                prop_assert_eq!(applied, acceptable);

                prop_assert_eq!(harness.total(), supply());
                prop_assert!(harness.snapshots.latest().state.is_consistent());
                if !applied {
                    prop_assert_eq!(harness.ledger.latest_snapshot_index(), index - 1);
                    break;
                }
                for (addr, change) in delta {
                    *model.entry(addr).or_insert(0) += change;
                }
                for (addr, expected) in &model {
                    prop_assert_eq!(harness.balance(addr), *expected);
                }
            }
        }
    }

    // =========================================================================
    // Property 3: idempotence
    // =========================================================================

    #[test]
    fn test_reapplying_round_is_noop() {
        let harness = Harness::new(&balances());
        let tail = harness.transfer(address(0), address(1), 100, NULL_HASH, NULL_HASH);
        let round = harness.round(1, &[tail]);

        assert!(harness.ledger.apply_round_to_ledger(&round).unwrap());
        let before = harness.snapshots.latest().clone();
        let diffs = harness.rounds.state_diff_count();

        assert!(!harness.ledger.apply_round_to_ledger(&round).unwrap());
        assert_eq!(*harness.snapshots.latest(), before);
        assert_eq!(harness.rounds.state_diff_count(), diffs);
        assert_eq!(harness.balance(&address(1)), START_BALANCE + 100);
    }

    // =========================================================================
    // Property 4: monotonic ordering
    // =========================================================================

    #[test]
    fn test_round_cannot_overtake_stored_predecessor() {
        let harness = Harness::new(&balances());
        let first = harness.transfer(address(0), address(1), 10, NULL_HASH, NULL_HASH);
        let second = harness.transfer(address(1), address(2), 10, first, NULL_HASH);
        let round1 = harness.round(1, &[first]);
        let round2 = harness.round(2, &[second]);

        let err = harness.ledger.apply_round_to_ledger(&round2).unwrap_err();
        assert_eq!(
            err,
            LedgerError::RoundOutOfOrder {
                expected: 1,
                actual: 2
            }
        );
        assert_eq!(harness.ledger.latest_snapshot_index(), 0);

        assert!(harness.ledger.apply_round_to_ledger(&round1).unwrap());
        assert!(harness.ledger.apply_round_to_ledger(&round2).unwrap());
        assert_eq!(harness.balance(&address(0)), START_BALANCE - 10);
        assert_eq!(harness.balance(&address(1)), START_BALANCE);
        assert_eq!(harness.balance(&address(2)), START_BALANCE + 10);
    }

    #[test]
    fn test_restart_replays_applied_rounds() {
        let harness = Harness::new(&balances());
        let tail = harness.transfer(address(3), address(0), 250, NULL_HASH, NULL_HASH);
        let round = harness.round(1, &[tail]);
        assert!(harness.ledger.apply_round_to_ledger(&round).unwrap());

        let restarted =
            Harness::with_stores(&balances(), harness.tangle.clone(), harness.rounds.clone());
        assert_eq!(restarted.ledger.latest_snapshot_index(), 0);
        restarted.ledger.restore_ledger_state().unwrap();

        assert_eq!(*restarted.snapshots.latest(), *harness.snapshots.latest());
        assert_eq!(restarted.balance(&address(3)), START_BALANCE - 250);
    }

    // =========================================================================
    // Property 5: visited-set determinism
    // =========================================================================

    /// Transfers whose branches point at random earlier tails.
    fn dag_strategy() -> impl Strategy<Value = Vec<(u32, u32, i64, prop::sample::Index)>> {
        prop::collection::vec(
            (0..ACCOUNTS, 0..ACCOUNTS, 1..50i64, any::<prop::sample::Index>()),
            2..24,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_balance_diff_independent_of_walk_order(
            transfers in dag_strategy(),
            seed in any::<u64>(),
        ) {
            let harness = Harness::new(&balances());
            let mut tails: Vec<Hash> = Vec::new();
            for (from, to, amount, pick) in transfers {
                let trunk = tails.last().copied().unwrap_or(NULL_HASH);
                let branch = if tails.is_empty() { NULL_HASH } else { tails[pick.index(tails.len())] };
                tails.push(harness.transfer(address(from), address(to), amount, trunk, branch));
            }
            let start = [*tails.last().unwrap()];

            let mut plain_visited = HashSet::new();
            let plain = harness
                .ledger
                .generate_balance_diff(&mut plain_visited, &start, 1)
                .unwrap();

            let shuffled_store: Arc<dyn TransactionStore> =
                Arc::new(ShufflingStore::new(harness.tangle.clone(), seed));
            let shuffled_engine = BalanceDiffEngine::new(
                shuffled_store,
                harness.bundle_validator.clone(),
                harness.snapshots.clone(),
            );
            let mut shuffled_visited = HashSet::new();
            let shuffled = shuffled_engine
                .generate_balance_diff(&mut shuffled_visited, start, 1)
                .unwrap();

            prop_assert!(plain.is_some());
            prop_assert_eq!(plain, shuffled);
            prop_assert_eq!(plain_visited, shuffled_visited);
        }
    }

    // =========================================================================
    // Properties 8 & 9: three-transaction bundle
    // =========================================================================

    #[test]
    fn test_three_transaction_bundle_diff() {
        let a = address(0);
        let b = address(1);
        let harness = Harness::new(&[(a, 100)]);
        let tail = harness.store_all(harness.bundle(&[(a, -10), (address(7), 0), (b, 10)], NULL_HASH, NULL_HASH));

        let mut visited = HashSet::new();
        let boundary = harness.ledger.latest_snapshot_index() + 1;
        let diff = harness
            .ledger
            .generate_balance_diff(&mut visited, &[tail], boundary)
            .unwrap()
            .unwrap();

        assert_eq!(diff.len(), 2);
        assert_eq!(diff[&a], -10);
        assert_eq!(diff[&b], 10);
        assert!(visited.contains(&tail));
        assert!(visited.contains(&NULL_HASH));
    }

    #[test]
    fn test_unbalanced_bundle_yields_no_diff() {
        let a = address(0);
        let b = address(1);
        let harness = Harness::new(&[(a, 100)]);
        let mut txs = harness.bundle(&[(a, -10), (address(7), 0), (b, 10)], NULL_HASH, NULL_HASH);
        txs[2].value = 5;
        assert!(harness.bundle_validator.is_inconsistent(&txs));
        let tail = harness.store_all(txs);

        assert!(harness.bundle_validator.validate(&tail).unwrap().is_empty());
        let mut visited = HashSet::new();
        let boundary = harness.ledger.latest_snapshot_index() + 1;
        assert_eq!(
            harness
                .ledger
                .generate_balance_diff(&mut visited, &[tail], boundary)
                .unwrap(),
            None
        );
    }
}
