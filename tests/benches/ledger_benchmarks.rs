//! # Ledger Benchmarks
//!
//! | Operation | Shape |
//! |-----------|-------|
//! | Balance diff | Chain of N transfers, fresh visited set |
//! | Consistency check | One tip over N unconfirmed transfers |
//! | Round application | One round confirming N transfers |

use std::collections::HashSet;
use std::time::Duration;

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared_types::{Address, Hash, NULL_HASH};
use tangle_ledger::LedgerApi;
use tangle_tests::fixtures::{address, Harness};

const ACCOUNTS: u32 = 16;
const CHAIN_LENGTHS: [usize; 3] = [10, 100, 1_000];

fn balances() -> Vec<(Address, i64)> {
    (0..ACCOUNTS).map(|n| (address(n), 1_000_000)).collect()
}

/// `length` random transfers, each approving the previous one and a random
/// earlier tail. Returns the last tail.
fn build_chain(harness: &Harness, length: usize, seed: u64) -> Hash {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut tails: Vec<Hash> = Vec::with_capacity(length);
    for _ in 0..length {
        let from = address(rng.gen_range(0..ACCOUNTS));
        let to = address(rng.gen_range(0..ACCOUNTS));
        let trunk = tails.last().copied().unwrap_or(NULL_HASH);
        let branch = if tails.is_empty() {
            NULL_HASH
        } else {
            tails[rng.gen_range(0..tails.len())]
        };
        tails.push(harness.transfer(from, to, rng.gen_range(1..100), trunk, branch));
    }
    tails.last().copied().unwrap_or(NULL_HASH)
}

fn bench_balance_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger-balance-diff");
    group.measurement_time(Duration::from_secs(5));

    for length in CHAIN_LENGTHS {
        let harness = Harness::new(&balances());
        let tip = build_chain(&harness, length, 7);

        group.throughput(Throughput::Elements(length as u64));
        group.bench_with_input(BenchmarkId::new("generate", length), &tip, |b, tip| {
            b.iter(|| {
                let mut visited = HashSet::new();
                black_box(
                    harness
                        .ledger
                        .generate_balance_diff(&mut visited, &[*tip], 1)
                        .ok(),
                )
            })
        });
        group.bench_with_input(BenchmarkId::new("tips_consistent", length), &tip, |b, tip| {
            b.iter(|| black_box(harness.ledger.tips_consistent(&[*tip]).ok()))
        });
    }

    group.finish();
}

fn bench_round_application(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger-round-application");
    group.sample_size(20);

    for length in CHAIN_LENGTHS {
        group.throughput(Throughput::Elements(length as u64));
        group.bench_function(BenchmarkId::new("apply", length), |b| {
            b.iter_batched(
                || {
                    let harness = Harness::new(&balances());
                    let tip = build_chain(&harness, length, 11);
                    let round = harness.round(1, &[tip]);
                    (harness, round)
                },
                |(harness, round)| black_box(harness.ledger.apply_round_to_ledger(&round).ok()),
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_balance_diff, bench_round_application);
criterion_main!(benches);
