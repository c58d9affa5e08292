use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use borders::types::RawTransaction;
use borders::{mine, IndexKind, MinerConfig};

/// Synthetic basket data: each transaction draws items around a few planted patterns.
fn generate_transactions(
    num_transactions: usize,
    num_items: u32,
    num_patterns: usize,
    seed: u64,
) -> Vec<RawTransaction> {
    let mut rng = StdRng::seed_from_u64(seed);
    let patterns: Vec<Vec<u32>> = (0..num_patterns)
        .map(|_| {
            let len = rng.gen_range(4..12);
            (0..len).map(|_| rng.gen_range(0..num_items)).collect()
        })
        .collect();

    (0..num_transactions)
        .map(|_| {
            let mut transaction: Vec<u32> = patterns[rng.gen_range(0..num_patterns)]
                .iter()
                .copied()
                .filter(|_| rng.gen_bool(0.9))
                .collect();
            for _ in 0..rng.gen_range(0..5) {
                transaction.push(rng.gen_range(0..num_items));
            }
            transaction.sort_unstable();
            transaction.dedup();
            transaction
        })
        .collect()
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("border_scaling");

    let configs = vec![
        ("small_1000tx", 1_000, 50, 5),
        ("medium_5000tx", 5_000, 100, 10),
        ("large_20000tx", 20_000, 200, 20),
    ];

    for (name, num_tx, num_items, num_patterns) in configs {
        let transactions = generate_transactions(num_tx, num_items, num_patterns, 7);
        let config = MinerConfig::new((num_tx / 50) as u32);

        group.bench_with_input(BenchmarkId::from_parameter(name), &transactions, |b, tx| {
            b.iter(|| mine(black_box(tx), black_box(&config)));
        });
    }

    group.finish();
}

fn bench_index_kinds(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_kind");
    let transactions = generate_transactions(5_000, 100, 10, 11);

    for (name, kind) in [("tree", IndexKind::Tree), ("flat", IndexKind::Flat)] {
        let config = MinerConfig::new(100).with_level_cap(2).with_index(kind);
        group.bench_function(name, |b| {
            b.iter(|| mine(black_box(&transactions), black_box(&config)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scaling, bench_index_kinds);
criterion_main!(benches);
