//! Benchmarks for the novelty table: arity-one and arity-two tuple
//! tests over state-sized atom lists.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use groundplan::novelty::NoveltyTable;

fn states(count: usize, atoms: usize, universe: u32) -> Vec<Vec<u32>> {
    (0..count)
        .map(|i| {
            let mut state: Vec<u32> = (0..atoms)
                .map(|j| ((i * 31 + j * 17) as u32) % universe)
                .collect();
            state.sort_unstable();
            state.dedup();
            state
        })
        .collect()
}

fn bench_novelty(c: &mut Criterion) {
    let mut group = c.benchmark_group("novelty_test");
    for arity in [1usize, 2] {
        let inputs = states(256, 32, 512);
        group.bench_with_input(BenchmarkId::from_parameter(arity), &inputs, |b, inputs| {
            b.iter(|| {
                let mut table = NoveltyTable::new(arity);
                for state in inputs {
                    black_box(table.test_novel(state).unwrap());
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_novelty);
criterion_main!(benches);
