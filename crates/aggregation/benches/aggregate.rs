//! Benchmarks for the sliding-window aggregator.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gridtide_aggregation::{aggregate, AggregateParams};
use gridtide_core::TileBBox;

/// Build a buffer of `cells` records, each a dense `span`-long series
/// with a varied, noise-like pattern.
fn create_buffer(cells: u16, span: u16) -> Vec<u16> {
    let mut buffer = Vec::with_capacity(cells as usize * (3 + span as usize));
    for cell in 0..cells {
        buffer.push(cell);
        buffer.push(100);
        buffer.push(100 + span - 1);
        for t in 0..span {
            buffer.push((cell * 7 + t * 13) % 100);
        }
    }
    buffer
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for cells in [64u16, 1024, 4096].iter() {
        let buffer = create_buffer(*cells, 365);
        let params = AggregateParams::new(TileBBox::new(0.0, 0.0, 1.0, 1.0), 100);

        group.bench_with_input(BenchmarkId::from_parameter(cells), cells, |b, _| {
            b.iter(|| aggregate(black_box(&buffer), &params).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_aggregate);
criterion_main!(benches);
