//! Benchmarks for flattening and chart layout
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use table_chart::chart::{ChartLayout, ChartSize};
use table_chart::table::{flatten, ViewportData};

fn create_viewport(rows: usize, columns: usize) -> ViewportData {
    let names: Vec<String> = (0..columns).map(|c| format!("c{}", c)).collect();
    let mut data = ViewportData::new(names);
    for r in 0..rows {
        data.push_row((0..columns).map(|c| (r * c) as f64));
    }
    data
}

fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");

    for rows in [10, 1000, 100_000] {
        let data = create_viewport(rows, 4);

        group.throughput(Throughput::Elements(rows as u64));

        group.bench_function(format!("flatten_{}x4", rows), |b| {
            b.iter(|| flatten(black_box(&data)))
        });
    }

    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");

    for rows in [10, 1000] {
        let mut data = ViewportData::new(["x", "y"]);
        for i in 0..rows as i64 {
            data.push_row([i, i * i]);
        }
        let points = flatten(&data);

        group.bench_function(format!("bars_{}", rows), |b| {
            b.iter(|| ChartLayout::compute(black_box(&points), ChartSize::default()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_flatten, bench_layout);
criterion_main!(benches);
