//! Benchmarks for variable store notification and history
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hmi_player::nodes::scale_series;
use hmi_player::store::VariableStore;
use hmi_player::types::Rect;
use std::cell::Cell;
use std::rc::Rc;

fn bench_set_with_subscribers(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_with_subscribers");

    for subscribers in [0usize, 1, 8, 64].iter() {
        let store = VariableStore::shared();
        let hits = Rc::new(Cell::new(0u64));
        let _guards: Vec<_> = (0..*subscribers)
            .map(|_| {
                let hits = Rc::clone(&hits);
                store.subscribe("temperature_value", move |_| hits.set(hits.get() + 1))
            })
            .collect();

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("set", subscribers),
            subscribers,
            |b, _| {
                let mut value = 0.0;
                b.iter(|| {
                    store.set("temperature_value", black_box(value));
                    value += 0.1;
                });
            },
        );
    }

    group.finish();
}

fn bench_history_at_capacity(c: &mut Criterion) {
    let store = VariableStore::new();
    for i in 0..store.history_capacity() {
        store.push_history("temperature_history", i as f64);
    }

    c.bench_function("push_history_full", |b| {
        let mut value = 0.0;
        b.iter(|| {
            store.push_history("temperature_history", black_box(value));
            value += 1.0;
        });
    });
}

fn bench_chart_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart_scaling");
    let area = Rect::new(20.0, 350.0, 400.0, 200.0);

    for size in [50usize, 100].iter() {
        let samples: Vec<f64> = (0..*size).map(|i| (i as f64 * 0.1).sin()).collect();
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("scale_series", size), &samples, |b, s| {
            b.iter(|| black_box(scale_series(s, area)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_set_with_subscribers,
    bench_history_at_capacity,
    bench_chart_scaling
);
criterion_main!(benches);
