//! Interning throughput benchmarks.
//!
//! Compares the embedded path (no lock), cache hits, and cold appends.

use std::hint::black_box;

use atom_table::{AtomTable, Snapshot};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Generate N distinct names that do not embed.
fn generate_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("data-attr-{i}")).collect()
}

fn bench_embedded(c: &mut Criterion) {
    let table = AtomTable::new();
    let tags = ["a", "b", "p", "div", "span", "td", "tr", "li", "ul", "img"];

    c.bench_function("intern/embedded", |b| {
        b.iter(|| {
            for tag in tags {
                black_box(table.intern(black_box(tag)));
            }
        });
    });
}

fn bench_cold_intern(c: &mut Criterion) {
    let mut group = c.benchmark_group("intern/cold");

    for n in [100, 1000, 5000] {
        let names = generate_names(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &names, |b, names| {
            b.iter(|| {
                let table = AtomTable::new();
                for name in names {
                    black_box(table.intern(name));
                }
            });
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for n in [100, 1000, 5000] {
        let names = generate_names(n);
        let table = AtomTable::new();
        for name in &names {
            table.intern(name);
        }
        let data = table.save().data;

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("cached", n), &names, |b, names| {
            b.iter(|| {
                for name in names {
                    black_box(table.lookup(name));
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("scan", n), &names, |b, names| {
            b.iter(|| {
                // Fresh table without a cache forces a scan for every name.
                let cold = AtomTable::from_snapshot(Snapshot::from_data(data.clone()));
                for name in names {
                    black_box(cold.lookup(name));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_embedded, bench_cold_intern, bench_lookup);
criterion_main!(benches);
