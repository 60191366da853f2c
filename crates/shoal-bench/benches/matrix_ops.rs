//! Criterion micro-benchmarks for age-band matrix operations.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use shoal_bench::{growth_grid, reference_profile, stress_profile};
use shoal_core::RecordingDiagnostics;
use shoal_length::ConversionIndex;
use shoal_matrix::AgeBandMatrix;

/// Benchmark: add one area into another on the same grid (15 × 60).
fn bench_add_same_grid(c: &mut Criterion) {
    let p = reference_profile(42);
    let ci = ConversionIndex::new(&p.config.lengths, &p.config.lengths);
    let (_, source) = p.stock.get_index(0).unwrap();
    let (_, target) = p.stock.get_index(1).unwrap();
    let diag = RecordingDiagnostics::new();

    c.bench_function("add_same_grid_15x60", |b| {
        b.iter(|| {
            let mut t = target.clone();
            t.add(source, &ci, 0.5, t.ages(), &diag);
            black_box(&t);
        });
    });
}

/// Benchmark: spread a stock matrix onto a 4× finer growth grid.
fn bench_add_to_finer_grid(c: &mut Criterion) {
    let p = reference_profile(42);
    let fine_grid = growth_grid(&p.config).unwrap();
    let ci = ConversionIndex::new(&p.config.lengths, &fine_grid);
    let (_, source) = p.stock.get_index(0).unwrap();
    let windows = vec![0..fine_grid.len(); source.age_count()];
    let empty = AgeBandMatrix::new(source.min_age(), &windows).unwrap();
    let diag = RecordingDiagnostics::new();

    c.bench_function("add_to_finer_grid_15x240", |b| {
        b.iter(|| {
            let mut fine = empty.clone();
            fine.add(source, &ci, 1.0, fine.ages(), &diag);
            black_box(&fine);
        });
    });
}

/// Benchmark: length-dependent mortality on the stress profile (30 × 200).
fn bench_multiply(c: &mut Criterion) {
    let p = stress_profile(42);
    let ci = ConversionIndex::new(&p.config.lengths, &p.config.lengths);
    let ratio = vec![0.97; p.config.lengths.len()];
    let (_, m) = p.stock.get_index(0).unwrap();
    let diag = RecordingDiagnostics::new();

    c.bench_function("multiply_30x200", |b| {
        b.iter(|| {
            let mut m = m.clone();
            m.multiply(black_box(&ratio), &ci, &diag);
            black_box(&m);
        });
    });
}

/// Benchmark: consumption removal on the stress profile (30 × 200).
fn bench_subtract(c: &mut Criterion) {
    let p = stress_profile(42);
    let ci = ConversionIndex::new(&p.config.lengths, &p.config.lengths);
    let (_, m) = p.stock.get_index(0).unwrap();
    let prior = m.column_sums();
    let eaten: Vec<f64> = prior.iter().map(|c| 0.1 * c.count).collect();
    let diag = RecordingDiagnostics::new();

    c.bench_function("subtract_30x200", |b| {
        b.iter(|| {
            let mut m = m.clone();
            m.subtract(&eaten, &ci, &prior, &diag);
            black_box(&m);
        });
    });
}

/// Benchmark: one ageing step on the stress profile (30 × 200).
fn bench_increment_age(c: &mut Criterion) {
    let p = stress_profile(42);
    let (_, m) = p.stock.get_index(0).unwrap();

    c.bench_function("increment_age_30x200", |b| {
        b.iter(|| {
            let mut m = m.clone();
            m.increment_age();
            black_box(&m);
        });
    });
}

/// Benchmark: column sums on the stress profile (30 × 200).
fn bench_column_sums(c: &mut Criterion) {
    let p = stress_profile(42);
    let (_, m) = p.stock.get_index(0).unwrap();

    c.bench_function("column_sums_30x200", |b| {
        b.iter(|| black_box(m.column_sums()));
    });
}

criterion_group!(
    benches,
    bench_add_same_grid,
    bench_add_to_finer_grid,
    bench_multiply,
    bench_subtract,
    bench_increment_age,
    bench_column_sums
);
criterion_main!(benches);
