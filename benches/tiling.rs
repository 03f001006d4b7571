//! Benchmarks for the tetromino tiling counter.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tetcarpet::pieces::{Piece, Shape};
use tetcarpet::{result, result_with, SearchOptions};

/// Benchmark building every rotation of every shape.
fn bench_rotations(c: &mut Criterion) {
    c.bench_function("all_shape_rotations", |b| {
        b.iter(|| {
            Shape::ALL
                .iter()
                .map(|&shape| Piece::rotations(black_box(shape)).len())
                .sum::<usize>()
        })
    });
}

/// Benchmark small square carpets with the cache.
fn bench_square_carpets(c: &mut Criterion) {
    let mut group = c.benchmark_group("square");
    for size in [4usize, 6, 8] {
        group.bench_function(format!("{size}x{size}"), |b| {
            b.iter(|| result(black_box(size), black_box(size)))
        });
    }
    group.finish();
}

/// Benchmark a tall carpet that needs the wide key.
fn bench_tall_carpet(c: &mut Criterion) {
    let mut group = c.benchmark_group("tall");
    group.sample_size(10);
    group.bench_function("40x4", |b| b.iter(|| result(black_box(40), black_box(4))));
    group.finish();
}

/// Benchmark the uncached reference search.
fn bench_uncached(c: &mut Criterion) {
    let options = SearchOptions { memoize: false };
    c.bench_function("uncached_4x6", |b| {
        b.iter(|| result_with(black_box(4), black_box(6), options))
    });
}

criterion_group!(
    benches,
    bench_rotations,
    bench_square_carpets,
    bench_tall_carpet,
    bench_uncached
);
criterion_main!(benches);
