use std::sync::Arc;

use bevy::math::Vec2;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use hex_contour::{ContourConfig, HexDirection, HexGrid, HexMetrics, RiverContourCache, RiverFlow};

fn river_grid(size: u32, seed: u64) -> HexGrid {
    let mut grid = HexGrid::new(size, size, HexMetrics::default());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let edges = (size * size / 3) as usize;
    for _ in 0..edges {
        let x = rng.gen_range(0..size as i32);
        let z = rng.gen_range(0..size as i32);
        let direction = HexDirection::from_index(rng.gen_range(0..6));
        let flow = if rng.gen_bool(0.5) {
            RiverFlow::Clockwise
        } else {
            RiverFlow::Counterclockwise
        };
        if let Ok(cell) = grid.offset_index(x, z) {
            // border edges are rejected; skipping them is fine here
            let _ = grid.set_river(cell, direction, flow);
        }
    }
    grid
}

fn sample_points(grid: &HexGrid, count: usize, seed: u64) -> Vec<Vec2> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let cells: Vec<Vec2> = grid.cells().map(|cell| cell.center).collect();
    let radius = grid.metrics().outer_radius();
    (0..count)
        .map(|_| {
            let center = cells[rng.gen_range(0..cells.len())];
            center + Vec2::new(rng.gen_range(-radius..radius), rng.gen_range(-radius..radius))
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("contours");
    for size in [8u32, 16, 32] {
        let grid = Arc::new(river_grid(size, 7));
        group.bench_with_input(BenchmarkId::new("build", size), &grid, |b, grid| {
            b.iter_batched(
                || (Arc::clone(grid), ContourConfig::builtin()),
                |(grid, config)| RiverContourCache::build(grid, config),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let grid = Arc::new(river_grid(32, 11));
    let points = sample_points(&grid, 4096, 3);
    let cache = match RiverContourCache::build(grid, ContourConfig::builtin()) {
        Ok(cache) => cache,
        Err(err) => panic!("benchmark grid failed to build: {err}"),
    };
    group.bench_function("locate", |b| {
        b.iter(|| points.iter().filter(|p| cache.locate(**p).is_found()).count())
    });
    group.bench_function("par", |b| b.iter(|| cache.classify_points_par(&points)));
    group.finish();
}

criterion_group!(classify_benches, bench_build, bench_classify);
criterion_main!(classify_benches);
