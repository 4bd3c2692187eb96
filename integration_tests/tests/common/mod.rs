#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Once};

use anyhow::{Context, Result};
use bevy::math::Vec2;
use hex_contour::{
    load_contour_config_from_env, ContourConfig, GridDescription, HexDirection, HexGrid,
    HexMetrics, RiverContourCache, RiverFlow,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

static INIT: Once = Once::new();

pub const TOLERANCE: f32 = 1e-3;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn ensure_test_config() {
    INIT.call_once(|| {
        let config_path = fixture_path("test_contour_config.json");

        debug_assert!(
            config_path.exists(),
            "missing test contour config at {}",
            config_path.display()
        );

        std::env::set_var("CONTOUR_CONFIG_PATH", &config_path);
    });
}

pub fn test_config() -> Arc<ContourConfig> {
    ensure_test_config();
    load_contour_config_from_env().0
}

pub fn fixture_grid(name: &str) -> Result<HexGrid> {
    let path = fixture_path(name);
    let description = GridDescription::from_file(&path)
        .with_context(|| format!("reading fixture {}", path.display()))?;
    let config = test_config();
    Ok(HexGrid::from_description(
        &description,
        HexMetrics::from_config(&config.hex),
    )?)
}

/// Grid with rivers drawn as seeded random walks along hex edges.
///
/// Every step leaves the downstream corner of the previous edge, either along
/// the same cell or across into the neighbour, so walks form connected rivers
/// that may run into earlier ones.
pub fn random_river_grid(size: u32, walks: usize, seed: u64) -> HexGrid {
    let mut grid = HexGrid::new(size, size, HexMetrics::default());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for _ in 0..walks {
        let x = rng.gen_range(1..size as i32 - 1);
        let z = rng.gen_range(1..size as i32 - 1);
        let Ok(mut cell) = grid.offset_index(x, z) else {
            continue;
        };
        let mut direction = HexDirection::from_index(rng.gen_range(0..6));
        let mut flow = RiverFlow::Clockwise;
        let length = rng.gen_range(2..8);
        for _ in 0..length {
            if grid.has_river(cell, direction) || grid.set_river(cell, direction, flow).is_err() {
                break;
            }
            let stay = rng.gen_bool(0.5);
            match (flow, stay) {
                (RiverFlow::Clockwise, true) => direction = direction.next(),
                (RiverFlow::Counterclockwise, true) => direction = direction.previous(),
                (_, false) => {
                    let Some(across) = grid.neighbor(cell, direction) else {
                        break;
                    };
                    cell = across;
                    (direction, flow) = match flow {
                        RiverFlow::Clockwise => {
                            (direction.opposite().previous(), RiverFlow::Counterclockwise)
                        }
                        RiverFlow::Counterclockwise => {
                            (direction.opposite().next(), RiverFlow::Clockwise)
                        }
                    };
                }
            }
        }
    }
    grid
}

pub fn build_cache(grid: HexGrid) -> Result<RiverContourCache> {
    Ok(RiverContourCache::build(Arc::new(grid), test_config())?)
}

/// Seeded points scattered over the interior of the grid.
pub fn sample_points(grid: &HexGrid, count: usize, seed: u64) -> Vec<Vec2> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let interior: Vec<Vec2> = grid
        .cells()
        .filter(|cell| HexDirection::ALL.iter().all(|d| grid.neighbor(cell.index, *d).is_some()))
        .map(|cell| cell.center)
        .collect();
    let radius = grid.metrics().outer_radius();
    (0..count)
        .map(|_| {
            let center = interior[rng.gen_range(0..interior.len())];
            center + Vec2::new(rng.gen_range(-radius..radius), rng.gen_range(-radius..radius))
        })
        .collect()
}

pub fn approx(a: Vec2, b: Vec2) -> bool {
    a.distance(b) <= TOLERANCE
}
