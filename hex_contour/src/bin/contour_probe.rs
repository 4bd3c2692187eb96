//! Build the contour partition for a grid description and classify points.
//!
//! Usage: `contour_probe <grid.json> [x y]...`
//!
//! Without explicit points every cell centre and edge midpoint is probed.
//! Each result is printed as one JSON line.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use bevy::math::Vec2;
use tracing::info;

use hex_contour::{
    load_contour_config_from_env, GridDescription, HexDirection, HexGrid, HexMetrics,
    RiverContourCache,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        bail!("usage: contour_probe <grid.json> [x y]...");
    };
    let points = parse_points(args.collect())?;

    let (config, config_path) = load_contour_config_from_env();
    let description = GridDescription::from_file(&path)
        .with_context(|| format!("loading grid description {}", path.display()))?;
    let grid = HexGrid::from_description(&description, HexMetrics::from_config(&config.hex))?;
    let cache = RiverContourCache::build(Arc::new(grid), config)?;

    info!(
        grid = %path.display(),
        config = ?config_path,
        rivers = cache.rivers().len(),
        sections = cache.sections().len(),
        "contour probe ready"
    );

    let points = if points.is_empty() {
        default_probes(cache.grid())
    } else {
        points
    };
    let results = cache.classify_points_par(&points);
    let mut missed = 0usize;
    for (point, classification) in points.iter().zip(&results) {
        if !classification.is_found() {
            missed += 1;
        }
        let line = serde_json::json!({
            "point": [point.x, point.y],
            "classification": classification,
        });
        println!("{line}");
    }
    info!(probes = points.len(), missed, "contour probe finished");
    Ok(())
}

fn parse_points(raw: Vec<String>) -> Result<Vec<Vec2>> {
    if raw.len() % 2 != 0 {
        bail!("points must be given as x y pairs, got {} values", raw.len());
    }
    raw.chunks(2)
        .map(|pair| {
            let x: f32 = pair[0]
                .parse()
                .with_context(|| format!("invalid x coordinate {:?}", pair[0]))?;
            let y: f32 = pair[1]
                .parse()
                .with_context(|| format!("invalid y coordinate {:?}", pair[1]))?;
            Ok(Vec2::new(x, y))
        })
        .collect()
}

fn default_probes(grid: &HexGrid) -> Vec<Vec2> {
    let mut points = Vec::with_capacity(grid.len() * 7);
    for cell in grid.cells() {
        points.push(cell.center);
        for direction in HexDirection::ALL {
            let a = grid.corner(cell.index, direction);
            let b = grid.second_corner(cell.index, direction);
            points.push((a + b) * 0.5);
        }
    }
    points
}
