mod common;

use anyhow::Result;
use hex_contour::{HexDirection, RiverContourCache, SectionId};

fn bank_bits(cache: &RiverContourCache) -> Result<Vec<(u32, u32)>> {
    let mut bits = Vec::new();
    for cell in cache.grid().cells() {
        for direction in HexDirection::ALL {
            for point in cache.contour(cell.index, direction)?.points() {
                bits.push((point.x.to_bits(), point.y.to_bits()));
            }
        }
    }
    Ok(bits)
}

#[test]
fn rebuilds_are_bit_identical() -> Result<()> {
    let grid = common::random_river_grid(14, 20, 7);
    let first = common::build_cache(grid.clone())?;
    let second = common::build_cache(grid)?;
    let third = first.rebuild_contours()?;

    let expected = bank_bits(&first)?;
    assert_eq!(expected, bank_bits(&second)?);
    assert_eq!(expected, bank_bits(&third)?);

    let rivers = |cache: &RiverContourCache| -> Vec<Vec<SectionId>> {
        cache.rivers().iter().map(|r| r.sections().to_vec()).collect()
    };
    assert_eq!(rivers(&first), rivers(&second));
    assert_eq!(first.rationalize_summary(), third.rationalize_summary());
    Ok(())
}

#[test]
fn parallel_classification_matches_sequential() -> Result<()> {
    let cache = common::build_cache(common::random_river_grid(10, 12, 3))?;
    let points = common::sample_points(cache.grid(), 1500, 9);
    let sequential: Vec<_> = points.iter().map(|p| cache.locate(*p)).collect();
    assert_eq!(cache.classify_points_par(&points), sequential);
    Ok(())
}
