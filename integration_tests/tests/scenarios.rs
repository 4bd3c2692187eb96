mod common;

use anyhow::Result;
use bevy::math::Vec2;
use hex_contour::{
    build_river_sections, rationalize_pair, CellIndex, ContourStore, HexDirection, HexGrid,
    HexMetrics, Repair, RiverFlow, RiverTracer, SectionId,
};

#[test]
fn straight_dry_edge_keeps_corner_vectors() -> Result<()> {
    let corners = [
        Vec2::new(5.0, -8.66),
        Vec2::new(10.0, 0.0),
        Vec2::new(5.0, 8.66),
        Vec2::new(-5.0, 8.66),
        Vec2::new(-10.0, 0.0),
        Vec2::new(-5.0, -8.66),
    ];
    let grid = HexGrid::new(1, 1, HexMetrics::from_corners(corners, 0.75));
    let cell = grid.offset_index(0, 0)?;
    assert_eq!(grid.center(cell), Vec2::ZERO);

    let cache = common::build_cache(grid)?;
    assert!(!cache.contours().is_set(cell, HexDirection::E));
    let contour = cache.contour(cell, HexDirection::E)?;
    assert_eq!(contour.points(), &[Vec2::new(10.0, 0.0), Vec2::new(5.0, 8.66)]);

    let rebuilt = cache.rebuild_contours()?;
    assert_eq!(
        rebuilt.contour(cell, HexDirection::E)?.points(),
        &[Vec2::new(10.0, 0.0), Vec2::new(5.0, 8.66)]
    );
    Ok(())
}

#[test]
fn single_section_river() -> Result<()> {
    let mut grid = HexGrid::new(4, 4, HexMetrics::default());
    let a = grid.offset_index(1, 1)?;
    grid.set_river(a, HexDirection::E, RiverFlow::Clockwise)?;
    let graph = build_river_sections(&grid);
    assert_eq!(graph.len(), 1);
    let section = graph.section(SectionId(0));
    assert!(section.is_endpoint_at(section.start_vertex));
    assert!(section.is_endpoint_at(section.end_vertex));

    let mut tracer = RiverTracer::new(&graph);
    assert_eq!(tracer.remaining(), 1);
    let river = tracer.build_river_from_section(SectionId(0))?;
    assert_eq!(river, vec![SectionId(0)]);
    assert_eq!(tracer.remaining(), 0);
    assert!(tracer.is_assigned(SectionId(0)));
    Ok(())
}

#[test]
fn crossing_contours_meet_at_the_crossing() {
    let first = vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(3.0, 0.0),
        Vec2::new(5.0, 1.0),
        Vec2::new(8.0, 3.0),
    ];
    let second = vec![
        Vec2::new(6.0, 4.0),
        Vec2::new(6.0, 0.0),
        Vec2::new(6.0, -3.0),
        Vec2::new(6.0, -6.0),
    ];
    // (5,1)->(8,3) crosses x = 6 at y = 5/3
    let crossing = Vec2::new(6.0, 5.0 / 3.0);
    let (head, tail, repair) = rationalize_pair(&first, &second, Vec2::new(6.0, 1.0), 10.0);
    assert_eq!(repair, Repair::Crossing);
    assert!(common::approx(*head.last().unwrap(), crossing));
    assert!(common::approx(tail[0], crossing));
    assert_eq!(&head[..head.len() - 1], &first[..3]);
    assert_eq!(&tail[1..], &second[1..]);
}

#[test]
fn unknown_cells_are_rejected() {
    let grid = HexGrid::new(2, 2, HexMetrics::default());
    let store = ContourStore::new(&grid);
    assert!(store.contour(CellIndex(9), HexDirection::E).is_err());
}

#[test]
fn band_query_rejects_unknown_cells() -> Result<()> {
    let cache = common::build_cache(HexGrid::new(2, 2, HexMetrics::default()))?;
    let missing = CellIndex(999);
    assert!(cache
        .is_point_between_contours(Vec2::ZERO, missing, HexDirection::E)
        .is_err());
    assert!(cache
        .closest_point_on_contour(Vec2::ZERO, missing, HexDirection::E)
        .is_err());
    Ok(())
}
