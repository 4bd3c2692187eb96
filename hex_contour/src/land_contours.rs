//! Contours for edges without a river.
//!
//! A dry edge keeps its raw corners unless a river bank already claims a point
//! at one of them, in which case it borrows that point so the cells on both
//! sides of the edge agree on where the boundary starts and ends.

use bevy::math::Vec2;

use crate::contour::{ContourError, ContourStore};
use crate::direction::HexDirection;
use crate::geometry::approx_eq;
use crate::grid::{CellIndex, HexGrid};

fn push_distinct(points: &mut Vec<Vec2>, point: Vec2) {
    if points.last().map_or(true, |last| !approx_eq(*last, point)) {
        points.push(point);
    }
}

/// Points the dry contour `(cell, d)` starts with, clockwise around `cell`.
fn leading_points(
    grid: &HexGrid,
    store: &ContourStore,
    cell: CellIndex,
    d: HexDirection,
) -> Result<Vec<Vec2>, ContourError> {
    if grid.has_river(cell, d.previous()) {
        return Ok(vec![store.contour(cell, d.previous())?.last()]);
    }
    let Some(across) = grid.neighbor(cell, d) else {
        return Ok(vec![grid.corner(cell, d)]);
    };
    if !grid.has_river(across, d.previous2()) {
        return Ok(vec![grid.corner(cell, d)]);
    }
    Ok(vec![store.contour(across, d.previous2())?.first()])
}

/// Points the dry contour `(cell, d)` ends with, clockwise around `cell`.
fn trailing_points(
    grid: &HexGrid,
    store: &ContourStore,
    cell: CellIndex,
    d: HexDirection,
) -> Result<Vec<Vec2>, ContourError> {
    if grid.has_river(cell, d.next()) {
        return Ok(vec![store.contour(cell, d.next())?.first()]);
    }
    let Some(across) = grid.neighbor(cell, d) else {
        return Ok(vec![grid.second_corner(cell, d)]);
    };
    if !grid.has_river(across, d.next2()) {
        return Ok(vec![grid.second_corner(cell, d)]);
    }
    let mut points = vec![store.contour(across, d.next2())?.last()];
    // an open river end at this corner leaves the far bank on the next edge
    if let Some(next) = grid.neighbor(cell, d.next()) {
        if grid.has_river(next, d.previous()) {
            push_distinct(&mut points, store.contour(next, d.previous())?.first());
        }
    }
    Ok(points)
}

/// Contour points for one dry edge.
pub fn land_contour_points(
    grid: &HexGrid,
    store: &ContourStore,
    cell: CellIndex,
    d: HexDirection,
) -> Result<Vec<Vec2>, ContourError> {
    let mut points = leading_points(grid, store, cell, d)?;
    for point in trailing_points(grid, store, cell, d)? {
        push_distinct(&mut points, point);
    }
    if points.len() < 2 {
        // both ends collapsed onto one point; keep the raw edge
        points = vec![grid.corner(cell, d), grid.second_corner(cell, d)];
    }
    Ok(points)
}

/// Fill every dry edge of the grid. Bank contours must already be in `store`.
///
/// Edges that keep their raw corner pair stay unset and resolve to the
/// default contour. Returns the number of contours written.
pub fn build_land_contours(
    grid: &HexGrid,
    store: &mut ContourStore,
) -> Result<usize, ContourError> {
    let mut pending = Vec::new();
    let mut untouched = 0usize;
    for cell in grid.cells() {
        for d in HexDirection::ALL {
            if cell.has_river(d) {
                continue;
            }
            let points = land_contour_points(grid, store, cell.index, d)?;
            let raw = points.len() == 2
                && points[0] == grid.corner(cell.index, d)
                && points[1] == grid.second_corner(cell.index, d);
            if raw {
                untouched += 1;
            } else {
                pending.push((cell.index, d, points));
            }
        }
    }
    let written = pending.len();
    for (cell, d, points) in pending {
        store.set(cell, d, points)?;
    }
    tracing::debug!(
        target: "hex_contour::contours",
        contours = written,
        untouched,
        "land_contours.built"
    );
    Ok(written)
}
