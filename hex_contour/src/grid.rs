//! Cell arena for a rectangular patch of pointy-top hexes.
//!
//! Cells are stored row-major and addressed by [`CellIndex`]. Rivers live on
//! cell edges and are always written to both sides with mirrored flow.

use std::{fmt, fs, io, path::Path, path::PathBuf, sync::Arc};

use bevy::math::Vec2;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::direction::{HexDirection, RiverFlow};
use crate::metrics::HexMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex(pub u32);

impl CellIndex {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axial hex coordinates; `r` grows northward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoordinates {
    pub q: i32,
    pub r: i32,
}

impl HexCoordinates {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Row-offset coordinates with odd rows shifted east.
    pub fn from_offset(x: i32, z: i32) -> Self {
        Self {
            q: x - z.div_euclid(2),
            r: z,
        }
    }

    pub fn to_offset(self) -> (i32, i32) {
        (self.q + self.r.div_euclid(2), self.r)
    }

    pub fn neighbor(self, direction: HexDirection) -> Self {
        let (dq, dr) = match direction {
            HexDirection::NE => (0, 1),
            HexDirection::E => (1, 0),
            HexDirection::SE => (1, -1),
            HexDirection::SW => (0, -1),
            HexDirection::W => (-1, 0),
            HexDirection::NW => (-1, 1),
        };
        Self::new(self.q + dq, self.r + dr)
    }

    /// Canonical key of the grid vertex at `corner(direction)` of this cell.
    pub fn corner_vertex(self, direction: HexDirection) -> VertexKey {
        match direction {
            HexDirection::NE => VertexKey::new(self, VertexTip::Top),
            HexDirection::E => VertexKey::new(self.neighbor(HexDirection::NE), VertexTip::Bottom),
            HexDirection::SE => VertexKey::new(self.neighbor(HexDirection::SE), VertexTip::Top),
            HexDirection::SW => VertexKey::new(self, VertexTip::Bottom),
            HexDirection::W => VertexKey::new(self.neighbor(HexDirection::SW), VertexTip::Top),
            HexDirection::NW => VertexKey::new(self.neighbor(HexDirection::NW), VertexTip::Bottom),
        }
    }

    /// Nearest cell to a fractional axial position (cube rounding).
    pub fn round(q: f32, r: f32) -> Self {
        let s = -q - r;
        let mut rq = q.round();
        let mut rr = r.round();
        let rs = s.round();
        let dq = (rq - q).abs();
        let dr = (rr - r).abs();
        let ds = (rs - s).abs();
        if dq > dr && dq > ds {
            rq = -rr - rs;
        } else if dr > ds {
            rr = -rq - rs;
        }
        Self::new(rq as i32, rr as i32)
    }
}

impl fmt::Display for HexCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VertexTip {
    Top,
    Bottom,
}

/// Every grid vertex is the top or bottom tip of exactly one hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexKey {
    pub owner: HexCoordinates,
    pub tip: VertexTip,
}

impl VertexKey {
    pub const fn new(owner: HexCoordinates, tip: VertexTip) -> Self {
        Self { owner, tip }
    }
}

#[derive(Debug, Clone)]
pub struct HexCell {
    pub index: CellIndex,
    pub coordinates: HexCoordinates,
    pub center: Vec2,
    pub elevation: f32,
    rivers: [Option<RiverFlow>; 6],
}

impl HexCell {
    #[inline]
    pub fn river(&self, direction: HexDirection) -> Option<RiverFlow> {
        self.rivers[direction.index()]
    }

    #[inline]
    pub fn has_river(&self, direction: HexDirection) -> bool {
        self.rivers[direction.index()].is_some()
    }

    pub fn river_count(&self) -> usize {
        self.rivers.iter().filter(|r| r.is_some()).count()
    }
}

#[derive(Debug, Error)]
pub enum GridError {
    #[error("cell offset ({x}, {z}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        z: i32,
        width: u32,
        height: u32,
    },
    #[error("cell {cell} has no neighbour toward {direction}")]
    NoNeighbor {
        cell: CellIndex,
        direction: HexDirection,
    },
    #[error("grid description lists {found} elevations for {expected} cells")]
    ElevationCount { expected: usize, found: usize },
    #[error("failed to parse grid description: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read grid description from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct HexGrid {
    pub width: u32,
    pub height: u32,
    metrics: HexMetrics,
    cells: Vec<HexCell>,
}

impl HexGrid {
    pub fn new(width: u32, height: u32, metrics: HexMetrics) -> Self {
        let mut cells = Vec::with_capacity((width * height) as usize);
        for z in 0..height as i32 {
            for x in 0..width as i32 {
                let coordinates = HexCoordinates::from_offset(x, z);
                let center = metrics.axial_to_position(coordinates.q, coordinates.r);
                cells.push(HexCell {
                    index: CellIndex(cells.len() as u32),
                    coordinates,
                    center,
                    elevation: 0.0,
                    rivers: [None; 6],
                });
            }
        }
        Self {
            width,
            height,
            metrics,
            cells,
        }
    }

    pub fn from_description(
        description: &GridDescription,
        metrics: HexMetrics,
    ) -> Result<Self, GridError> {
        let mut grid = HexGrid::new(description.width, description.height, metrics);
        if !description.elevations.is_empty() {
            if description.elevations.len() != grid.cells.len() {
                return Err(GridError::ElevationCount {
                    expected: grid.cells.len(),
                    found: description.elevations.len(),
                });
            }
            for (cell, &elevation) in grid.cells.iter_mut().zip(&description.elevations) {
                cell.elevation = elevation;
            }
        }
        for river in &description.rivers {
            let index = grid.offset_index(river.x, river.z)?;
            grid.set_river(index, river.direction, river.flow)?;
        }
        Ok(grid)
    }

    #[inline]
    pub fn metrics(&self) -> &HexMetrics {
        &self.metrics
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cell(&self, index: CellIndex) -> &HexCell {
        debug_assert!(index.as_usize() < self.cells.len());
        &self.cells[index.as_usize()]
    }

    pub fn get(&self, index: CellIndex) -> Option<&HexCell> {
        self.cells.get(index.as_usize())
    }

    pub fn cells(&self) -> impl Iterator<Item = &HexCell> {
        self.cells.iter()
    }

    pub fn offset_index(&self, x: i32, z: i32) -> Result<CellIndex, GridError> {
        if x < 0 || z < 0 || x >= self.width as i32 || z >= self.height as i32 {
            return Err(GridError::OutOfBounds {
                x,
                z,
                width: self.width,
                height: self.height,
            });
        }
        Ok(CellIndex((z as u32) * self.width + x as u32))
    }

    pub fn index_of(&self, coordinates: HexCoordinates) -> Option<CellIndex> {
        let (x, z) = coordinates.to_offset();
        self.offset_index(x, z).ok()
    }

    pub fn neighbor(&self, index: CellIndex, direction: HexDirection) -> Option<CellIndex> {
        self.index_of(self.cell(index).coordinates.neighbor(direction))
    }

    #[inline]
    pub fn river(&self, index: CellIndex, direction: HexDirection) -> Option<RiverFlow> {
        self.cell(index).river(direction)
    }

    #[inline]
    pub fn has_river(&self, index: CellIndex, direction: HexDirection) -> bool {
        self.cell(index).has_river(direction)
    }

    pub fn set_river(
        &mut self,
        index: CellIndex,
        direction: HexDirection,
        flow: RiverFlow,
    ) -> Result<(), GridError> {
        let neighbor = self
            .neighbor(index, direction)
            .ok_or(GridError::NoNeighbor {
                cell: index,
                direction,
            })?;
        self.cells[index.as_usize()].rivers[direction.index()] = Some(flow);
        self.cells[neighbor.as_usize()].rivers[direction.opposite().index()] =
            Some(flow.mirrored());
        Ok(())
    }

    pub fn remove_river(&mut self, index: CellIndex, direction: HexDirection) {
        self.cells[index.as_usize()].rivers[direction.index()] = None;
        if let Some(neighbor) = self.neighbor(index, direction) {
            self.cells[neighbor.as_usize()].rivers[direction.opposite().index()] = None;
        }
    }

    pub fn set_elevation(&mut self, index: CellIndex, elevation: f32) {
        self.cells[index.as_usize()].elevation = elevation;
    }

    #[inline]
    pub fn center(&self, index: CellIndex) -> Vec2 {
        self.cell(index).center
    }

    /// Absolute position of `corner(direction)` of a cell.
    #[inline]
    pub fn corner(&self, index: CellIndex, direction: HexDirection) -> Vec2 {
        self.center(index) + self.metrics.corner(direction)
    }

    #[inline]
    pub fn second_corner(&self, index: CellIndex, direction: HexDirection) -> Vec2 {
        self.center(index) + self.metrics.second_corner(direction)
    }

    pub fn corner_vertex(&self, index: CellIndex, direction: HexDirection) -> VertexKey {
        self.cell(index).coordinates.corner_vertex(direction)
    }

    /// Cell whose hexagon contains `position`, if it lies on the grid.
    pub fn cell_at(&self, position: Vec2) -> Option<CellIndex> {
        let (q, r) = self.metrics.position_to_axial(position);
        self.index_of(HexCoordinates::round(q, r))
    }

    pub fn river_edge_count(&self) -> usize {
        self.cells.iter().map(HexCell::river_count).sum::<usize>() / 2
    }
}

/// Shared, immutable grid published to the engine.
#[derive(Resource, Debug, Clone)]
pub struct HexGridHandle(Arc<HexGrid>);

impl HexGridHandle {
    pub fn new(grid: Arc<HexGrid>) -> Self {
        Self(grid)
    }

    pub fn get(&self) -> Arc<HexGrid> {
        Arc::clone(&self.0)
    }

    pub fn replace(&mut self, grid: Arc<HexGrid>) {
        self.0 = grid;
    }
}

/// Serialised grid layout: dimensions, optional elevations and river edges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridDescription {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub elevations: Vec<f32>,
    #[serde(default)]
    pub rivers: Vec<RiverEdgeDescription>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiverEdgeDescription {
    pub x: i32,
    pub z: i32,
    pub direction: HexDirection,
    pub flow: RiverFlow,
}

impl GridDescription {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, GridError> {
        let contents = fs::read_to_string(path).map_err(|source| GridError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(GridDescription::from_json_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_round_trip() {
        for z in 0..6 {
            for x in 0..6 {
                let coords = HexCoordinates::from_offset(x, z);
                assert_eq!(coords.to_offset(), (x, z));
            }
        }
    }

    #[test]
    fn neighbors_are_symmetric() {
        let grid = HexGrid::new(5, 5, HexMetrics::default());
        for cell in grid.cells() {
            for dir in HexDirection::ALL {
                if let Some(n) = grid.neighbor(cell.index, dir) {
                    assert_eq!(grid.neighbor(n, dir.opposite()), Some(cell.index));
                    let expected = cell.center + grid.metrics().neighbor_offset(dir);
                    assert!(grid.center(n).distance(expected) < 1e-3);
                }
            }
        }
    }

    #[test]
    fn shared_corners_have_equal_vertex_keys() {
        let grid = HexGrid::new(4, 4, HexMetrics::default());
        let a = grid.offset_index(1, 1).unwrap();
        for dir in HexDirection::ALL {
            let Some(b) = grid.neighbor(a, dir) else {
                continue;
            };
            // corner(d) of A is corner(opposite(d).next()) of B
            let a_start = grid.corner(a, dir);
            let b_end = grid.corner(b, dir.opposite().next());
            assert!(a_start.distance(b_end) < 1e-3);
            assert_eq!(
                grid.corner_vertex(a, dir),
                grid.corner_vertex(b, dir.opposite().next())
            );
            assert_eq!(
                grid.corner_vertex(a, dir.next()),
                grid.corner_vertex(b, dir.opposite())
            );
        }
    }

    #[test]
    fn rivers_are_mirrored_across_edges() {
        let mut grid = HexGrid::new(3, 3, HexMetrics::default());
        let a = grid.offset_index(1, 1).unwrap();
        grid.set_river(a, HexDirection::E, RiverFlow::Clockwise).unwrap();
        let b = grid.neighbor(a, HexDirection::E).unwrap();
        assert_eq!(grid.river(b, HexDirection::W), Some(RiverFlow::Counterclockwise));
        assert_eq!(grid.river_edge_count(), 1);
        grid.remove_river(b, HexDirection::W);
        assert!(!grid.has_river(a, HexDirection::E));
    }

    #[test]
    fn river_on_grid_edge_is_rejected() {
        let mut grid = HexGrid::new(2, 2, HexMetrics::default());
        let corner = grid.offset_index(0, 0).unwrap();
        let err = grid
            .set_river(corner, HexDirection::W, RiverFlow::Clockwise)
            .unwrap_err();
        assert!(matches!(err, GridError::NoNeighbor { .. }));
    }

    #[test]
    fn cell_at_finds_containing_hex() {
        let grid = HexGrid::new(4, 4, HexMetrics::default());
        for cell in grid.cells() {
            assert_eq!(grid.cell_at(cell.center), Some(cell.index));
            let near_corner = cell.center + grid.metrics().corner(HexDirection::SE) * 0.9;
            assert_eq!(grid.cell_at(near_corner), Some(cell.index));
        }
        assert_eq!(grid.cell_at(Vec2::new(-100.0, -100.0)), None);
    }

    #[test]
    fn description_parses_and_builds() {
        let json = r#"{
            "width": 3,
            "height": 2,
            "rivers": [ { "x": 0, "z": 0, "direction": "E", "flow": "Clockwise" } ]
        }"#;
        let description = GridDescription::from_json_str(json).unwrap();
        let grid = HexGrid::from_description(&description, HexMetrics::default()).unwrap();
        assert!(grid.has_river(CellIndex(0), HexDirection::E));
        assert!(grid.has_river(CellIndex(1), HexDirection::W));
    }
}
