//! River section graph: one record per river-bearing edge.
//!
//! A section is stored from the point of view of its lower-index cell
//! ("cell one"). Its start is `corner(direction)` of cell one and its end is
//! `corner(direction.next())`, so "previous" and "next" name the
//! counterclockwise and clockwise ends of the edge around cell one.

use std::collections::HashMap;

use bevy::math::{Vec2, Vec3};

use crate::direction::{HexDirection, RiverFlow};
use crate::grid::{CellIndex, HexGrid, VertexKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(pub u32);

impl SectionId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Which way a river turns at a joint, relative to its flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bend {
    #[default]
    None,
    Left,
    Right,
}

/// Curvature of a section at its upstream and downstream joints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Curvature {
    pub upstream: Bend,
    pub downstream: Bend,
}

impl Curvature {
    /// Both joints turn the same way: the section sweeps around the outside of a curve.
    pub fn is_outside_of_curve(&self) -> bool {
        self.upstream != Bend::None && self.upstream == self.downstream
    }
}

#[derive(Debug, Clone)]
pub struct RiverSection {
    pub id: SectionId,
    pub cell_one: CellIndex,
    pub cell_two: CellIndex,
    pub direction: HexDirection,
    pub flow: RiverFlow,
    pub start: Vec3,
    pub end: Vec3,
    pub start_vertex: VertexKey,
    pub end_vertex: VertexKey,
    pub has_previous_endpoint: bool,
    pub has_next_endpoint: bool,
    curvature: Curvature,
}

impl RiverSection {
    #[inline]
    pub fn curvature(&self) -> Curvature {
        self.curvature
    }

    /// Where the water enters this section.
    pub fn upstream_point(&self) -> Vec3 {
        if self.flow.is_clockwise() {
            self.start
        } else {
            self.end
        }
    }

    /// Where the water leaves this section.
    pub fn downstream_point(&self) -> Vec3 {
        if self.flow.is_clockwise() {
            self.end
        } else {
            self.start
        }
    }

    pub fn upstream_vertex(&self) -> VertexKey {
        if self.flow.is_clockwise() {
            self.start_vertex
        } else {
            self.end_vertex
        }
    }

    pub fn downstream_vertex(&self) -> VertexKey {
        if self.flow.is_clockwise() {
            self.end_vertex
        } else {
            self.start_vertex
        }
    }

    pub fn touches(&self, vertex: VertexKey) -> bool {
        self.start_vertex == vertex || self.end_vertex == vertex
    }

    /// Vertex at the far end of the section from `vertex`.
    pub fn other_vertex(&self, vertex: VertexKey) -> VertexKey {
        if self.start_vertex == vertex {
            self.end_vertex
        } else {
            self.start_vertex
        }
    }

    /// `true` when no other river continues from the given end.
    pub fn is_endpoint_at(&self, vertex: VertexKey) -> bool {
        if vertex == self.start_vertex {
            self.has_previous_endpoint
        } else if vertex == self.end_vertex {
            self.has_next_endpoint
        } else {
            false
        }
    }

    pub fn flows_into(&self, vertex: VertexKey) -> bool {
        self.downstream_vertex() == vertex
    }

    /// Direction of travel in the plane, upstream to downstream.
    pub fn flow_vector(&self) -> Vec2 {
        (self.downstream_point() - self.upstream_point()).truncate()
    }

    pub fn joins(&self, a: CellIndex, b: CellIndex) -> bool {
        (self.cell_one == a && self.cell_two == b) || (self.cell_one == b && self.cell_two == a)
    }

    /// Flow as seen from `cell`, which must be one of the two adjacent cells.
    pub fn flow_for(&self, cell: CellIndex) -> RiverFlow {
        if cell == self.cell_one {
            self.flow
        } else {
            self.flow.mirrored()
        }
    }
}

/// All river sections of a grid plus lookup indices.
#[derive(Debug, Clone, Default)]
pub struct RiverSectionGraph {
    sections: Vec<RiverSection>,
    by_cells: HashMap<(CellIndex, CellIndex), SectionId>,
    by_vertex: HashMap<VertexKey, Vec<SectionId>>,
}

impl RiverSectionGraph {
    pub fn sections(&self) -> &[RiverSection] {
        &self.sections
    }

    #[inline]
    pub fn section(&self, id: SectionId) -> &RiverSection {
        &self.sections[id.as_usize()]
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section on the edge shared by `x` and `y`, in either order.
    pub fn between(&self, x: CellIndex, y: CellIndex) -> Option<SectionId> {
        let key = if x <= y { (x, y) } else { (y, x) };
        self.by_cells.get(&key).copied()
    }

    pub fn section_on_edge(
        &self,
        grid: &HexGrid,
        cell: CellIndex,
        direction: HexDirection,
    ) -> Option<SectionId> {
        let neighbor = grid.neighbor(cell, direction)?;
        self.between(cell, neighbor)
    }

    pub fn sections_at(&self, vertex: VertexKey) -> &[SectionId] {
        self.by_vertex
            .get(&vertex)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Sections are adjacent when they meet at a grid vertex. This covers
    /// consecutive edges around one cell as well as the outer edges of a
    /// three-way confluence.
    pub fn are_adjacent(&self, s: SectionId, t: SectionId) -> bool {
        if s == t {
            return false;
        }
        let a = self.section(s);
        let b = self.section(t);
        a.touches(b.start_vertex) || a.touches(b.end_vertex)
    }

    /// Other sections meeting `id` at `vertex`.
    pub fn neighbors_at(
        &self,
        id: SectionId,
        vertex: VertexKey,
    ) -> impl Iterator<Item = SectionId> + '_ {
        self.sections_at(vertex)
            .iter()
            .copied()
            .filter(move |other| *other != id)
    }

    /// Largest number of sections meeting at any single vertex.
    pub fn max_vertex_degree(&self) -> usize {
        self.by_vertex.values().map(Vec::len).max().unwrap_or(0)
    }

    pub(crate) fn set_curvature(&mut self, id: SectionId, curvature: Curvature) {
        self.sections[id.as_usize()].curvature = curvature;
    }
}

/// Scan every river-bearing edge once and build the section graph.
pub fn build_river_sections(grid: &HexGrid) -> RiverSectionGraph {
    let mut graph = RiverSectionGraph::default();

    for cell in grid.cells() {
        for direction in HexDirection::ALL {
            let Some(flow) = cell.river(direction) else {
                continue;
            };
            let Some(neighbor) = grid.neighbor(cell.index, direction) else {
                continue;
            };
            // recorded already from the neighbour's side
            if neighbor < cell.index {
                continue;
            }

            let has_previous_endpoint = !(cell.has_river(direction.previous())
                || grid.has_river(neighbor, direction.previous2()));
            let has_next_endpoint = !(cell.has_river(direction.next())
                || grid.has_river(neighbor, direction.next2()));

            let elevation = (cell.elevation + grid.cell(neighbor).elevation) * 0.5;
            let start = grid.corner(cell.index, direction).extend(elevation);
            let end = grid.second_corner(cell.index, direction).extend(elevation);

            let id = SectionId(graph.sections.len() as u32);
            let section = RiverSection {
                id,
                cell_one: cell.index,
                cell_two: neighbor,
                direction,
                flow,
                start,
                end,
                start_vertex: grid.corner_vertex(cell.index, direction),
                end_vertex: grid.corner_vertex(cell.index, direction.next()),
                has_previous_endpoint,
                has_next_endpoint,
                curvature: Curvature::default(),
            };

            graph.by_cells.insert((cell.index, neighbor), id);
            graph
                .by_vertex
                .entry(section.start_vertex)
                .or_default()
                .push(id);
            graph
                .by_vertex
                .entry(section.end_vertex)
                .or_default()
                .push(id);
            graph.sections.push(section);
        }
    }

    let endpoints = graph
        .sections
        .iter()
        .filter(|s| s.has_previous_endpoint || s.has_next_endpoint)
        .count();
    tracing::debug!(
        target: "hex_contour::rivers",
        sections = graph.sections.len(),
        endpoints,
        max_vertex_degree = graph.max_vertex_degree(),
        "river_sections.built"
    );

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::HexMetrics;

    fn grid() -> HexGrid {
        HexGrid::new(5, 5, HexMetrics::default())
    }

    #[test]
    fn lone_edge_is_endpoint_at_both_ends() {
        let mut grid = grid();
        let a = grid.offset_index(2, 2).unwrap();
        grid.set_river(a, HexDirection::E, RiverFlow::Clockwise).unwrap();
        let graph = build_river_sections(&grid);
        assert_eq!(graph.len(), 1);
        let section = &graph.sections()[0];
        assert_eq!(section.cell_one, a);
        assert!(section.has_previous_endpoint && section.has_next_endpoint);
        assert_eq!(section.start.truncate(), grid.corner(a, HexDirection::E));
        assert_eq!(section.end.truncate(), grid.second_corner(a, HexDirection::E));
    }

    #[test]
    fn edge_recorded_once_from_lower_index() {
        let mut grid = grid();
        let a = grid.offset_index(2, 2).unwrap();
        let w = grid.neighbor(a, HexDirection::W).unwrap();
        grid.set_river(a, HexDirection::W, RiverFlow::Clockwise).unwrap();
        let graph = build_river_sections(&grid);
        assert_eq!(graph.len(), 1);
        let section = &graph.sections()[0];
        assert_eq!(section.cell_one, w);
        assert_eq!(section.direction, HexDirection::E);
        assert_eq!(section.flow, RiverFlow::Counterclockwise);
        assert_eq!(graph.between(a, w), Some(section.id));
        assert_eq!(graph.between(w, a), Some(section.id));
    }

    #[test]
    fn consecutive_edges_clear_shared_endpoint() {
        let mut grid = grid();
        let a = grid.offset_index(2, 2).unwrap();
        grid.set_river(a, HexDirection::NE, RiverFlow::Clockwise).unwrap();
        grid.set_river(a, HexDirection::E, RiverFlow::Clockwise).unwrap();
        let graph = build_river_sections(&grid);
        let ne = graph.section_on_edge(&grid, a, HexDirection::NE).unwrap();
        let e = graph.section_on_edge(&grid, a, HexDirection::E).unwrap();
        assert!(graph.are_adjacent(ne, e));

        let ne_section = graph.section(ne);
        let e_section = graph.section(e);
        // both are stored from a, so ends are named around a
        assert!(ne_section.has_previous_endpoint && !ne_section.has_next_endpoint);
        assert!(!e_section.has_previous_endpoint && e_section.has_next_endpoint);
        assert_eq!(ne_section.end_vertex, e_section.start_vertex);
    }

    #[test]
    fn neighbor_edge_clears_endpoint() {
        let mut grid = grid();
        let a = grid.offset_index(2, 2).unwrap();
        let b = grid.neighbor(a, HexDirection::E).unwrap();
        grid.set_river(a, HexDirection::E, RiverFlow::Clockwise).unwrap();
        // b's edge touching the clockwise end of a's east edge
        grid.set_river(b, HexDirection::E.next2(), RiverFlow::Clockwise).unwrap();
        let graph = build_river_sections(&grid);
        let section = graph.section(graph.between(a, b).unwrap());
        assert!(!section.has_next_endpoint);
        assert!(section.has_previous_endpoint);
    }

    #[test]
    fn confluence_outer_edges_are_adjacent() {
        let mut grid = grid();
        let a = grid.offset_index(2, 2).unwrap();
        let b = grid.neighbor(a, HexDirection::E).unwrap();
        let n = grid.neighbor(a, HexDirection::SE).unwrap();
        grid.set_river(a, HexDirection::E, RiverFlow::Clockwise).unwrap();
        grid.set_river(a, HexDirection::SE, RiverFlow::Clockwise).unwrap();
        grid.set_river(b, HexDirection::SW, RiverFlow::Counterclockwise)
            .unwrap();
        let graph = build_river_sections(&grid);
        let ab = graph.between(a, b).unwrap();
        let an = graph.between(a, n).unwrap();
        let bn = graph.between(b, n).unwrap();
        assert!(graph.are_adjacent(ab, bn));
        assert!(graph.are_adjacent(an, bn));
        assert_eq!(graph.max_vertex_degree(), 3);
    }
}
