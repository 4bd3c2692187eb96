//! Bank contours for river-bearing edges.
//!
//! Each side of a river edge gets its own contour running parallel to the
//! edge at the river's half-width. Where the bank meets a dry edge of the same
//! cell it lands on that edge at a distance shared by every cell around the
//! vertex, which is what lets the dry contours close up exactly.

use std::collections::HashMap;

use bevy::math::Vec2;

use crate::config::RiverConfig;
use crate::contour::{ContourError, ContourStore};
use crate::direction::HexDirection;
use crate::grid::{CellIndex, HexGrid, VertexKey};
use crate::river_sections::{RiverSection, RiverSectionGraph, SectionId};
use crate::river_tracer::River;

/// Distance from a vertex to a point at perpendicular offset `h` from an edge
/// meeting it at 120°.
fn vertex_reach(half_width: f32) -> f32 {
    2.0 * half_width / 3f32.sqrt()
}

/// Per-section and per-vertex widths looked up while placing banks.
pub struct BankWidths {
    by_section: HashMap<SectionId, f32>,
    by_vertex: HashMap<VertexKey, f32>,
}

impl BankWidths {
    pub fn new(graph: &RiverSectionGraph, rivers: &[River], fallback: f32) -> Self {
        let mut by_section = HashMap::with_capacity(graph.len());
        for river in rivers {
            for id in river.sections() {
                by_section.insert(*id, river.half_width);
            }
        }
        let mut by_vertex: HashMap<VertexKey, f32> = HashMap::new();
        for section in graph.sections() {
            let width = by_section.get(&section.id).copied().unwrap_or(fallback);
            by_section.entry(section.id).or_insert(width);
            for vertex in [section.start_vertex, section.end_vertex] {
                let entry = by_vertex.entry(vertex).or_insert(0.0);
                *entry = entry.max(width);
            }
        }
        Self { by_section, by_vertex }
    }

    pub fn section(&self, id: SectionId) -> f32 {
        self.by_section.get(&id).copied().unwrap_or(0.0)
    }

    /// Widest river touching the vertex.
    pub fn vertex(&self, vertex: VertexKey) -> f32 {
        self.by_vertex.get(&vertex).copied().unwrap_or(0.0)
    }
}

/// How one end of a bank contour is placed.
#[derive(Debug, Clone, Copy, PartialEq)]
enum BankEnd {
    Tapered,
    Mitre,
    Land,
}

struct BankSide<'a> {
    grid: &'a HexGrid,
    cell: CellIndex,
    direction: HexDirection,
}

impl BankSide<'_> {
    fn center(&self) -> Vec2 {
        self.grid.center(self.cell)
    }

    fn first_corner(&self) -> Vec2 {
        self.grid.corner(self.cell, self.direction)
    }

    fn second_corner(&self) -> Vec2 {
        self.grid.second_corner(self.cell, self.direction)
    }

    /// Unit vector from the edge toward the cell centre.
    fn inward(&self) -> Vec2 {
        let mid = (self.first_corner() + self.second_corner()) * 0.5;
        (self.center() - mid).normalize_or_zero()
    }
}

fn classify_end(
    section: &RiverSection,
    vertex: VertexKey,
    has_adjacent_river: bool,
    rivers: &RiverConfig,
) -> BankEnd {
    if section.is_endpoint_at(vertex) {
        let tapered = if section.upstream_vertex() == vertex {
            rivers.taper_sources
        } else {
            rivers.taper_mouths
        };
        if tapered {
            return BankEnd::Tapered;
        }
    }
    if has_adjacent_river {
        BankEnd::Mitre
    } else {
        BankEnd::Land
    }
}

/// Position of one end of a bank.
///
/// `vertex` is the corner the bank ends at and `far_corner` the other end of
/// the cell's neighbouring edge at that corner.
fn end_point(
    kind: BankEnd,
    vertex: Vec2,
    center: Vec2,
    far_corner: Vec2,
    half_width: f32,
    vertex_width: f32,
) -> Vec2 {
    match kind {
        BankEnd::Tapered => vertex,
        BankEnd::Mitre => vertex + (center - vertex).normalize_or_zero() * vertex_reach(half_width),
        BankEnd::Land => {
            vertex + (far_corner - vertex).normalize_or_zero() * vertex_reach(vertex_width)
        }
    }
}

fn bank_points(
    side: &BankSide<'_>,
    section: &RiverSection,
    widths: &BankWidths,
    rivers: &RiverConfig,
) -> Vec<Vec2> {
    let grid = side.grid;
    let d = side.direction;
    let half_width = widths.section(section.id);
    let start_vertex = grid.corner_vertex(side.cell, d);
    let end_vertex = grid.corner_vertex(side.cell, d.next());

    let river_before = grid.has_river(side.cell, d.previous());
    let river_after = grid.has_river(side.cell, d.next());
    let start_kind = classify_end(section, start_vertex, river_before, rivers);
    let end_kind = classify_end(section, end_vertex, river_after, rivers);

    let v0 = side.first_corner();
    let v1 = side.second_corner();
    let first = end_point(
        start_kind,
        v0,
        side.center(),
        grid.corner(side.cell, d.previous()),
        half_width,
        widths.vertex(start_vertex),
    );
    let last = end_point(
        end_kind,
        v1,
        side.center(),
        grid.second_corner(side.cell, d.next()),
        half_width,
        widths.vertex(end_vertex),
    );

    let inward = side.inward();
    let samples = rivers.bank_samples;
    let mut points = Vec::with_capacity(samples + 2);
    points.push(first);
    for k in 1..=samples {
        let t = k as f32 / (samples + 1) as f32;
        // tapered ends narrow linearly over the half of the edge next to them
        let mut scale = 1.0f32;
        if start_kind == BankEnd::Tapered {
            scale = scale.min(2.0 * t);
        }
        if end_kind == BankEnd::Tapered {
            scale = scale.min(2.0 * (1.0 - t));
        }
        points.push(v0.lerp(v1, t) + inward * half_width * scale);
    }
    points.push(last);
    points
}

/// Write both bank contours of every section into `store`.
///
/// Returns the number of contours written.
pub fn build_river_contours(
    grid: &HexGrid,
    graph: &RiverSectionGraph,
    rivers: &[River],
    config: &RiverConfig,
    store: &mut ContourStore,
) -> Result<usize, ContourError> {
    let widths = BankWidths::new(graph, rivers, config.min_half_width);
    let mut written = 0usize;
    for section in graph.sections() {
        for (cell, direction) in [
            (section.cell_one, section.direction),
            (section.cell_two, section.direction.opposite()),
        ] {
            let side = BankSide { grid, cell, direction };
            let points = bank_points(&side, section, &widths, config);
            store.set(cell, direction, points)?;
            written += 1;
        }
    }
    tracing::debug!(
        target: "hex_contour::contours",
        banks = written,
        samples = config.bank_samples,
        "river_contours.built"
    );
    Ok(written)
}
