//! Point classification: which cells own a point, and with what weights.
//!
//! A query names a candidate cell and one of its six sextants. The regions of
//! that sextant are tested in a fixed order: the cell's own fan, the
//! neighbour's fan across the edge, the river channel between them, then the
//! two corner triangles. A point outside all of them is not an error; the
//! caller moves on to another sextant.

use bevy::math::Vec2;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::ContourConfig;
use crate::contour::{is_point_between_contours, ContourError, ContourStore};
use crate::direction::HexDirection;
use crate::geometry::{clamped_barycentric, distance_to_line, point_in_triangle};
use crate::grid::{CellIndex, HexGrid};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PointOrientationData {
    pub on_grid: bool,
    pub center: Option<CellIndex>,
    pub left: Option<CellIndex>,
    pub right: Option<CellIndex>,
    pub next_right: Option<CellIndex>,
    pub center_weight: f32,
    pub left_weight: f32,
    pub right_weight: f32,
    pub next_right_weight: f32,
    /// Strength of the river texture at the point.
    pub river_alpha: f32,
    /// Share of the point that belongs to the river bed rather than a cell.
    pub river_height_weight: f32,
}

impl PointOrientationData {
    fn around(grid: &HexGrid, cell: CellIndex, direction: HexDirection) -> Self {
        Self {
            on_grid: true,
            center: Some(cell),
            left: grid.neighbor(cell, direction.previous()),
            right: grid.neighbor(cell, direction),
            next_right: grid.neighbor(cell, direction.next()),
            ..Default::default()
        }
    }

    pub fn weight_sum(&self) -> f32 {
        self.center_weight
            + self.left_weight
            + self.right_weight
            + self.next_right_weight
            + self.river_height_weight
    }

    /// Total weight assigned to `cell` across all slots.
    pub fn weight_of(&self, cell: CellIndex) -> f32 {
        [
            (self.center, self.center_weight),
            (self.left, self.left_weight),
            (self.right, self.right_weight),
            (self.next_right, self.next_right_weight),
        ]
        .into_iter()
        .filter(|(slot, _)| *slot == Some(cell))
        .map(|(_, weight)| weight)
        .sum()
    }

    fn add(&mut self, slot: Slot, weight: f32) {
        match slot {
            Slot::Center => self.center_weight += weight,
            Slot::Left => self.left_weight += weight,
            Slot::Right => self.right_weight += weight,
            Slot::NextRight => self.next_right_weight += weight,
        }
    }

    /// Weight on a slot without a cell belongs to the centre.
    fn fold_missing(mut self) -> Self {
        if self.left.is_none() {
            self.center_weight += std::mem::take(&mut self.left_weight);
        }
        if self.right.is_none() {
            self.center_weight += std::mem::take(&mut self.right_weight);
        }
        if self.next_right.is_none() {
            self.center_weight += std::mem::take(&mut self.next_right_weight);
        }
        self
    }
}

/// Which region of a sextant matched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Classification {
    NotFound,
    /// Entirely owned by one cell, possibly tinted by a nearby river.
    LandSingleCell(PointOrientationData),
    /// Blend margin between two dry neighbours.
    LandBlend(PointOrientationData),
    RiverChannel(PointOrientationData),
    /// Barycentric blend of three cells around a dry corner.
    CornerBlend(PointOrientationData),
    /// Corner where two or more river edges meet.
    RiverCornerBlend(PointOrientationData),
}

impl Classification {
    pub fn is_found(&self) -> bool {
        !matches!(self, Classification::NotFound)
    }

    pub fn data(&self) -> Option<&PointOrientationData> {
        match self {
            Classification::NotFound => None,
            Classification::LandSingleCell(data)
            | Classification::LandBlend(data)
            | Classification::RiverChannel(data)
            | Classification::CornerBlend(data)
            | Classification::RiverCornerBlend(data) => Some(data),
        }
    }

    pub fn into_parts(self) -> (PointOrientationData, bool) {
        match self.data() {
            Some(data) => (*data, true),
            None => (PointOrientationData::default(), false),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Center,
    Left,
    Right,
    NextRight,
}

#[derive(Debug, Clone, Copy)]
enum Corner {
    /// `corner(d)`, shared with the left neighbour.
    Previous,
    /// `corner(d.next())`, shared with the next-right neighbour.
    Next,
}

#[derive(Debug, Clone, Copy)]
struct CornerCell {
    slot: Slot,
    anchor: Vec2,
    joint: Vec2,
}

/// The three cells around one hex vertex, seen from a sextant.
#[derive(Debug, Clone, Copy)]
struct CornerSetup {
    /// Own cell, the neighbour across the edge, then the side neighbour.
    cells: [CornerCell; 3],
    vertex: Vec2,
    river_edges: usize,
}

impl CornerSetup {
    /// Area around the vertex left uncovered by fans and channels: the pool
    /// between three banks, or the open tip beyond an untapered river end.
    fn contains_hole_point(&self, point: Vec2, edge_has_river: bool) -> bool {
        let [own, across, side] = self.cells;
        point_in_triangle(point, own.joint, across.joint, side.joint)
            || (edge_has_river && point_in_triangle(point, own.joint, across.joint, self.vertex))
    }
}

/// Read-only view over a finished contour store.
#[derive(Clone, Copy)]
pub struct PointClassifier<'a> {
    grid: &'a HexGrid,
    contours: &'a ContourStore,
    config: &'a ContourConfig,
}

impl<'a> PointClassifier<'a> {
    pub fn new(grid: &'a HexGrid, contours: &'a ContourStore, config: &'a ContourConfig) -> Self {
        Self {
            grid,
            contours,
            config,
        }
    }

    fn solid_factor(&self) -> f32 {
        self.grid.metrics().solid_factor()
    }

    /// Contour joint pulled toward the cell centre by the solid factor.
    fn anchor(&self, cell: CellIndex, joint: Vec2) -> Vec2 {
        let center = self.grid.center(cell);
        center + (joint - center) * self.solid_factor()
    }

    /// Classify `point` against one sextant of `cell`.
    pub fn classify(
        &self,
        point: Vec2,
        cell: CellIndex,
        direction: HexDirection,
    ) -> Result<Classification, ContourError> {
        if self.grid.get(cell).is_none() {
            return Err(ContourError::UnknownCell(cell));
        }
        let neighbor = self.grid.neighbor(cell, direction);

        if self.contours.is_point_within_contour(point, cell, direction)? {
            return self.classify_in_fan(point, cell, direction);
        }
        if let Some(b) = neighbor {
            if self.contours.is_point_within_contour(point, b, direction.opposite())? {
                return self.classify_in_fan(point, b, direction.opposite());
            }
            if self.grid.has_river(cell, direction) {
                if let Some(channel) = self.classify_channel(point, cell, b, direction)? {
                    return Ok(channel);
                }
            }
        }
        for corner in [Corner::Previous, Corner::Next] {
            if let Some(found) = self.classify_corner(point, cell, direction, corner, false)? {
                return Ok(found);
            }
        }
        Ok(Classification::NotFound)
    }

    /// Weights for `point`, plus whether any region matched.
    pub fn classify_point(
        &self,
        point: Vec2,
        cell: CellIndex,
        direction: HexDirection,
    ) -> Result<(PointOrientationData, bool), ContourError> {
        Ok(self.classify(point, cell, direction)?.into_parts())
    }

    fn classify_in_fan(
        &self,
        point: Vec2,
        cell: CellIndex,
        direction: HexDirection,
    ) -> Result<Classification, ContourError> {
        if !self.grid.has_river(cell, direction) {
            return self.classify_land(point, cell, direction);
        }
        let contour = self.contours.contour(cell, direction)?;
        let bank_width = self.config.rivers.bank_width;
        let alpha = if bank_width > 0.0 {
            (1.0 - contour.distance_to(point) / bank_width).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mut data = PointOrientationData::around(self.grid, cell, direction);
        data.center_weight = 1.0;
        data.river_alpha = alpha;
        Ok(Classification::LandSingleCell(data))
    }

    fn classify_channel(
        &self,
        point: Vec2,
        cell: CellIndex,
        neighbor: CellIndex,
        direction: HexDirection,
    ) -> Result<Option<Classification>, ContourError> {
        let near = self.contours.contour(cell, direction)?;
        let far = self.contours.contour(neighbor, direction.opposite())?;
        if !is_point_between_contours(point, &near, &far) {
            return Ok(None);
        }
        let to_near = near.distance_to(point);
        let to_far = far.distance_to(point);
        let total = to_near + to_far;
        let t = if total > f32::EPSILON { to_near / total } else { 0.5 };

        let mut data = PointOrientationData::around(self.grid, cell, direction);
        if t <= 0.5 {
            data.center_weight = 1.0 - 2.0 * t;
            data.river_height_weight = 2.0 * t;
        } else {
            data.right_weight = 2.0 * t - 1.0;
            data.river_height_weight = 2.0 - 2.0 * t;
        }
        data.river_alpha = 1.0;
        Ok(Some(Classification::RiverChannel(data)))
    }

    /// Land beside land: solid core, edge blend, then the two corners.
    fn classify_land(
        &self,
        point: Vec2,
        cell: CellIndex,
        direction: HexDirection,
    ) -> Result<Classification, ContourError> {
        let center = self.grid.center(cell);
        let own = self.contours.contour(cell, direction)?;
        let own0 = self.anchor(cell, own.first());
        let own1 = self.anchor(cell, own.last());
        let mut data = PointOrientationData::around(self.grid, cell, direction);

        if point_in_triangle(point, center, own0, own1) {
            data.center_weight = 1.0;
            return Ok(Classification::LandSingleCell(data));
        }

        let (far0, far1) = match self.grid.neighbor(cell, direction) {
            Some(b) => {
                let across = self.contours.contour(b, direction.opposite())?;
                (self.anchor(b, across.last()), self.anchor(b, across.first()))
            }
            None => (own.first(), own.last()),
        };
        if point_in_triangle(point, own0, own1, far1)
            || point_in_triangle(point, own0, far1, far0)
        {
            let to_own = distance_to_line(point, own0, own1);
            let to_far = distance_to_line(point, far0, far1);
            let total = to_own + to_far;
            let toward_far = if total > f32::EPSILON { to_own / total } else { 0.5 };
            data.center_weight = 1.0 - toward_far;
            data.right_weight = toward_far;
            return Ok(Classification::LandBlend(data.fold_missing()));
        }

        for corner in [Corner::Previous, Corner::Next] {
            if let Some(found) = self.classify_corner(point, cell, direction, corner, true)? {
                return Ok(found);
            }
        }

        // slivers left between borrowed bank points
        data.center_weight = 1.0;
        Ok(Classification::LandSingleCell(data))
    }

    fn corner_cells(
        &self,
        cell: CellIndex,
        direction: HexDirection,
        corner: Corner,
    ) -> Result<CornerSetup, ContourError> {
        let grid = self.grid;
        let own = self.contours.contour(cell, direction)?;
        let right = grid.neighbor(cell, direction);

        let (own_joint, vertex, side_slot, side, side_edge, side_takes_first) = match corner {
            Corner::Previous => (
                own.first(),
                grid.corner(cell, direction),
                Slot::Left,
                grid.neighbor(cell, direction.previous()),
                direction.next2(),
                true,
            ),
            Corner::Next => (
                own.last(),
                grid.second_corner(cell, direction),
                Slot::NextRight,
                grid.neighbor(cell, direction.next()),
                direction.previous2(),
                false,
            ),
        };

        let right_cell = match right {
            Some(b) => {
                let across = self.contours.contour(b, direction.opposite())?;
                let joint = match corner {
                    Corner::Previous => across.last(),
                    Corner::Next => across.first(),
                };
                CornerCell {
                    slot: Slot::Right,
                    anchor: self.anchor(b, joint),
                    joint,
                }
            }
            None => CornerCell {
                slot: Slot::Right,
                anchor: vertex,
                joint: vertex,
            },
        };
        let side_cell = match side {
            Some(s) => {
                let facing = self.contours.contour(s, side_edge)?;
                let joint = if side_takes_first { facing.first() } else { facing.last() };
                CornerCell {
                    slot: side_slot,
                    anchor: self.anchor(s, joint),
                    joint,
                }
            }
            None => CornerCell {
                slot: side_slot,
                anchor: vertex,
                joint: vertex,
            },
        };
        let own_cell = CornerCell {
            slot: Slot::Center,
            anchor: self.anchor(cell, own_joint),
            joint: own_joint,
        };

        let (own_side_edge, across_edge) = match corner {
            Corner::Previous => (direction.previous(), direction.previous2()),
            Corner::Next => (direction.next(), direction.next2()),
        };
        let river_edges = [
            grid.has_river(cell, direction),
            grid.has_river(cell, own_side_edge),
            right.map_or(false, |b| grid.has_river(b, across_edge)),
        ]
        .into_iter()
        .filter(|r| *r)
        .count();

        Ok(CornerSetup {
            cells: [own_cell, right_cell, side_cell],
            vertex,
            river_edges,
        })
    }

    /// Blend weights around one corner of the sextant.
    ///
    /// Inside a dry fan the anchor triangle itself is the region; otherwise
    /// only the hole the fans and channels leave at the vertex qualifies.
    fn classify_corner(
        &self,
        point: Vec2,
        cell: CellIndex,
        direction: HexDirection,
        corner: Corner,
        within_fan: bool,
    ) -> Result<Option<Classification>, ContourError> {
        let setup = self.corner_cells(cell, direction, corner)?;
        let [a, b, c] = setup.cells;
        let matched = if within_fan {
            point_in_triangle(point, a.anchor, b.anchor, c.anchor)
        } else {
            setup.contains_hole_point(point, self.grid.has_river(cell, direction))
        };
        if !matched {
            return Ok(None);
        }
        let mut data = PointOrientationData::around(self.grid, cell, direction);

        if setup.river_edges < 2 {
            let Some(weights) = clamped_barycentric(point, a.anchor, b.anchor, c.anchor) else {
                return Ok(None);
            };
            data.add(a.slot, weights.x);
            data.add(b.slot, weights.y);
            data.add(c.slot, weights.z);
            return Ok(Some(Classification::CornerBlend(data.fold_missing())));
        }

        let midpoint = (a.joint + b.joint + c.joint) / 3.0;
        for (p, q) in [(a, b), (b, c), (c, a)] {
            if !point_in_triangle(point, p.anchor, q.anchor, midpoint) {
                continue;
            }
            let Some(weights) = clamped_barycentric(point, p.anchor, q.anchor, midpoint) else {
                continue;
            };
            data.add(p.slot, weights.x);
            data.add(q.slot, weights.y);
            data.river_height_weight = weights.z;
            data.river_alpha = weights.z;
            return Ok(Some(Classification::RiverCornerBlend(data.fold_missing())));
        }
        // pool points outside every anchor wedge are open water
        data.river_height_weight = 1.0;
        data.river_alpha = 1.0;
        Ok(Some(Classification::RiverCornerBlend(data)))
    }

    /// Sextants of `cell` ordered by how directly they face `point`.
    fn sextant_order(&self, cell: CellIndex, point: Vec2) -> [HexDirection; 6] {
        let offset = point - self.grid.center(cell);
        let metrics = self.grid.metrics();
        let primary = HexDirection::ALL
            .into_iter()
            .max_by(|a, b| {
                let da = offset.dot(metrics.neighbor_offset(*a));
                let db = offset.dot(metrics.neighbor_offset(*b));
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(HexDirection::NE);
        [
            primary,
            primary.next(),
            primary.previous(),
            primary.next2(),
            primary.previous2(),
            primary.opposite(),
        ]
    }

    /// Find the classification of `point` without a candidate cell.
    ///
    /// Tries the sextants of the cell under the point first, then those of its
    /// neighbours.
    pub fn locate(&self, point: Vec2) -> Classification {
        let Some(start) = self.grid.cell_at(point) else {
            return Classification::NotFound;
        };
        let neighbors = HexDirection::ALL
            .into_iter()
            .filter_map(|d| self.grid.neighbor(start, d));
        for cell in std::iter::once(start).chain(neighbors) {
            for direction in self.sextant_order(cell, point) {
                match self.classify(point, cell, direction) {
                    Ok(found) if found.is_found() => return found,
                    Ok(_) => {}
                    Err(err) => {
                        tracing::trace!(
                            target: "hex_contour::contours",
                            error = %err,
                            "classification.skipped"
                        );
                    }
                }
            }
        }
        Classification::NotFound
    }

    /// [`Self::locate`] for many points, sharded across the rayon pool.
    pub fn classify_points_par(&self, points: &[Vec2]) -> Vec<Classification> {
        points.par_iter().map(|point| self.locate(*point)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::RiverFlow;
    use crate::land_contours::build_land_contours;
    use crate::metrics::HexMetrics;
    use crate::rationalizer::rationalize_contours;
    use crate::river_contours::build_river_contours;
    use crate::river_sections::build_river_sections;
    use crate::river_tracer::trace_rivers;

    struct Fixture {
        grid: HexGrid,
        store: ContourStore,
        config: ContourConfig,
    }

    impl Fixture {
        fn new(grid: HexGrid) -> Self {
            let config = ContourConfig::default();
            let mut graph = build_river_sections(&grid);
            let rivers = trace_rivers(&mut graph, &config);
            let mut store = ContourStore::new(&grid);
            build_river_contours(&grid, &graph, &rivers, &config.rivers, &mut store).unwrap();
            build_land_contours(&grid, &mut store).unwrap();
            rationalize_contours(&grid, &graph, &rivers, &mut store).unwrap();
            Self { grid, store, config }
        }

        fn classifier(&self) -> PointClassifier<'_> {
            PointClassifier::new(&self.grid, &self.store, &self.config)
        }
    }

    fn assert_normalized(data: &PointOrientationData) {
        assert!((data.weight_sum() - 1.0).abs() < 1e-4, "weights sum to {}", data.weight_sum());
    }

    #[test]
    fn cell_centre_is_solid() {
        let fixture = Fixture::new(HexGrid::new(4, 4, HexMetrics::default()));
        let cell = fixture.grid.offset_index(1, 1).unwrap();
        let center = fixture.grid.center(cell);
        let found = fixture
            .classifier()
            .classify(center + Vec2::new(0.5, 0.5), cell, HexDirection::NE)
            .unwrap();
        let Classification::LandSingleCell(data) = found else {
            panic!("expected a single cell, got {found:?}");
        };
        assert_eq!(data.center_weight, 1.0);
        assert_normalized(&data);
    }

    #[test]
    fn shared_edge_midpoint_blends_evenly() {
        let fixture = Fixture::new(HexGrid::new(4, 4, HexMetrics::default()));
        let cell = fixture.grid.offset_index(1, 1).unwrap();
        let b = fixture.grid.neighbor(cell, HexDirection::E).unwrap();
        let mid = (fixture.grid.center(cell) + fixture.grid.center(b)) * 0.5;
        let found = fixture.classifier().classify(mid, cell, HexDirection::E).unwrap();
        let Classification::LandBlend(data) = found else {
            panic!("expected a land blend, got {found:?}");
        };
        assert!((data.center_weight - 0.5).abs() < 1e-4);
        assert!((data.weight_of(b) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn dry_corner_splits_three_ways() {
        let fixture = Fixture::new(HexGrid::new(4, 4, HexMetrics::default()));
        let cell = fixture.grid.offset_index(1, 1).unwrap();
        let vertex = fixture.grid.corner(cell, HexDirection::E);
        let found = fixture.classifier().classify(vertex, cell, HexDirection::E).unwrap();
        let Classification::CornerBlend(data) = found else {
            panic!("expected a corner blend, got {found:?}");
        };
        for weight in [data.center_weight, data.left_weight, data.right_weight] {
            assert!((weight - 1.0 / 3.0).abs() < 1e-3);
        }
        assert_normalized(&data);
    }

    #[test]
    fn river_edge_channel_and_bank() {
        let mut grid = HexGrid::new(5, 5, HexMetrics::default());
        let cell = grid.offset_index(2, 2).unwrap();
        grid.set_river(cell, HexDirection::E, RiverFlow::Clockwise).unwrap();
        let fixture = Fixture::new(grid);
        let classifier = fixture.classifier();
        let center = fixture.grid.center(cell);
        let to_edge = fixture.grid.metrics().neighbor_offset(HexDirection::E) * 0.5;

        let found = classifier.classify(center + to_edge, cell, HexDirection::E).unwrap();
        let Classification::RiverChannel(data) = found else {
            panic!("expected the channel, got {found:?}");
        };
        assert!((data.river_height_weight - 1.0).abs() < 1e-3);
        assert_eq!(data.river_alpha, 1.0);
        assert_normalized(&data);

        let half_width = fixture.config.river_half_width(1);
        let inner = to_edge.length();
        let near_bank = center + to_edge * ((inner - half_width - 0.5) / inner);
        let found = classifier.classify(near_bank, cell, HexDirection::E).unwrap();
        let Classification::LandSingleCell(data) = found else {
            panic!("expected the bank, got {found:?}");
        };
        assert!((data.river_alpha - 0.8).abs() < 1e-3);
        assert_normalized(&data);
    }

    #[test]
    fn confluence_pool_is_river() {
        let mut grid = HexGrid::new(5, 5, HexMetrics::default());
        let a = grid.offset_index(2, 2).unwrap();
        let b = grid.neighbor(a, HexDirection::E).unwrap();
        let n = grid.neighbor(a, HexDirection::SE).unwrap();
        grid.set_river(a, HexDirection::E, RiverFlow::Clockwise).unwrap();
        grid.set_river(a, HexDirection::SE, RiverFlow::Counterclockwise)
            .unwrap();
        grid.set_river(b, HexDirection::SW, RiverFlow::Counterclockwise)
            .unwrap();
        let fixture = Fixture::new(grid);
        let store = &fixture.store;
        let pool = (store.contour(a, HexDirection::E).unwrap().last()
            + store.contour(b, HexDirection::W).unwrap().first()
            + store.contour(n, HexDirection::NW).unwrap().last())
            / 3.0;
        let found = fixture.classifier().classify(pool, a, HexDirection::E).unwrap();
        let Classification::RiverCornerBlend(data) = found else {
            panic!("expected the confluence pool, got {found:?}");
        };
        assert!((data.river_height_weight - 1.0).abs() < 1e-3);
        assert_normalized(&data);
    }

    #[test]
    fn missing_neighbours_fold_into_centre() {
        let fixture = Fixture::new(HexGrid::new(3, 3, HexMetrics::default()));
        let cell = fixture.grid.offset_index(0, 1).unwrap();
        assert!(fixture.grid.neighbor(cell, HexDirection::W).is_none());
        let vertex = fixture.grid.corner(cell, HexDirection::W);
        let (data, found) = fixture
            .classifier()
            .classify_point(vertex, cell, HexDirection::W)
            .unwrap();
        assert!(found);
        assert_eq!(data.right, None);
        assert_eq!(data.right_weight, 0.0);
        assert_normalized(&data);
    }

    #[test]
    fn unknown_cell_is_rejected() {
        let fixture = Fixture::new(HexGrid::new(2, 2, HexMetrics::default()));
        let err = fixture
            .classifier()
            .classify(Vec2::ZERO, CellIndex(40), HexDirection::E)
            .unwrap_err();
        assert_eq!(err, ContourError::UnknownCell(CellIndex(40)));
    }

    #[test]
    fn parallel_matches_sequential() {
        let mut grid = HexGrid::new(5, 5, HexMetrics::default());
        let cell = grid.offset_index(2, 2).unwrap();
        for dir in [HexDirection::NE, HexDirection::E, HexDirection::SE] {
            grid.set_river(cell, dir, RiverFlow::Clockwise).unwrap();
        }
        let fixture = Fixture::new(grid);
        let classifier = fixture.classifier();
        let origin = fixture.grid.center(cell);
        let points: Vec<Vec2> = (0..64)
            .map(|i| origin + Vec2::new((i % 8) as f32 * 2.5 - 9.0, (i / 8) as f32 * 2.5 - 9.0))
            .collect();
        let sequential: Vec<Classification> =
            points.iter().map(|p| classifier.locate(*p)).collect();
        assert_eq!(classifier.classify_points_par(&points), sequential);
        for found in &sequential {
            assert!(found.is_found());
            assert_normalized(found.data().unwrap());
        }
    }
}
