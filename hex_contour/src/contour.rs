//! Per-edge boundary polylines keyed by `(cell, direction)`.
//!
//! Every stored contour runs clockwise around its own cell, so the two
//! contours of a shared land edge are point-for-point reverses of each other.

use std::borrow::Cow;

use bevy::math::Vec2;
use thiserror::Error;

use crate::direction::HexDirection;
use crate::geometry::{closest_point_on_segment, is_counterclockwise, point_in_triangle};
use crate::grid::{CellIndex, HexGrid};
use crate::metrics::HexMetrics;

#[derive(Debug, Error, PartialEq)]
pub enum ContourError {
    #[error("contour for cell {cell} toward {direction} needs at least 2 points, got {found}")]
    TooFewPoints {
        cell: CellIndex,
        direction: HexDirection,
        found: usize,
    },
    #[error("cell {0} is not part of the contour store")]
    UnknownCell(CellIndex),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Vec2>,
}

impl Contour {
    /// `None` when fewer than two points are given.
    pub fn new(points: Vec<Vec2>) -> Option<Self> {
        (points.len() >= 2).then_some(Self { points })
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Vec2 {
        self.points[0]
    }

    pub fn last(&self) -> Vec2 {
        self.points[self.points.len() - 1]
    }

    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn reversed(&self) -> Contour {
        let mut points = self.points.clone();
        points.reverse();
        Contour { points }
    }

    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        let mut best = self.points[0];
        let mut best_distance = f32::INFINITY;
        for (a, b) in self.segments() {
            let candidate = closest_point_on_segment(point, a, b);
            let distance = candidate.distance_squared(point);
            if distance < best_distance {
                best_distance = distance;
                best = candidate;
            }
        }
        best
    }

    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.closest_point(point).distance(point)
    }
}

/// Contour cache for one grid. Unset edges fall back to the raw corner pair.
#[derive(Debug, Clone)]
pub struct ContourStore {
    metrics: HexMetrics,
    centers: Vec<Vec2>,
    contours: Vec<[Option<Contour>; 6]>,
}

impl ContourStore {
    pub fn new(grid: &HexGrid) -> Self {
        let centers: Vec<Vec2> = grid.cells().map(|cell| cell.center).collect();
        let contours = vec![Default::default(); centers.len()];
        Self {
            metrics: grid.metrics().clone(),
            centers,
            contours,
        }
    }

    fn check(&self, cell: CellIndex) -> Result<usize, ContourError> {
        let index = cell.as_usize();
        if index < self.centers.len() {
            Ok(index)
        } else {
            Err(ContourError::UnknownCell(cell))
        }
    }

    pub fn center(&self, cell: CellIndex) -> Result<Vec2, ContourError> {
        Ok(self.centers[self.check(cell)?])
    }

    pub fn default_contour(
        &self,
        cell: CellIndex,
        direction: HexDirection,
    ) -> Result<Contour, ContourError> {
        let center = self.center(cell)?;
        Ok(Contour {
            points: vec![
                center + self.metrics.corner(direction),
                center + self.metrics.second_corner(direction),
            ],
        })
    }

    /// Contour for the edge, inserting the default corner pair when unset.
    pub fn get(
        &mut self,
        cell: CellIndex,
        direction: HexDirection,
    ) -> Result<&Contour, ContourError> {
        let index = self.check(cell)?;
        if self.contours[index][direction.index()].is_none() {
            let default = self.default_contour(cell, direction)?;
            self.contours[index][direction.index()] = Some(default);
        }
        self.contours[index][direction.index()]
            .as_ref()
            .ok_or(ContourError::UnknownCell(cell))
    }

    /// Read-only lookup; unset edges yield the default corner pair.
    pub fn contour(
        &self,
        cell: CellIndex,
        direction: HexDirection,
    ) -> Result<Cow<'_, Contour>, ContourError> {
        let index = self.check(cell)?;
        match &self.contours[index][direction.index()] {
            Some(contour) => Ok(Cow::Borrowed(contour)),
            None => Ok(Cow::Owned(self.default_contour(cell, direction)?)),
        }
    }

    pub fn is_set(&self, cell: CellIndex, direction: HexDirection) -> bool {
        self.contours
            .get(cell.as_usize())
            .map(|slots| slots[direction.index()].is_some())
            .unwrap_or(false)
    }

    /// Store a contour, flipping it when it runs counterclockwise around the cell.
    pub fn set(
        &mut self,
        cell: CellIndex,
        direction: HexDirection,
        mut points: Vec<Vec2>,
    ) -> Result<(), ContourError> {
        let index = self.check(cell)?;
        if points.len() < 2 {
            return Err(ContourError::TooFewPoints {
                cell,
                direction,
                found: points.len(),
            });
        }
        let center = self.centers[index];
        if is_counterclockwise(center, points[0], points[points.len() - 1]) {
            points.reverse();
        }
        self.contours[index][direction.index()] = Some(Contour { points });
        Ok(())
    }

    /// Inside one of the triangles fanned from the cell centre over the contour.
    pub fn is_point_within_contour(
        &self,
        point: Vec2,
        cell: CellIndex,
        direction: HexDirection,
    ) -> Result<bool, ContourError> {
        let center = self.center(cell)?;
        let contour = self.contour(cell, direction)?;
        let hit = contour
            .segments()
            .any(|(a, b)| point_in_triangle(point, center, a, b));
        Ok(hit)
    }

    /// Reset every edge to its default.
    pub fn clear(&mut self) {
        for slots in &mut self.contours {
            *slots = Default::default();
        }
    }

    /// Every explicitly stored contour, in cell then direction order.
    pub fn iter(&self) -> impl Iterator<Item = (CellIndex, HexDirection, &Contour)> + '_ {
        self.contours.iter().enumerate().flat_map(|(i, slots)| {
            HexDirection::ALL.into_iter().filter_map(move |direction| {
                slots[direction.index()]
                    .as_ref()
                    .map(|contour| (CellIndex(i as u32), direction, contour))
            })
        })
    }

    pub fn len(&self) -> usize {
        self.contours
            .iter()
            .map(|slots| slots.iter().filter(|c| c.is_some()).count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Inside the band between the two contours of one edge.
///
/// `a` and `b` are the contours of the same edge as stored for the two cells,
/// so `a` starts where `b` ends. Points are paired from the matched ends
/// inward; when one contour is longer its extra span is fanned from the
/// shorter contour's terminal point.
pub fn is_point_between_contours(point: Vec2, a: &Contour, b: &Contour) -> bool {
    let a = a.points();
    let b: Vec<Vec2> = b.points().iter().rev().copied().collect();
    let shared = a.len().min(b.len());

    for i in 0..shared - 1 {
        if point_in_triangle(point, a[i], a[i + 1], b[i + 1])
            || point_in_triangle(point, a[i], b[i + 1], b[i])
        {
            return true;
        }
    }

    let (short, long) = if a.len() < b.len() { (a, &b[..]) } else { (&b[..], a) };
    let pivot = short[shared - 1];
    long[shared - 1..]
        .windows(2)
        .any(|w| point_in_triangle(point, pivot, w[0], w[1]))
}

pub fn closest_point_on_contour(point: Vec2, contour: &Contour) -> Vec2 {
    contour.closest_point(point)
}
