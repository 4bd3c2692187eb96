use bevy::math::Vec2;

use crate::config::HexConfig;
use crate::direction::HexDirection;

/// Corner geometry of a single hex, relative to its centre.
///
/// Corner `i` starts the edge facing direction `i`. With the default layout
/// the hexes are pointy-top and corner 0 is the northern tip.
#[derive(Debug, Clone, PartialEq)]
pub struct HexMetrics {
    corners: [Vec2; 6],
    solid_factor: f32,
}

impl HexMetrics {
    pub fn new(outer_radius: f32, solid_factor: f32) -> Self {
        let mut corners = [Vec2::ZERO; 6];
        for (i, corner) in corners.iter_mut().enumerate() {
            let angle = (60.0 * i as f32).to_radians();
            *corner = Vec2::new(angle.sin(), angle.cos()) * outer_radius;
        }
        Self {
            corners,
            solid_factor: solid_factor.clamp(0.0, 1.0),
        }
    }

    pub fn from_config(config: &HexConfig) -> Self {
        Self::new(config.outer_radius, config.solid_factor)
    }

    /// Custom corner vectors, listed clockwise starting with the corner that opens `NE`.
    pub fn from_corners(corners: [Vec2; 6], solid_factor: f32) -> Self {
        Self {
            corners,
            solid_factor: solid_factor.clamp(0.0, 1.0),
        }
    }

    #[inline]
    pub fn corner(&self, direction: HexDirection) -> Vec2 {
        self.corners[direction.index()]
    }

    #[inline]
    pub fn second_corner(&self, direction: HexDirection) -> Vec2 {
        self.corners[direction.next().index()]
    }

    #[inline]
    pub fn solid_factor(&self) -> f32 {
        self.solid_factor
    }

    /// Offset from a cell centre to the centre of its neighbour in `direction`.
    #[inline]
    pub fn neighbor_offset(&self, direction: HexDirection) -> Vec2 {
        self.corner(direction) + self.second_corner(direction)
    }

    pub fn outer_radius(&self) -> f32 {
        self.corners[0].length()
    }

    pub fn inner_radius(&self) -> f32 {
        self.neighbor_offset(HexDirection::E).length() * 0.5
    }

    /// Centre of the cell at axial `(q, r)`, with `(0, 0)` at the origin.
    pub fn axial_to_position(&self, q: i32, r: i32) -> Vec2 {
        self.neighbor_offset(HexDirection::E) * q as f32
            + self.neighbor_offset(HexDirection::NE) * r as f32
    }

    /// Fractional axial coordinates of a plane position.
    pub fn position_to_axial(&self, position: Vec2) -> (f32, f32) {
        let e = self.neighbor_offset(HexDirection::E);
        let ne = self.neighbor_offset(HexDirection::NE);
        let det = e.perp_dot(ne);
        if det.abs() <= f32::EPSILON {
            return (0.0, 0.0);
        }
        let q = position.perp_dot(ne) / det;
        let r = e.perp_dot(position) / det;
        (q, r)
    }
}

impl Default for HexMetrics {
    fn default() -> Self {
        Self::from_config(&HexConfig::default())
    }
}
