//! Hex topology utilities.
//!
//! Directions are listed clockwise starting at north-east. The edge of a cell
//! facing direction `d` runs from corner `d` to corner `d.next()`, so walking
//! the directions in order walks the cell boundary clockwise.

use std::fmt;

use serde::{Deserialize, Serialize};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HexDirection {
    NE = 0,
    E = 1,
    SE = 2,
    SW = 3,
    W = 4,
    NW = 5,
}

impl HexDirection {
    pub const ALL: [HexDirection; 6] = [
        HexDirection::NE,
        HexDirection::E,
        HexDirection::SE,
        HexDirection::SW,
        HexDirection::W,
        HexDirection::NW,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wraps any integer onto the six directions.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 6]
    }

    #[inline]
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    #[inline]
    pub fn previous(self) -> Self {
        Self::from_index(self.index() + 5)
    }

    #[inline]
    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    #[inline]
    pub fn next2(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    #[inline]
    pub fn previous2(self) -> Self {
        Self::from_index(self.index() + 4)
    }

    /// Angle of the edge midpoint, in radians, measured counterclockwise from +x.
    pub fn bearing(self) -> f32 {
        (60.0 - 60.0 * self.index() as f32).to_radians()
    }

    /// Direction whose sextant contains the given bearing.
    pub fn from_bearing(angle: f32) -> Self {
        let degrees = 90.0 - angle.to_degrees();
        let sextant = (degrees.rem_euclid(360.0) / 60.0).floor() as usize;
        Self::from_index(sextant)
    }
}

impl fmt::Display for HexDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HexDirection::NE => "NE",
            HexDirection::E => "E",
            HexDirection::SE => "SE",
            HexDirection::SW => "SW",
            HexDirection::W => "W",
            HexDirection::NW => "NW",
        };
        f.write_str(label)
    }
}

/// Direction of water along an edge, relative to the cell that owns the edge.
///
/// `Clockwise` means water runs from `corner(d)` toward `corner(d.next())`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiverFlow {
    Clockwise,
    Counterclockwise,
}

impl RiverFlow {
    /// Flow as seen from the cell on the other side of the edge.
    #[inline]
    pub fn mirrored(self) -> Self {
        match self {
            RiverFlow::Clockwise => RiverFlow::Counterclockwise,
            RiverFlow::Counterclockwise => RiverFlow::Clockwise,
        }
    }

    #[inline]
    pub fn is_clockwise(self) -> bool {
        matches!(self, RiverFlow::Clockwise)
    }
}
