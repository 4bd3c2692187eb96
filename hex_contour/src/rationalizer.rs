//! Repair the meeting point of two bank contours at a river confluence.
//!
//! Banks of different rivers are built independently, so at a corner where
//! two of a cell's river edges meet they can overlap or stop short of each
//! other. After repair the two contours share exactly one point.

use std::collections::HashMap;

use bevy::math::Vec2;

use crate::contour::{ContourError, ContourStore};
use crate::direction::HexDirection;
use crate::geometry::{approx_eq, line_parameters, segment_intersection};
use crate::grid::HexGrid;
use crate::river_sections::{RiverSectionGraph, SectionId};
use crate::river_tracer::{River, RiverId};

/// How a pair of contours was joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repair {
    /// Terminal segments crossed; both were cut at the crossing.
    Crossing,
    /// The terminal lines were extended or trimmed to their intersection.
    Extended,
    /// Parallel terminal lines; both ends moved to their midpoint.
    Midpoint,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RationalizeSummary {
    pub corners: usize,
    pub crossings: usize,
    pub extensions: usize,
    pub midpoints: usize,
    pub skipped_same_river: usize,
}

impl RationalizeSummary {
    fn record(&mut self, repair: Repair) {
        self.corners += 1;
        match repair {
            Repair::Crossing => self.crossings += 1,
            Repair::Extended => self.extensions += 1,
            Repair::Midpoint => self.midpoints += 1,
        }
    }
}

fn push_distinct(points: &mut Vec<Vec2>, point: Vec2) {
    if points.last().map_or(true, |last| !approx_eq(*last, point)) {
        points.push(point);
    }
}

/// Crossing nearest the shared corner between the tail of `first` and the head of `second`.
///
/// Only the half of each contour next to the corner is searched. Returns the
/// segment indices and the crossing point.
fn terminal_crossing(first: &[Vec2], second: &[Vec2]) -> Option<(usize, usize, Vec2)> {
    let first_segments = first.len() - 1;
    let second_segments = second.len() - 1;
    let first_from = first_segments / 2;
    let second_until = second_segments - second_segments / 2;
    for i in (first_from..first_segments).rev() {
        for j in 0..second_until {
            let hit = segment_intersection(first[i], first[i + 1], second[j], second[j + 1]);
            if let Some(point) = hit {
                return Some((i, j, point));
            }
        }
    }
    None
}

/// Join the end of `first` to the start of `second`.
///
/// `corner` is the hex vertex the two contours meet at; an extrapolated
/// intersection further than `max_reach` from it is rejected in favour of the
/// midpoint.
pub fn rationalize_pair(
    first: &[Vec2],
    second: &[Vec2],
    corner: Vec2,
    max_reach: f32,
) -> (Vec<Vec2>, Vec<Vec2>, Repair) {
    if let Some((i, j, point)) = terminal_crossing(first, second) {
        let mut head: Vec<Vec2> = first[..=i].to_vec();
        push_distinct(&mut head, point);
        let mut tail = vec![point];
        for p in &second[j + 1..] {
            push_distinct(&mut tail, *p);
        }
        if head.len() >= 2 && tail.len() >= 2 {
            return (head, tail, Repair::Crossing);
        }
    }

    let end = first[first.len() - 1];
    let before_end = first[first.len() - 2];
    let start = second[0];
    let after_start = second[1];
    let meeting = line_parameters(end, end - before_end, start, after_start - start)
        .map(|(t, _)| end + (end - before_end) * t)
        .filter(|p| p.distance(corner) <= max_reach);

    if let Some(point) = meeting {
        let mut head = first.to_vec();
        let mut tail = second.to_vec();
        let last = head.len() - 1;
        // the new end lies behind the old one when the contour overshot
        if (point - before_end).dot(end - before_end) < (end - before_end).length_squared() {
            head[last] = point;
        } else {
            push_distinct(&mut head, point);
        }
        if (point - after_start).dot(start - after_start) < (start - after_start).length_squared() {
            tail[0] = point;
        } else if !approx_eq(tail[0], point) {
            tail.insert(0, point);
        }
        return (head, tail, Repair::Extended);
    }

    let midpoint = (end + start) * 0.5;
    let mut head = first.to_vec();
    let mut tail = second.to_vec();
    let last = head.len() - 1;
    head[last] = midpoint;
    tail[0] = midpoint;
    (head, tail, Repair::Midpoint)
}

/// Which traced river each section belongs to.
pub fn section_owners(rivers: &[River]) -> HashMap<SectionId, RiverId> {
    rivers
        .iter()
        .flat_map(|river| river.sections().iter().map(move |id| (*id, river.id)))
        .collect()
}

fn same_river_neighbors(
    rivers: &[River],
    owners: &HashMap<SectionId, RiverId>,
    a: SectionId,
    b: SectionId,
) -> bool {
    match (owners.get(&a), owners.get(&b)) {
        (Some(ra), Some(rb)) if ra == rb => rivers
            .get(ra.0 as usize)
            .map(|river| river.are_consecutive(a, b))
            .unwrap_or(false),
        _ => false,
    }
}

/// Repair every corner where two river edges of one cell meet without being
/// consecutive sections of the same river.
pub fn rationalize_contours(
    grid: &HexGrid,
    graph: &RiverSectionGraph,
    rivers: &[River],
    store: &mut ContourStore,
) -> Result<RationalizeSummary, ContourError> {
    let owners = section_owners(rivers);
    let max_reach = grid.metrics().outer_radius();
    let mut summary = RationalizeSummary::default();

    for cell in grid.cells() {
        for d in HexDirection::ALL {
            let previous = d.previous();
            if !(cell.has_river(previous) && cell.has_river(d)) {
                continue;
            }
            let (Some(s_prev), Some(s_here)) = (
                graph.section_on_edge(grid, cell.index, previous),
                graph.section_on_edge(grid, cell.index, d),
            ) else {
                continue;
            };
            if same_river_neighbors(rivers, &owners, s_prev, s_here) {
                summary.skipped_same_river += 1;
                continue;
            }

            let first = store.contour(cell.index, previous)?.into_owned();
            let second = store.contour(cell.index, d)?.into_owned();
            let corner = grid.corner(cell.index, d);
            let (head, tail, repair) =
                rationalize_pair(first.points(), second.points(), corner, max_reach);
            tracing::trace!(
                target: "hex_contour::contours",
                cell = cell.index.0,
                corner = %d,
                ?repair,
                "rationalizer.repaired"
            );
            store.set(cell.index, previous, head)?;
            store.set(cell.index, d, tail)?;
            summary.record(repair);
        }
    }

    tracing::debug!(
        target: "hex_contour::contours",
        corners = summary.corners,
        crossings = summary.crossings,
        extensions = summary.extensions,
        midpoints = summary.midpoints,
        skipped = summary.skipped_same_river,
        "rationalizer.completed"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    #[test]
    fn crossing_terminal_segments_are_cut() {
        let first = vec![v(0.0, 0.0), v(2.0, 0.0), v(4.0, 1.0)];
        let second = vec![v(3.0, 2.0), v(3.0, -2.0), v(3.0, -6.0)];
        let (head, tail, repair) = rationalize_pair(&first, &second, v(3.0, 0.0), 10.0);
        assert_eq!(repair, Repair::Crossing);
        let p = v(3.0, 0.5);
        assert!(approx_eq(*head.last().unwrap(), p));
        assert!(approx_eq(tail[0], p));
        assert_eq!(&head[..2], &first[..2]);
        assert_eq!(&tail[1..], &second[1..]);
    }

    #[test]
    fn short_contours_are_extended_to_meet() {
        let first = vec![v(0.0, 0.0), v(2.0, 0.0)];
        let second = vec![v(4.0, 2.0), v(4.0, 6.0)];
        let (head, tail, repair) = rationalize_pair(&first, &second, v(4.0, 0.0), 10.0);
        assert_eq!(repair, Repair::Extended);
        assert_eq!(head, vec![v(0.0, 0.0), v(2.0, 0.0), v(4.0, 0.0)]);
        assert_eq!(tail, vec![v(4.0, 0.0), v(4.0, 2.0), v(4.0, 6.0)]);
    }

    #[test]
    fn overshooting_contour_is_trimmed() {
        // first runs past the second's line, second falls short of the first's
        let first = vec![v(0.0, 0.0), v(6.0, 0.0)];
        let second = vec![v(4.0, 3.0), v(4.0, 8.0)];
        let (head, tail, repair) = rationalize_pair(&first, &second, v(4.0, 0.0), 10.0);
        assert_eq!(repair, Repair::Extended);
        assert_eq!(head.len(), 2);
        assert!(approx_eq(head[1], v(4.0, 0.0)));
        assert!(approx_eq(tail[0], v(4.0, 0.0)));
        assert_eq!(tail.len(), 3);
    }

    #[test]
    fn parallel_ends_meet_at_midpoint() {
        let first = vec![v(0.0, 0.0), v(2.0, 0.0)];
        let second = vec![v(3.0, 1.0), v(5.0, 1.0)];
        let (head, tail, repair) = rationalize_pair(&first, &second, v(2.5, 0.5), 10.0);
        assert_eq!(repair, Repair::Midpoint);
        assert_eq!(*head.last().unwrap(), v(2.5, 0.5));
        assert_eq!(tail[0], v(2.5, 0.5));
    }

    #[test]
    fn distant_intersection_falls_back_to_midpoint() {
        let first = vec![v(0.0, 0.0), v(2.0, 0.0)];
        let second = vec![v(3.0, 1.0), v(5.0, 1.01)];
        let (_, _, repair) = rationalize_pair(&first, &second, v(2.5, 0.5), 10.0);
        assert_eq!(repair, Repair::Midpoint);
    }
}
