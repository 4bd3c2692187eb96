//! Assemble ordered rivers (source to mouth) from the section graph.

use std::collections::{BTreeSet, HashMap};

use bevy::math::{Vec2, Vec3};
use thiserror::Error;

use crate::config::{ContourConfig, SplineConfig};
use crate::grid::VertexKey;
use crate::river_sections::{Bend, Curvature, RiverSection, RiverSectionGraph, SectionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RiverId(pub u32);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TraceError {
    #[error("section {0:?} does not exist")]
    UnknownSection(SectionId),
    #[error("section {0:?} already belongs to a river")]
    AlreadyAssigned(SectionId),
}

#[derive(Debug, Clone)]
pub struct River {
    pub id: RiverId,
    sections: Vec<SectionId>,
    pub half_width: f32,
    /// The river runs in a loop and has neither source nor mouth.
    pub closed: bool,
}

impl River {
    /// Sections ordered from source to mouth.
    pub fn sections(&self) -> &[SectionId] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn position_of(&self, section: SectionId) -> Option<usize> {
        self.sections.iter().position(|s| *s == section)
    }

    pub fn source(&self) -> Option<SectionId> {
        self.sections.first().copied()
    }

    pub fn mouth(&self) -> Option<SectionId> {
        self.sections.last().copied()
    }

    /// `true` when `a` and `b` follow one another along this river.
    pub fn are_consecutive(&self, a: SectionId, b: SectionId) -> bool {
        let (Some(i), Some(j)) = (self.position_of(a), self.position_of(b)) else {
            return false;
        };
        let gap = i.abs_diff(j);
        gap == 1 || (self.closed && gap == self.sections.len() - 1)
    }

    /// Centre line from source to mouth.
    pub fn centerline(&self, graph: &RiverSectionGraph) -> Vec<Vec3> {
        let mut points: Vec<Vec3> = self
            .sections
            .iter()
            .map(|id| graph.section(*id).upstream_point())
            .collect();
        if let Some(last) = self.sections.last() {
            points.push(graph.section(*last).downstream_point());
        }
        points
    }

    /// Cubic Bézier control points per section, `[p0, p1, p2, p3]` in flow order.
    ///
    /// Sections on the outside of a curve get the wider tangent scale so the
    /// rendered spline does not pinch.
    pub fn control_points(
        &self,
        graph: &RiverSectionGraph,
        spline: &SplineConfig,
    ) -> Vec<[Vec2; 4]> {
        let count = self.sections.len();
        let mut controls = Vec::with_capacity(count);
        for (i, id) in self.sections.iter().enumerate() {
            let section = graph.section(*id);
            let p0 = section.upstream_point().truncate();
            let p3 = section.downstream_point().truncate();
            let own = section.flow_vector().normalize_or_zero();

            let previous = if i > 0 {
                Some(self.sections[i - 1])
            } else if self.closed {
                self.sections.last().copied()
            } else {
                None
            };
            let next = if i + 1 < count {
                Some(self.sections[i + 1])
            } else if self.closed {
                self.sections.first().copied()
            } else {
                None
            };

            let blend = |id: SectionId| {
                (graph.section(id).flow_vector().normalize_or_zero() + own).normalize_or_zero()
            };
            let t0 = previous.map(blend).unwrap_or(own);
            let t3 = next.map(blend).unwrap_or(own);

            let scale = if section.curvature().is_outside_of_curve() {
                spline.outside_curve_scale
            } else {
                spline.tangent_scale
            };
            let reach = p0.distance(p3) * scale;
            controls.push([p0, p0 + t0 * reach, p3 - t3 * reach, p3]);
        }
        controls
    }
}

/// Walks the section graph, handing out every section to exactly one river.
pub struct RiverTracer<'a> {
    graph: &'a RiverSectionGraph,
    unassigned: BTreeSet<SectionId>,
}

impl<'a> RiverTracer<'a> {
    pub fn new(graph: &'a RiverSectionGraph) -> Self {
        Self {
            graph,
            unassigned: graph.sections().iter().map(|s| s.id).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.unassigned.len()
    }

    pub fn is_assigned(&self, id: SectionId) -> bool {
        !self.unassigned.contains(&id)
    }

    /// Grow a river outward from `seed`, claiming every section it reaches.
    ///
    /// The returned sections are ordered from source to mouth.
    pub fn build_river_from_section(
        &mut self,
        seed: SectionId,
    ) -> Result<Vec<SectionId>, TraceError> {
        if seed.as_usize() >= self.graph.len() {
            return Err(TraceError::UnknownSection(seed));
        }
        if !self.unassigned.remove(&seed) {
            return Err(TraceError::AlreadyAssigned(seed));
        }

        let graph = self.graph;
        let section = graph.section(seed);
        if section.has_previous_endpoint && section.has_next_endpoint {
            return Ok(vec![seed]);
        }

        let forward = self.walk(seed, section.end_vertex);
        let backward = self.walk(seed, section.start_vertex);

        let mut ordered: Vec<SectionId> = backward.into_iter().rev().collect();
        ordered.push(seed);
        ordered.extend(forward);

        if self.runs_against_flow(&ordered) {
            ordered.reverse();
        }
        Ok(ordered)
    }

    fn walk(&mut self, from: SectionId, vertex: VertexKey) -> Vec<SectionId> {
        let mut chain = Vec::new();
        let mut current = from;
        let mut vertex = vertex;
        loop {
            if self.graph.section(current).is_endpoint_at(vertex) {
                break;
            }
            let Some(next) = self.pick_congruous(current, vertex) else {
                tracing::trace!(
                    target: "hex_contour::rivers",
                    section = current.0,
                    "river_trace.stopped_without_candidate"
                );
                break;
            };
            self.unassigned.remove(&next);
            chain.push(next);
            vertex = self.graph.section(next).other_vertex(vertex);
            current = next;
        }
        chain
    }

    /// Among unassigned sections meeting `current` at `vertex`, the one that
    /// carries the same water onward (or brings it in, when walking upstream).
    fn pick_congruous(&self, current: SectionId, vertex: VertexKey) -> Option<SectionId> {
        let section = self.graph.section(current);
        let inflow = section.flows_into(vertex);
        let heading = section.flow_vector();

        self.graph
            .neighbors_at(current, vertex)
            .filter(|candidate| self.unassigned.contains(candidate))
            .filter(|candidate| is_congruous(inflow, self.graph.section(*candidate), vertex))
            .map(|candidate| {
                let turn = heading.angle_between(self.graph.section(candidate).flow_vector()).abs();
                (candidate, turn)
            })
            .min_by(|(a_id, a_turn), (b_id, b_turn)| {
                a_turn
                    .partial_cmp(b_turn)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a_id.cmp(b_id))
            })
            .map(|(candidate, _)| candidate)
    }

    fn runs_against_flow(&self, ordered: &[SectionId]) -> bool {
        let [first, second, ..] = ordered else {
            return false;
        };
        let first = self.graph.section(*first);
        let second = self.graph.section(*second);
        let shared = if second.touches(first.end_vertex) {
            first.end_vertex
        } else {
            first.start_vertex
        };
        !first.flows_into(shared)
    }
}

/// Flow continues through `vertex` when exactly one of the two sections drains into it.
fn is_congruous(current_flows_in: bool, candidate: &RiverSection, vertex: VertexKey) -> bool {
    candidate.flows_into(vertex) != current_flows_in
}

fn bend_between(upstream: &RiverSection, downstream: &RiverSection) -> Bend {
    let turn = upstream.flow_vector().perp_dot(downstream.flow_vector());
    if turn.abs() <= f32::EPSILON {
        Bend::None
    } else if turn > 0.0 {
        Bend::Left
    } else {
        Bend::Right
    }
}

fn is_closed_loop(graph: &RiverSectionGraph, ordered: &[SectionId]) -> bool {
    if ordered.len() < 3 {
        return false;
    }
    let first = graph.section(ordered[0]);
    let last = graph.section(ordered[ordered.len() - 1]);
    last.downstream_vertex() == first.upstream_vertex()
}

/// Trace every river in the graph and record section curvature.
pub fn trace_rivers(graph: &mut RiverSectionGraph, config: &ContourConfig) -> Vec<River> {
    let assembled: Vec<Vec<SectionId>> = {
        let mut tracer = RiverTracer::new(graph);
        let mut assembled = Vec::new();
        for seed in graph.sections().iter().map(|s| s.id) {
            if tracer.is_assigned(seed) {
                continue;
            }
            match tracer.build_river_from_section(seed) {
                Ok(sections) => assembled.push(sections),
                Err(err) => {
                    tracing::debug!(
                        target: "hex_contour::rivers",
                        error = %err,
                        "river_trace.seed_rejected"
                    );
                }
            }
        }
        assembled
    };

    let mut curvature: HashMap<SectionId, Curvature> = HashMap::new();
    let mut rivers = Vec::with_capacity(assembled.len());
    let mut closed_loops = 0usize;

    for (i, sections) in assembled.into_iter().enumerate() {
        let closed = is_closed_loop(graph, &sections);
        if closed {
            closed_loops += 1;
        }
        let count = sections.len();
        for (pos, id) in sections.iter().enumerate() {
            let section = graph.section(*id);
            let upstream = if pos > 0 {
                bend_between(graph.section(sections[pos - 1]), section)
            } else if closed {
                bend_between(graph.section(sections[count - 1]), section)
            } else {
                Bend::None
            };
            let downstream = if pos + 1 < count {
                bend_between(section, graph.section(sections[pos + 1]))
            } else if closed {
                bend_between(section, graph.section(sections[0]))
            } else {
                Bend::None
            };
            curvature.insert(*id, Curvature { upstream, downstream });
        }
        rivers.push(River {
            id: RiverId(i as u32),
            half_width: config.river_half_width(count),
            sections,
            closed,
        });
    }

    for (id, value) in curvature {
        graph.set_curvature(id, value);
    }

    let total_sections: usize = rivers.iter().map(River::len).sum();
    tracing::info!(
        target: "hex_contour::rivers",
        rivers = rivers.len(),
        sections = total_sections,
        closed_loops,
        "rivers.traced"
    );

    rivers
}
