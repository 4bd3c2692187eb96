//! Planar geometry primitives shared by the contour store, builders and classifier.

use bevy::math::{Vec2, Vec3};

/// Tolerance for on-edge tests, in world units.
pub const GEOMETRY_EPSILON: f32 = 1e-4;

/// `true` when `b` lies counterclockwise of `a` around `center`.
#[inline]
pub fn is_counterclockwise(center: Vec2, a: Vec2, b: Vec2) -> bool {
    (a - center).perp_dot(b - center) > 0.0
}

#[inline]
fn signed_area2(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).perp_dot(c - a)
}

/// Inclusive point-in-triangle test; degenerate triangles contain nothing.
pub fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let area = signed_area2(a, b, c);
    if area.abs() <= GEOMETRY_EPSILON * GEOMETRY_EPSILON {
        return false;
    }
    let scale = (b - a).length().max((c - a).length()).max(1.0);
    let tolerance = GEOMETRY_EPSILON * scale;
    let d1 = signed_area2(a, b, p) * area.signum();
    let d2 = signed_area2(b, c, p) * area.signum();
    let d3 = signed_area2(c, a, p) * area.signum();
    d1 >= -tolerance && d2 >= -tolerance && d3 >= -tolerance
}

/// Barycentric coordinates of `p` relative to `(a, b, c)`.
pub fn barycentric(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> Option<Vec3> {
    let area = signed_area2(a, b, c);
    if area.abs() <= f32::EPSILON {
        return None;
    }
    let wa = signed_area2(p, b, c) / area;
    let wb = signed_area2(a, p, c) / area;
    let wc = 1.0 - wa - wb;
    Some(Vec3::new(wa, wb, wc))
}

/// Barycentric weights clamped to the triangle and renormalised to sum to one.
pub fn clamped_barycentric(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> Option<Vec3> {
    let raw = barycentric(p, a, b, c)?;
    let clamped = raw.max(Vec3::ZERO);
    let sum = clamped.x + clamped.y + clamped.z;
    if sum <= f32::EPSILON {
        return None;
    }
    Some(clamped / sum)
}

pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`.
pub fn distance_to_line(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len = ab.length();
    if len <= f32::EPSILON {
        return p.distance(a);
    }
    ab.perp_dot(p - a).abs() / len
}

/// Parameters `(t, u)` such that `p + t*r == q + u*s`, or `None` when parallel.
pub fn line_parameters(p: Vec2, r: Vec2, q: Vec2, s: Vec2) -> Option<(f32, f32)> {
    let denom = r.perp_dot(s);
    if denom.abs() <= 1e-9 * r.length().max(1.0) * s.length().max(1.0) {
        return None;
    }
    let qp = q - p;
    let t = qp.perp_dot(s) / denom;
    let u = qp.perp_dot(r) / denom;
    Some((t, u))
}

/// Intersection of segments `a-b` and `c-d`, endpoints included.
pub fn segment_intersection(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Option<Vec2> {
    let (t, u) = line_parameters(a, b - a, c, d - c)?;
    let tol_t = GEOMETRY_EPSILON / (b - a).length().max(GEOMETRY_EPSILON);
    let tol_u = GEOMETRY_EPSILON / (d - c).length().max(GEOMETRY_EPSILON);
    if t < -tol_t || t > 1.0 + tol_t || u < -tol_u || u > 1.0 + tol_u {
        return None;
    }
    Some(a + (b - a) * t.clamp(0.0, 1.0))
}

#[inline]
pub fn approx_eq(a: Vec2, b: Vec2) -> bool {
    a.distance_squared(b) <= GEOMETRY_EPSILON * GEOMETRY_EPSILON
}
