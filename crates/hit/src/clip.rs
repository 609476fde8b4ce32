//! Clipping edges against the bounding quad in texture space.
//!
//! Two directions are needed. Front-facing triangles clip each quad edge
//! against the triangle, which captures where the content border crosses
//! the visible surface. Silhouette and boundary edges clip themselves
//! against the quad polygon.

use glam::{DVec2, DVec3};
use meshpick_core::Triangle;

use crate::containment::{point_in_polygon, point_in_triangle};
use crate::edge::HitTestEdge;

/// Where a ray meets an infinite line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineCrossing {
    /// Ray parameter of the crossing (any sign).
    At(f64),
    /// Parallel and disjoint.
    Parallel,
    /// Collinear.
    Coincident,
}

/// Intersect the ray `origin + t * dir` with the line through `p1` and `p2`.
///
/// A vertical line is solved directly on x; otherwise a zero denominator
/// means the ray is parallel, and the intercepts decide whether it is
/// collinear. All comparisons are exact.
pub fn intersect_ray_line(origin: DVec2, dir: DVec2, p1: DVec2, p2: DVec2) -> LineCrossing {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    if dx == 0.0 {
        if dir.x == 0.0 {
            return if origin.x == p1.x {
                LineCrossing::Coincident
            } else {
                LineCrossing::Parallel
            };
        }
        return LineCrossing::At((p2.x - origin.x) / dir.x);
    }

    let slope = dy / dx;
    let numerator = (origin.x - p1.x) * slope - origin.y + p1.y;
    let denominator = dir.y - dir.x * slope;
    if denominator == 0.0 {
        let ray_intercept = origin.y - origin.x * slope;
        let line_intercept = p1.y - p1.x * slope;
        return if ray_intercept == line_intercept {
            LineCrossing::Coincident
        } else {
            LineCrossing::Parallel
        };
    }
    LineCrossing::At(numerator / denominator)
}

/// Inclusive bounding-box overlap of segments `a1a2` and `b1b2`.
pub fn boxes_overlap(a1: DVec2, a2: DVec2, b1: DVec2, b2: DVec2) -> bool {
    a1.x.max(a2.x) >= b1.x.min(b2.x)
        && a1.x.min(a2.x) <= b1.x.max(b2.x)
        && a1.y.max(a2.y) >= b1.y.min(b2.y)
        && a1.y.min(a2.y) <= b1.y.max(b2.y)
}

/// Overlap of collinear segments: the quad edge `q1q2` and a mesh edge given
/// as `(uv, position)` pairs.
///
/// Both are measured along u when the quad edge spans more u than v, and
/// along v otherwise; positions are interpolated linearly on that axis.
/// Returns `None` for an empty overlap or a mesh edge with no extent on the
/// chosen axis.
pub fn coincident_overlap(
    q1: DVec2,
    q2: DVec2,
    t1: (DVec2, DVec3),
    t2: (DVec2, DVec3),
) -> Option<HitTestEdge> {
    let along_u = (q1.x - q2.x).abs() > (q1.y - q2.y).abs();
    let coord = |v: DVec2| if along_u { v.x } else { v.y };

    let (lo, hi) = if coord(q1) <= coord(q2) { (q1, q2) } else { (q2, q1) };
    let (a, b) = if coord(t1.0) <= coord(t2.0) { (t1, t2) } else { (t2, t1) };
    let span = coord(b.0) - coord(a.0);
    if span == 0.0 {
        return None;
    }
    let at = |v: DVec2| a.1 + (coord(v) - coord(a.0)) / span * (b.1 - a.1);

    let (uv_start, p_start) = if coord(lo) < coord(a.0) { a } else { (lo, at(lo)) };
    let (uv_end, p_end) = if coord(hi) > coord(b.0) { b } else { (hi, at(hi)) };
    if coord(uv_start) > coord(uv_end) {
        return None;
    }
    Some(HitTestEdge::new(p_start, p_end, uv_start, uv_end))
}

/// A crossing accepted when it lies strictly within quad-edge length of both
/// quad-edge endpoints.
fn within_quad_edge(point: DVec2, q1: DVec2, q2: DVec2) -> bool {
    let length = (q1 - q2).length();
    (point - q1).length() < length && (point - q2).length() < length
}

/// Clip each edge of `quad` against a front-facing triangle and push the
/// visible pieces.
pub fn clip_quad_against_triangle(tri: &Triangle, quad: &[DVec2; 4], out: &mut Vec<HitTestEdge>) {
    let mut crossings: Vec<(DVec3, DVec2)> = Vec::with_capacity(3);
    for i in 0..quad.len() {
        let q1 = quad[i];
        let q2 = quad[(i + 1) % quad.len()];
        crossings.clear();
        let mut coincident = false;

        for j in 0..3 {
            let t1 = tri.uvs[j];
            let t2 = tri.uvs[(j + 1) % 3];
            let p1 = tri.positions[j];
            let p2 = tri.positions[(j + 1) % 3];
            if !boxes_overlap(q1, q2, t1, t2) {
                continue;
            }
            let dir = t2 - t1;
            match intersect_ray_line(t1, dir, q1, q2) {
                LineCrossing::Coincident => {
                    out.extend(coincident_overlap(q1, q2, (t1, p1), (t2, p2)));
                    coincident = true;
                    break;
                }
                LineCrossing::At(t) if (0.0..=1.0).contains(&t) => {
                    let point = t1 + dir * t;
                    if within_quad_edge(point, q1, q2) {
                        crossings.push((p1 + (p2 - p1) * t, point));
                    }
                }
                _ => {}
            }
        }
        if coincident {
            continue;
        }

        match crossings.as_slice() {
            [(pa, uva), (pb, uvb), ..] => out.push(HitTestEdge::new(*pa, *pb, *uva, *uvb)),
            [(pa, uva)] => {
                for endpoint in [q1, q2] {
                    if let Some(p) = point_in_triangle(endpoint, &tri.uvs, &tri.positions) {
                        out.push(HitTestEdge::new(*pa, p, *uva, endpoint));
                    }
                }
            }
            [] => {
                let start = point_in_triangle(q1, &tri.uvs, &tri.positions);
                let end = point_in_triangle(q2, &tri.uvs, &tri.positions);
                if let (Some(start), Some(end)) = (start, end) {
                    out.push(HitTestEdge::new(start, end, q1, q2));
                }
            }
        }
    }
}

/// Clip a silhouette or boundary edge `(p1, uv1)-(p2, uv2)` to the quad
/// polygon and push what remains.
///
/// An edge collinear with a quad edge contributes the collinear overlap and
/// nothing else.
pub fn clip_edge_to_quad(
    p1: DVec3,
    p2: DVec3,
    uv1: DVec2,
    uv2: DVec2,
    quad: &[DVec2; 4],
    out: &mut Vec<HitTestEdge>,
) {
    let mut crossings: Vec<(DVec3, DVec2)> = Vec::with_capacity(4);
    let dir = uv2 - uv1;
    for i in 0..quad.len() {
        let q1 = quad[i];
        let q2 = quad[(i + 1) % quad.len()];
        if !boxes_overlap(q1, q2, uv1, uv2) {
            continue;
        }
        match intersect_ray_line(uv1, dir, q1, q2) {
            LineCrossing::Coincident => {
                out.extend(coincident_overlap(q1, q2, (uv1, p1), (uv2, p2)));
                return;
            }
            LineCrossing::At(t) if (0.0..=1.0).contains(&t) => {
                let point = uv1 + dir * t;
                if within_quad_edge(point, q1, q2) {
                    crossings.push((p1 + (p2 - p1) * t, point));
                }
            }
            _ => {}
        }
    }

    match crossings.as_slice() {
        [(pa, uva), (pb, uvb), ..] => out.push(HitTestEdge::new(*pa, *pb, *uva, *uvb)),
        [(pa, uva)] => {
            if point_in_polygon(quad, uv1) {
                out.push(HitTestEdge::new(*pa, p1, *uva, uv1));
            }
            if point_in_polygon(quad, uv2) {
                out.push(HitTestEdge::new(*pa, p2, *uva, uv2));
            }
        }
        [] => {
            if point_in_polygon(quad, uv1) && point_in_polygon(quad, uv2) {
                out.push(HitTestEdge::new(p1, p2, uv1, uv2));
            }
        }
    }
}
