//! Point-in-triangle and point-in-convex-polygon tests in texture space.

use glam::{DVec2, DVec3};

/// Barycentric containment of `p` in the texture-space triangle `uvs`.
///
/// Weights `s`, `t` for the second and third corners are solved from the two
/// edge vectors leaving the first corner. The triangle is half-open: the
/// edges through the first corner are inside, the far edge (where `s + t`
/// reaches 1) is outside. On success returns the matching point on the 3D
/// triangle `positions`, interpolated with the same weights.
pub fn point_in_triangle(p: DVec2, uvs: &[DVec2; 3], positions: &[DVec3; 3]) -> Option<DVec3> {
    let a = uvs[1] - uvs[0];
    let b = uvs[2] - uvs[0];
    let c = p - uvs[0];

    let det = a.x * b.y - b.x * a.y;
    if det == 0.0 {
        return None;
    }
    let s = (c.x * b.y - b.x * c.y) / det;

    let det = b.x * a.y - a.x * b.y;
    if det == 0.0 {
        return None;
    }
    let t = (c.x * a.y - a.x * c.y) / det;

    let unit = 0.0..=1.0;
    if !unit.contains(&s) || !unit.contains(&t) || s + t >= 1.0 {
        return None;
    }
    Some((1.0 - s - t) * positions[0] + s * positions[1] + t * positions[2])
}

/// Winding-agnostic containment in a convex polygon: inside iff the cross
/// product of every edge with the vector back from its start to `p` has the
/// same sign. A zero cross product counts as negative, so whether a point on
/// an edge is inside depends on the polygon's winding.
pub fn point_in_polygon(polygon: &[DVec2], p: DVec2) -> bool {
    let mut first_sign = None;
    for (i, &start) in polygon.iter().enumerate() {
        let end = polygon[(i + 1) % polygon.len()];
        let positive = (end - start).perp_dot(start - p) > 0.0;
        match first_sign {
            None => first_sign = Some(positive),
            Some(sign) if sign != positive => return false,
            Some(_) => {}
        }
    }
    true
}
