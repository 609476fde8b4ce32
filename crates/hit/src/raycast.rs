//! Direct picking: screen point to mesh-local ray, then ray to textured
//! triangle.

use glam::{DMat4, DVec2, DVec3};
use meshpick_core::{is_invertible, Mesh};
use serde::Serialize;

/// Determinant and distance threshold for ray/triangle tests.
const EPSILON: f64 = 1e-12;

/// Ray in mesh-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Point on the near plane.
    pub origin: DVec3,
    /// Unit direction away from the viewer.
    pub direction: DVec3,
}

/// Closest intersection of a ray with a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeshRayHit {
    /// Ray parameter of the hit.
    pub distance: f64,
    /// Hit point in mesh-local space.
    pub position: DVec3,
    /// Texture coordinate blended from the triangle's corners.
    pub uv: DVec2,
    /// Index of the triangle hit.
    pub triangle: usize,
    /// Barycentric weights of the three corners.
    pub weights: DVec3,
}

/// Axis-aligned bounds of a mesh, used to reject rays early.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshAabb {
    /// Minimum corner of the box
    pub min: DVec3,
    /// Maximum corner of the box
    pub max: DVec3,
}

impl MeshAabb {
    /// Bounds of every position, or `None` for an empty mesh.
    pub fn from_mesh(mesh: &Mesh) -> Option<Self> {
        mesh.bounds().map(|(min, max)| Self { min, max })
    }

    /// Slab test. Returns the entry distance, or the exit distance when the
    /// origin is inside the box.
    pub fn ray_intersection(&self, origin: DVec3, direction: DVec3) -> Option<f64> {
        let inv_dir = direction.recip();
        let t1 = (self.min - origin) * inv_dir;
        let t2 = (self.max - origin) * inv_dir;

        let tmin = t1.min(t2).max_element();
        let tmax = t1.max(t2).min_element();

        // Entire box behind the origin.
        if tmax < 0.0 {
            return None;
        }
        if tmin > tmax {
            return None;
        }
        Some(if tmin < 0.0 { tmax } else { tmin })
    }
}

/// Unproject `point` (viewport pixels) through the inverse of `object_to_2d`
/// at depths 0 and 0.5, giving a ray from the near plane into the scene.
///
/// `None` when the transform is singular or both depths land on the same
/// point.
pub fn screen_ray(object_to_2d: &DMat4, point: DVec2) -> Option<Ray> {
    if !is_invertible(object_to_2d) {
        return None;
    }
    let inverse = object_to_2d.inverse();
    let near = inverse.project_point3(point.extend(0.0));
    let farther = inverse.project_point3(point.extend(0.5));
    let direction = (farther - near).try_normalize()?;
    Some(Ray {
        origin: near,
        direction,
    })
}

/// Möller–Trumbore against one triangle, accepting either winding.
/// Returns `(t, u, v)` where `u`, `v` weight the second and third corners.
fn ray_triangle(origin: DVec3, direction: DVec3, corners: &[DVec3; 3]) -> Option<(f64, f64, f64)> {
    let [v0, v1, v2] = *corners;
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let pvec = direction.cross(edge2);
    let det = edge1.dot(pvec);
    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let tvec = origin - v0;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let qvec = tvec.cross(edge1);
    let v = direction.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(qvec) * inv_det;
    (t >= EPSILON).then_some((t, u, v))
}

/// Nearest triangle hit along the ray `origin + t * direction`.
pub fn raycast_mesh(mesh: &Mesh, origin: DVec3, direction: DVec3) -> Option<MeshRayHit> {
    MeshAabb::from_mesh(mesh)?.ray_intersection(origin, direction)?;

    let mut closest: Option<MeshRayHit> = None;
    for index in 0..mesh.triangle_count() {
        let Some(tri) = mesh.triangle(index) else {
            continue;
        };
        let Some((t, u, v)) = ray_triangle(origin, direction, &tri.positions) else {
            continue;
        };
        if closest.map_or(false, |c| t >= c.distance) {
            continue;
        }
        let weights = DVec3::new(1.0 - u - v, u, v);
        closest = Some(MeshRayHit {
            distance: t,
            position: origin + direction * t,
            uv: tri.uvs[0] * weights.x + tri.uvs[1] * weights.y + tri.uvs[2] * weights.z,
            triangle: index,
            weights,
        });
    }
    closest
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshpick_core::primitives::plane_grid;

    #[test]
    fn aabb_ray_intersection() {
        let aabb = MeshAabb {
            min: DVec3::splat(-0.5),
            max: DVec3::splat(0.5),
        };
        let hit = aabb.ray_intersection(DVec3::new(0.0, 0.0, 2.0), DVec3::NEG_Z);
        assert!((hit.expect("hit") - 1.5).abs() < 1e-12);
        assert!(aabb
            .ray_intersection(DVec3::new(2.0, 0.0, 2.0), DVec3::NEG_Z)
            .is_none());
        let inside = aabb.ray_intersection(DVec3::ZERO, DVec3::X).expect("inside");
        assert!((inside - 0.5).abs() < 1e-12);
    }

    #[test]
    fn plane_hit_blends_texture_coordinates() {
        let mesh = plane_grid(2.0, 2.0, 1, 1);
        let hit = raycast_mesh(&mesh, DVec3::new(0.5, 0.5, 5.0), DVec3::NEG_Z).expect("hit");
        assert!((hit.distance - 5.0).abs() < 1e-12);
        assert!((hit.uv - DVec2::new(0.75, 0.25)).length() < 1e-12);
        assert!(((hit.weights.x + hit.weights.y + hit.weights.z) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn back_side_is_hit_too() {
        let mesh = plane_grid(2.0, 2.0, 2, 2);
        let hit = raycast_mesh(&mesh, DVec3::new(-0.5, 0.25, -3.0), DVec3::Z).expect("hit");
        assert!((hit.uv - DVec2::new(0.25, 0.375)).length() < 1e-12);
    }

    #[test]
    fn rays_missing_or_pointing_away_report_nothing() {
        let mesh = plane_grid(2.0, 2.0, 1, 1);
        assert!(raycast_mesh(&mesh, DVec3::new(3.0, 0.0, 5.0), DVec3::NEG_Z).is_none());
        assert!(raycast_mesh(&mesh, DVec3::new(0.0, 0.0, 5.0), DVec3::Z).is_none());
        assert!(raycast_mesh(&Mesh::default(), DVec3::Z, DVec3::NEG_Z).is_none());
    }

    #[test]
    fn screen_ray_inverts_projection() {
        // Pixels = 100 * (x, y) with depth proportional to -z.
        let to_screen = DMat4::from_scale(DVec3::new(100.0, 100.0, -0.1));
        let ray = screen_ray(&to_screen, DVec2::new(50.0, 20.0)).expect("ray");
        assert!((ray.origin - DVec3::new(0.5, 0.2, 0.0)).length() < 1e-12);
        assert!((ray.direction - DVec3::NEG_Z).length() < 1e-12);
        assert!(screen_ray(&DMat4::ZERO, DVec2::ZERO).is_none());
    }
}
