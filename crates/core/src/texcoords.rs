//! Texture-coordinate generators for meshes authored without UVs.
//!
//! Each generator maps positions into texture space along a projection
//! direction. When the direction is +Y the positions are used as-is;
//! otherwise the mesh is centred on its bounding box and rotated so the
//! direction lines up with +Y first.

use std::f64::consts::{PI, TAU};

use glam::{DQuat, DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::Mesh;

/// Projection used by [`generate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TexCoordMapping {
    /// Longitude/latitude of the normalized position.
    Spherical,
    /// Longitude around the axis, height along it.
    Cylindrical,
    /// Orthographic projection onto the plane perpendicular to the axis.
    Planar,
}

/// Generate texture coordinates for every position of `mesh`.
///
/// Returns an empty list for a mesh without positions or a zero direction.
pub fn generate(mesh: &Mesh, mapping: TexCoordMapping, direction: DVec3) -> Vec<DVec2> {
    let Some(dir) = direction.try_normalize() else {
        return Vec::new();
    };
    let Some((points, min, max)) = aligned_points(mesh, dir) else {
        return Vec::new();
    };
    let size = max - min;
    points
        .into_iter()
        .map(|p| match mapping {
            TexCoordMapping::Spherical => {
                let n = p.try_normalize().unwrap_or(DVec3::ZERO);
                DVec2::new(
                    unit_circle_coordinate(-n.z, n.x),
                    1.0 - (n.y.asin() / PI + 0.5),
                )
            }
            TexCoordMapping::Cylindrical => DVec2::new(
                unit_circle_coordinate(-p.z, p.x),
                1.0 - planar_coordinate(p.y, min.y, size.y),
            ),
            TexCoordMapping::Planar => DVec2::new(
                planar_coordinate(p.x, min.x, size.x),
                planar_coordinate(p.z, min.z, size.z),
            ),
        })
        .collect()
}

fn planar_coordinate(end: f64, start: f64, width: f64) -> f64 {
    (end - start) / width
}

fn unit_circle_coordinate(y: f64, x: f64) -> f64 {
    y.atan2(x) / TAU + 0.5
}

/// Positions rotated so `dir` maps onto +Y, plus their bounding box.
fn aligned_points(mesh: &Mesh, dir: DVec3) -> Option<(Vec<DVec3>, DVec3, DVec3)> {
    let (min, max) = mesh.bounds()?;
    if dir == DVec3::Y {
        return Some((mesh.positions.clone(), min, max));
    }
    let center = (min + max) * 0.5;
    let rotation = DQuat::from_rotation_arc(dir, DVec3::Y);
    let transform = |p: DVec3| rotation * (p - center);
    let points: Vec<DVec3> = mesh.positions.iter().map(|&p| transform(p)).collect();

    // Bounds of the rotated box, not of the rotated points.
    let corners = [
        DVec3::new(min.x, min.y, min.z),
        DVec3::new(min.x, min.y, max.z),
        DVec3::new(min.x, max.y, min.z),
        DVec3::new(min.x, max.y, max.z),
        DVec3::new(max.x, min.y, min.z),
        DVec3::new(max.x, min.y, max.z),
        DVec3::new(max.x, max.y, min.z),
        DVec3::new(max.x, max.y, max.z),
    ];
    let first = transform(corners[0]);
    let (rmin, rmax) = corners[1..]
        .iter()
        .map(|&c| transform(c))
        .fold((first, first), |(lo, hi), c| (lo.min(c), hi.max(c)));
    Some((points, rmin, rmax))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{plane_grid, welded_sphere, SphereParams};

    fn close(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn spherical_maps_poles_to_top_and_bottom() {
        let mesh = welded_sphere(&SphereParams {
            slices: 8,
            stacks: 4,
            ..Default::default()
        });
        let uvs = generate(&mesh, TexCoordMapping::Spherical, DVec3::Y);
        assert_eq!(uvs.len(), mesh.positions.len());
        assert!((uvs[0].y - 0.0).abs() < 1e-9);
        assert!((uvs[uvs.len() - 1].y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn planar_along_z_spans_unit_square() {
        // The grid lies in z = 0; projecting along +Z rotates it into the xz plane.
        let mesh = plane_grid(2.0, 2.0, 1, 1);
        let uvs = generate(&mesh, TexCoordMapping::Planar, DVec3::Z);
        for uv in &uvs {
            assert!((-1e-9..=1.0 + 1e-9).contains(&uv.x));
            assert!((-1e-9..=1.0 + 1e-9).contains(&uv.y));
        }
        let distinct: Vec<_> = uvs
            .iter()
            .enumerate()
            .filter(|(i, a)| uvs[..*i].iter().all(|b| !close(**a, *b)))
            .collect();
        assert_eq!(distinct.len(), 4);
    }

    #[test]
    fn cylindrical_height_runs_top_to_bottom() {
        let mesh = Mesh::new(
            vec![DVec3::new(1.0, 0.0, 0.0), DVec3::new(1.0, 2.0, 0.0)],
            Vec::new(),
            Vec::new(),
        );
        let uvs = generate(&mesh, TexCoordMapping::Cylindrical, DVec3::Y);
        assert!(close(uvs[0], DVec2::new(0.5, 1.0)));
        assert!(close(uvs[1], DVec2::new(0.5, 0.0)));
    }

    #[test]
    fn zero_direction_yields_nothing() {
        let mesh = plane_grid(1.0, 1.0, 1, 1);
        assert!(generate(&mesh, TexCoordMapping::Planar, DVec3::ZERO).is_empty());
    }
}
