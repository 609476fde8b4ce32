//! Open meshes and the content border.

use glam::{DMat4, DVec2, DVec3};
use meshpick_camera::{Camera, SceneView, Viewport};
use meshpick_core::primitives::plane_grid;
use meshpick_core::SurfaceTransforms;
use meshpick_hit::{EdgeCache, HitTestEdge, SilhouetteExtractor};
use meshpick_testkit::assert_closed_loops;

const OPEN_QUAD: [DVec2; 4] = [
    DVec2::new(-1.0, -1.0),
    DVec2::new(2.0, -1.0),
    DVec2::new(2.0, 2.0),
    DVec2::new(-1.0, 2.0),
];

fn transforms_from(eye: DVec3) -> SurfaceTransforms {
    SceneView::new(Camera::looking_at(eye, DVec3::ZERO, 45.0), Viewport::new(200.0, 200.0))
        .surface_transforms(&DMat4::IDENTITY)
}

fn extract(eye: DVec3, quad: &[DVec2; 4]) -> Vec<HitTestEdge> {
    let transforms = transforms_from(eye);
    SilhouetteExtractor::new().extract(
        &plane_grid(2.0, 2.0, 2, 2),
        transforms.object_to_camera,
        transforms.object_to_2d,
        quad,
        &mut EdgeCache::new(),
    )
}

/// Position on the plane for a texture coordinate.
fn plane_point(uv: DVec2) -> DVec3 {
    DVec3::new((uv.x - 0.5) * 2.0, (0.5 - uv.y) * 2.0, 0.0)
}

#[test]
fn front_facing_plane_reports_its_rim() {
    let edges = extract(DVec3::new(0.0, 0.0, 5.0), &OPEN_QUAD);
    assert_eq!(edges.len(), 8);
    for edge in &edges {
        for p in [edge.p1, edge.p2] {
            assert!(p.x.abs() == 1.0 || p.y.abs() == 1.0, "{p} is inside the plane");
        }
    }
    assert!(assert_closed_loops(edges.iter().map(|e| (e.p1, e.p2))).is_ok());
}

#[test]
fn back_facing_plane_reports_nothing() {
    assert!(extract(DVec3::new(0.0, 0.0, -5.0), &OPEN_QUAD).is_empty());
}

#[test]
fn content_border_is_traced_across_triangles() {
    // Corners avoid every grid vertex and diagonal.
    let quad = [
        DVec2::new(0.1, 0.3),
        DVec2::new(0.9, 0.3),
        DVec2::new(0.9, 0.65),
        DVec2::new(0.1, 0.65),
    ];
    let edges = extract(DVec3::new(0.0, 0.0, 5.0), &quad);
    assert!(edges.len() > 4);

    let on_border = |uv: DVec2| {
        let near = |a: f64, b: f64| (a - b).abs() < 1e-12;
        near(uv.x, 0.1) || near(uv.x, 0.9) || near(uv.y, 0.3) || near(uv.y, 0.65)
    };
    let mut traced = 0.0;
    for edge in &edges {
        assert!(on_border(edge.uv1) && on_border(edge.uv2), "{edge:?}");
        assert!((edge.p1 - plane_point(edge.uv1)).length() < 1e-12);
        assert!((edge.p2 - plane_point(edge.uv2)).length() < 1e-12);
        traced += edge.uv1.distance(edge.uv2);
    }
    let perimeter = 2.0 * (0.8 + 0.35);
    assert!((traced - perimeter).abs() < 1e-9, "traced {traced}");
}

#[test]
fn content_border_on_mesh_rim_is_not_lost() {
    let full = [DVec2::ZERO, DVec2::X, DVec2::ONE, DVec2::Y];
    let edges = extract(DVec3::new(0.0, 0.0, 5.0), &full);
    assert!(!edges.is_empty());
    for edge in &edges {
        for uv in [edge.uv1, edge.uv2] {
            assert!(uv.x == 0.0 || uv.x == 1.0 || uv.y == 0.0 || uv.y == 1.0);
        }
    }
    // Every rim segment is present at least once.
    for corner in [DVec2::ZERO, DVec2::X, DVec2::ONE, DVec2::Y] {
        assert!(edges.iter().any(|e| e.uv1 == corner || e.uv2 == corner));
    }
}
