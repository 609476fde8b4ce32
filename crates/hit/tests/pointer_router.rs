//! Direct picking across surfaces and the captured off-mesh fallback.

use glam::{DMat4, DQuat, DVec2, DVec3};
use meshpick_camera::{Camera, SceneView, Viewport};
use meshpick_core::primitives::plane_grid;
use meshpick_core::{ElementId, Rect, SurfaceId};
use meshpick_hit::{CaptureTarget, HitTestConfig, InteractiveSurface, PointerRouter};
use meshpick_testkit::{init_test_tracing, HitRecord, JsonlSink};

const CONTENT: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);
const CENTRE: DVec2 = DVec2::new(100.0, 100.0);
/// Left of the back plane's projection.
const OFF_MESH: DVec2 = DVec2::new(5.0, 100.0);
/// Keeps the centre ray off grid vertices and diagonals.
const SHIFT: DVec3 = DVec3::new(0.1, 0.2, 0.0);
/// Texture coordinate under the centre ray for the shifted back plane.
const CENTRE_UV: DVec2 = DVec2::new(0.45, 0.6);

fn view() -> SceneView {
    SceneView::new(
        Camera::looking_at(DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO, 45.0),
        Viewport::new(200.0, 200.0),
    )
}

fn plane(id: u64, element: u64, model: DMat4) -> InteractiveSurface {
    let mut surface = InteractiveSurface::new(
        SurfaceId(id),
        ElementId(element),
        plane_grid(2.0, 2.0, 2, 2),
        CONTENT,
    );
    surface.set_transforms(view().surface_transforms(&model));
    surface
}

fn back_plane() -> InteractiveSurface {
    plane(1, 10, DMat4::from_translation(SHIFT))
}

/// The back plane plus a smaller plane one unit closer to the camera.
fn two_planes() -> PointerRouter {
    let mut router = PointerRouter::new();
    router.add_surface(back_plane());
    router.add_surface(plane(
        2,
        20,
        DMat4::from_scale_rotation_translation(
            DVec3::splat(0.25),
            DQuat::IDENTITY,
            DVec3::new(0.02, 0.04, 1.0),
        ),
    ));
    router
}

#[test]
fn direct_hit_reports_texture_coordinate() {
    init_test_tracing();
    let mut router = PointerRouter::new();
    router.add_surface(back_plane());
    let hit = router.pointer_moved(CENTRE, None).expect("centre is on the plane");
    assert_eq!(hit.surface, SurfaceId(1));
    assert!((hit.uv - CENTRE_UV).length() < 1e-9, "{}", hit.uv);
    assert_eq!(router.last_valid(), Some(hit));
}

#[test]
fn nearest_surface_wins() {
    let mut router = two_planes();
    let hit = router.pointer_moved(CENTRE, None).expect("hit");
    assert_eq!(hit.surface, SurfaceId(2));
    assert_eq!(hit.element, ElementId(20));

    let capture = CaptureTarget {
        element: ElementId(10),
        bounds: CONTENT,
    };
    let captured = router.pointer_moved(CENTRE, Some(&capture)).expect("hit");
    assert_eq!(captured.surface, SurfaceId(1));
}

#[test]
fn off_mesh_without_capture_is_a_miss() {
    let mut router = two_planes();
    router.pointer_moved(CENTRE, None);
    assert!(router.pointer_moved(OFF_MESH, None).is_none());
}

#[test]
fn captured_pointer_off_mesh_falls_back_to_edges() {
    let mut router = PointerRouter::new();
    router.add_surface(back_plane());
    let capture = CaptureTarget {
        element: ElementId(10),
        bounds: CONTENT,
    };

    // No direct hit yet, so there is no surface to fall back on.
    assert!(router.pointer_moved(OFF_MESH, Some(&capture)).is_none());

    router.pointer_moved(CENTRE, Some(&capture)).expect("on mesh");
    let fallback = router
        .pointer_moved(OFF_MESH, Some(&capture))
        .expect("edge fallback");
    assert_eq!(fallback.surface, SurfaceId(1));
    assert!(fallback.uv.x < 0.0, "pushed past the left border: {:?}", fallback.uv);
    assert!((fallback.uv.x + 0.02).abs() < 1e-9);
    // Pointer row maps to world y = 0, which is v = 0.6 on the shifted plane.
    assert!((fallback.uv.y - 0.6).abs() < 1e-9);
    // The fallback does not replace the last direct hit.
    assert!((router.last_valid().expect("kept").uv - CENTRE_UV).length() < 1e-9);
}

#[test]
fn surfaces_can_opt_out_of_direct_picking() {
    let mut router = PointerRouter::new();
    router.add_surface(back_plane().with_config(HitTestConfig {
        direct_pick: false,
        ..Default::default()
    }));
    assert!(router.pointer_moved(CENTRE, None).is_none());
}

#[test]
fn hit_log_records_a_pointer_sweep() {
    let mut router = two_planes();
    let path = std::env::temp_dir().join(format!("meshpick-router-{}.jsonl", std::process::id()));
    let mut sink = JsonlSink::create(&path).expect("sink");
    for (step, x) in (0..=200).step_by(25).enumerate() {
        let pointer = DVec2::new(x as f64, 100.0);
        let hit = router.pointer_moved(pointer, None);
        sink.write(&HitRecord {
            step: step as u64,
            kind: "direct",
            pointer,
            surface: hit.map(|h| h.surface),
            uv: hit.map(|h| h.uv),
        })
        .expect("write");
    }
    drop(sink);
    let log = std::fs::read_to_string(&path).expect("log");
    assert_eq!(log.lines().count(), 9);
    let _ = std::fs::remove_file(&path);
}
