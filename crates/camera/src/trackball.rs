//! Virtual trackball that turns pointer drags into a model transform.

use glam::{DMat4, DQuat, DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Which button is held while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragButton {
    /// Rotate around the trackball centre.
    Rotate,
    /// Scale uniformly; dragging down zooms in.
    Zoom,
}

/// Accumulates drags on a `width x height` surface into rotation and scale.
#[derive(Debug, Clone)]
pub struct Trackball {
    rotation: DQuat,
    scale: f64,
    previous_2d: DVec2,
    previous_3d: DVec3,
}

impl Default for Trackball {
    fn default() -> Self {
        Self {
            rotation: DQuat::IDENTITY,
            scale: 1.0,
            previous_2d: DVec2::ZERO,
            previous_3d: DVec3::Z,
        }
    }
}

impl Trackball {
    /// Fresh trackball with identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer pressed at `position` on a surface of `size` pixels.
    pub fn begin(&mut self, position: DVec2, size: DVec2) {
        self.previous_2d = position;
        self.previous_3d = project_to_trackball(size, position);
    }

    /// Pointer moved to `position` with `button` held.
    pub fn drag(&mut self, position: DVec2, size: DVec2, button: DragButton) {
        match button {
            DragButton::Rotate => self.track(position, size),
            DragButton::Zoom => self.zoom(position),
        }
        self.previous_2d = position;
    }

    fn track(&mut self, position: DVec2, size: DVec2) {
        let current = project_to_trackball(size, position);
        let axis = self.previous_3d.cross(current);
        let angle = self.previous_3d.angle_between(current);
        if let Some(axis) = axis.try_normalize() {
            let delta = DQuat::from_axis_angle(axis, -angle);
            self.rotation = (self.rotation * delta).normalize();
        }
        self.previous_3d = current;
    }

    fn zoom(&mut self, position: DVec2) {
        let dy = position.y - self.previous_2d.y;
        self.scale *= (dy / 100.0).exp();
    }

    /// Accumulated rotation.
    pub fn rotation(&self) -> DQuat {
        self.rotation
    }

    /// Accumulated uniform scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Model transform: scale, then rotate.
    pub fn transform(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(DVec3::splat(self.scale), self.rotation, DVec3::ZERO)
    }
}

/// Map a surface point onto the unit hemisphere facing the viewer.
fn project_to_trackball(size: DVec2, point: DVec2) -> DVec3 {
    let x = point.x / (size.x / 2.0) - 1.0;
    let y = 1.0 - point.y / (size.y / 2.0);
    let z2 = 1.0 - x * x - y * y;
    let z = if z2 > 0.0 { z2.sqrt() } else { 0.0 };
    DVec3::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: DVec2 = DVec2::new(200.0, 200.0);

    #[test]
    fn centre_projects_to_pole() {
        assert_eq!(project_to_trackball(SIZE, DVec2::new(100.0, 100.0)), DVec3::Z);
        let rim = project_to_trackball(SIZE, DVec2::new(200.0, 100.0));
        assert_eq!(rim, DVec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn horizontal_drag_rotates_about_vertical_axis() {
        let mut ball = Trackball::new();
        ball.begin(DVec2::new(100.0, 100.0), SIZE);
        ball.drag(DVec2::new(150.0, 100.0), SIZE, DragButton::Rotate);
        let (axis, angle) = ball.rotation().to_axis_angle();
        assert!(angle > 0.1);
        assert!(axis.y.abs() > 0.99);
        assert!(axis.x.abs() < 1e-9 && axis.z.abs() < 1e-9);
    }

    #[test]
    fn stationary_drag_keeps_identity() {
        let mut ball = Trackball::new();
        ball.begin(DVec2::new(40.0, 60.0), SIZE);
        ball.drag(DVec2::new(40.0, 60.0), SIZE, DragButton::Rotate);
        assert_eq!(ball.rotation(), DQuat::IDENTITY);
    }

    #[test]
    fn vertical_zoom_scales_exponentially() {
        let mut ball = Trackball::new();
        ball.begin(DVec2::new(0.0, 0.0), SIZE);
        ball.drag(DVec2::new(0.0, 100.0), SIZE, DragButton::Zoom);
        assert!((ball.scale() - 1f64.exp()).abs() < 1e-12);
        let p = ball.transform().transform_point3(DVec3::X);
        assert!((p.x - 1f64.exp()).abs() < 1e-12);
    }
}
