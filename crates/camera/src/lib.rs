#![warn(missing_docs)]
//! Projection cameras and the world→camera / world→viewport transforms the
//! hit tester consumes.
//!
//! Matrices follow glam's column-vector convention: `a * b` applies `b`
//! first. Clip-space depth runs from 0 at the near plane to 1 at the far
//! plane, and the viewport transform flips y so screen y grows downwards.

mod trackball;

pub use trackball::{DragButton, Trackball};

use glam::{DMat4, DVec3, DVec4};
use meshpick_core::{is_invertible, SurfaceTransforms};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a camera transform cannot be built.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum TransformError {
    /// Viewport has no area.
    #[error("viewport {width}x{height} has no area")]
    DegenerateViewport {
        /// Viewport width.
        width: f64,
        /// Viewport height.
        height: f64,
    },
    /// The camera's own transform cannot be inverted.
    #[error("camera transform is not invertible")]
    SingularCameraTransform,
}

/// How camera space is mapped to clip space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Projection {
    /// Pinhole projection with a horizontal field of view.
    Perspective {
        /// Horizontal field of view in degrees.
        field_of_view_degrees: f64,
    },
    /// Parallel projection.
    Orthographic {
        /// Width of the view volume in camera units.
        width: f64,
    },
    /// Caller-supplied view and projection matrices.
    Matrix {
        /// World to camera space.
        view: DMat4,
        /// Camera to clip space.
        projection: DMat4,
    },
}

/// Projection camera looking along `look_direction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Eye position in world space.
    pub position: DVec3,
    /// Viewing direction; need not be normalized.
    pub look_direction: DVec3,
    /// Approximate up direction.
    pub up_direction: DVec3,
    /// Distance to the near clipping plane.
    pub near_plane: f64,
    /// Distance to the far clipping plane; may be infinite.
    pub far_plane: f64,
    /// Projection model.
    pub projection: Projection,
    /// Additional transform applied to the camera itself.
    pub transform: Option<DMat4>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, 5.0),
            look_direction: DVec3::NEG_Z,
            up_direction: DVec3::Y,
            near_plane: 0.125,
            far_plane: f64::INFINITY,
            projection: Projection::Perspective {
                field_of_view_degrees: 45.0,
            },
            transform: None,
        }
    }
}

impl Camera {
    /// Perspective camera at `position` looking at `target`.
    pub fn looking_at(position: DVec3, target: DVec3, field_of_view_degrees: f64) -> Self {
        Self {
            position,
            look_direction: target - position,
            projection: Projection::Perspective {
                field_of_view_degrees,
            },
            ..Default::default()
        }
    }

    /// Compute the view matrix (world space -> camera space).
    pub fn view_matrix(&self) -> DMat4 {
        if let Projection::Matrix { view, .. } = self.projection {
            return view;
        }
        DMat4::look_to_rh(self.position, self.look_direction.normalize(), self.up_direction)
    }

    /// Compute the projection matrix (camera space -> clip space).
    pub fn projection_matrix(&self, aspect_ratio: f64) -> DMat4 {
        let near = self.near_plane;
        let far = self.far_plane;
        match self.projection {
            Projection::Perspective {
                field_of_view_degrees,
            } => {
                let x_scale = 1.0 / (field_of_view_degrees.to_radians() / 2.0).tan();
                let y_scale = aspect_ratio * x_scale;
                let z_scale = if far == f64::INFINITY {
                    -1.0
                } else {
                    far / (near - far)
                };
                DMat4::from_cols(
                    DVec4::new(x_scale, 0.0, 0.0, 0.0),
                    DVec4::new(0.0, y_scale, 0.0, 0.0),
                    DVec4::new(0.0, 0.0, z_scale, -1.0),
                    DVec4::new(0.0, 0.0, near * z_scale, 0.0),
                )
            }
            Projection::Orthographic { width } => {
                let height = width / aspect_ratio;
                let z_scale = 1.0 / (near - far);
                DMat4::from_cols(
                    DVec4::new(2.0 / width, 0.0, 0.0, 0.0),
                    DVec4::new(0.0, 2.0 / height, 0.0, 0.0),
                    DVec4::new(0.0, 0.0, z_scale, 0.0),
                    DVec4::new(0.0, 0.0, near * z_scale, 1.0),
                )
            }
            Projection::Matrix { projection, .. } => projection,
        }
    }
}

/// Output rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Viewport {
    /// Viewport anchored at the origin.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    /// Width / height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    fn validate(&self) -> Result<(), TransformError> {
        let usable = |v: f64| v > 0.0 && v.is_finite();
        if usable(self.width) && usable(self.height) {
            Ok(())
        } else {
            Err(TransformError::DegenerateViewport {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Map homogeneous clip coordinates onto the viewport, flipping y.
    pub fn homogeneous_to_viewport(&self) -> DMat4 {
        let sx = self.width / 2.0;
        let sy = self.height / 2.0;
        DMat4::from_cols(
            DVec4::new(sx, 0.0, 0.0, 0.0),
            DVec4::new(0.0, -sy, 0.0, 0.0),
            DVec4::new(0.0, 0.0, 1.0, 0.0),
            DVec4::new(self.x + sx, self.y + sy, 0.0, 1.0),
        )
    }
}

/// World space -> camera space, including the inverse of the camera's own
/// transform.
pub fn world_to_camera(camera: &Camera, viewport: &Viewport) -> Result<DMat4, TransformError> {
    viewport.validate()?;
    let mut result = camera.view_matrix();
    if let Some(transform) = camera.transform {
        if !is_invertible(&transform) {
            return Err(TransformError::SingularCameraTransform);
        }
        result *= transform.inverse();
    }
    Ok(result)
}

/// World space -> viewport pixels (x, y) plus clip depth (z).
pub fn world_to_viewport(camera: &Camera, viewport: &Viewport) -> Result<DMat4, TransformError> {
    let world_to_camera = world_to_camera(camera, viewport)?;
    Ok(viewport.homogeneous_to_viewport()
        * camera.projection_matrix(viewport.aspect_ratio())
        * world_to_camera)
}

/// A camera rendering into a viewport: the host's 3D scene as far as the hit
/// tester is concerned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneView {
    /// Active camera.
    pub camera: Camera,
    /// Output rectangle.
    pub viewport: Viewport,
}

impl SceneView {
    /// Create a scene view.
    pub fn new(camera: Camera, viewport: Viewport) -> Self {
        Self { camera, viewport }
    }

    /// Transforms for a mesh placed in the world by `model` (object ->
    /// world). Unavailable transforms come back as `None`.
    pub fn surface_transforms(&self, model: &DMat4) -> SurfaceTransforms {
        SurfaceTransforms {
            object_to_camera: world_to_camera(&self.camera, &self.viewport)
                .ok()
                .map(|m| m * *model),
            object_to_2d: world_to_viewport(&self.camera, &self.viewport)
                .ok()
                .map(|m| m * *model),
        }
    }
}
