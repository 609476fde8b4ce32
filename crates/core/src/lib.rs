#![warn(missing_docs)]
//! Core data model shared across the workspace: meshes, texture-space
//! rectangles, error taxonomy and the transforms a host hands to the hit
//! tester.

mod error;
mod geometry;
mod mesh;
pub mod primitives;
pub mod texcoords;

pub use error::HitError;
pub use geometry::Rect;
pub use mesh::{Mesh, MeshError, Triangle};

use glam::{DMat4, DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// 3D position in mesh-local space.
pub type Vertex3 = DVec3;

/// Normalized texture coordinate. Nominally in [0,1]², but clipping math may
/// produce values outside that range.
pub type TexCoord = DVec2;

/// Stable identifier of a mesh instance registered with the hit tester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

/// Stable identifier of the interactive 2D content painted onto a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

/// Transforms the host computes per frame for one mesh instance.
///
/// `None` stands for "not available" (no camera, empty viewport, no path to a
/// 2D ancestor); consumers treat it as an invalid transform.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceTransforms {
    /// Mesh-local space to camera space. Its inverse locates the camera in
    /// mesh-local space.
    pub object_to_camera: Option<DMat4>,
    /// Mesh-local space to 2D screen (viewport) space.
    pub object_to_2d: Option<DMat4>,
}

impl SurfaceTransforms {
    /// Transforms that are both unavailable.
    pub const INVALID: Self = Self {
        object_to_camera: None,
        object_to_2d: None,
    };

    /// Build from two always-available matrices.
    pub fn new(object_to_camera: DMat4, object_to_2d: DMat4) -> Self {
        Self {
            object_to_camera: Some(object_to_camera),
            object_to_2d: Some(object_to_2d),
        }
    }

    /// Whether both transforms were supplied.
    pub fn is_complete(&self) -> bool {
        self.object_to_camera.is_some() && self.object_to_2d.is_some()
    }
}

/// Returns true when the matrix has a finite, non-zero determinant.
pub fn is_invertible(matrix: &DMat4) -> bool {
    let det = matrix.determinant();
    det != 0.0 && det.is_finite()
}
