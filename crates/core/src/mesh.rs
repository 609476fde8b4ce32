//! Indexed triangle meshes with per-vertex texture coordinates.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Rect;

/// Structural problems in mesh data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references vertex {index}, but only {vertex_count} exist")]
    IndexOutOfRange {
        /// Triangle ordinal.
        triangle: usize,
        /// Offending index.
        index: u32,
        /// Number of positions in the mesh.
        vertex_count: usize,
    },
    /// Fewer texture coordinates than positions.
    #[error("mesh has {positions} positions but {texture_coordinates} texture coordinates")]
    MissingTextureCoordinates {
        /// Number of positions.
        positions: usize,
        /// Number of texture coordinates.
        texture_coordinates: usize,
    },
    /// Index count is not a multiple of three.
    #[error("index count {0} is not a multiple of 3")]
    PartialTriangle(usize),
}

/// Triangle mesh owned by the host. Read-only to the hit tester.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions in mesh-local space.
    pub positions: Vec<DVec3>,
    /// Texture coordinates, parallel to `positions`.
    #[serde(default)]
    pub texture_coordinates: Vec<DVec2>,
    /// Three indices per triangle.
    pub triangle_indices: Vec<u32>,
}

/// One resolved triangle: positions and texture coordinates of its corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Corner positions in winding order.
    pub positions: [DVec3; 3],
    /// Corner texture coordinates in winding order.
    pub uvs: [DVec2; 3],
}

impl Triangle {
    /// Unnormalized face normal `(p1 - p0) x (p2 - p0)`.
    pub fn normal(&self) -> DVec3 {
        let [p0, p1, p2] = self.positions;
        (p1 - p0).cross(p2 - p0)
    }

    /// Texture-space bounding box of the corners.
    pub fn uv_bounds(&self) -> Rect {
        Rect::from_points(self.uvs)
    }
}

impl Mesh {
    /// Create a mesh from its three buffers.
    pub fn new(positions: Vec<DVec3>, texture_coordinates: Vec<DVec2>, triangle_indices: Vec<u32>) -> Self {
        Self {
            positions,
            texture_coordinates,
            triangle_indices,
        }
    }

    /// Number of complete index triples.
    pub fn triangle_count(&self) -> usize {
        self.triangle_indices.len() / 3
    }

    /// Resolve triangle `index`.
    ///
    /// Returns `None` when any corner is out of range or lacks a texture
    /// coordinate; such triangles contribute nothing to hit testing.
    pub fn triangle(&self, index: usize) -> Option<Triangle> {
        let base = index.checked_mul(3)?;
        let corners = self.triangle_indices.get(base..base + 3)?;
        let mut positions = [DVec3::ZERO; 3];
        let mut uvs = [DVec2::ZERO; 3];
        for (slot, &vertex) in corners.iter().enumerate() {
            let vertex = vertex as usize;
            positions[slot] = *self.positions.get(vertex)?;
            uvs[slot] = *self.texture_coordinates.get(vertex)?;
        }
        Some(Triangle { positions, uvs })
    }

    /// Iterate over resolvable triangles, skipping broken ones.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.triangle_count()).filter_map(|index| self.triangle(index))
    }

    /// Check the structural invariants, reporting the first violation.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.triangle_indices.len() % 3 != 0 {
            return Err(MeshError::PartialTriangle(self.triangle_indices.len()));
        }
        if self.texture_coordinates.len() < self.positions.len() {
            return Err(MeshError::MissingTextureCoordinates {
                positions: self.positions.len(),
                texture_coordinates: self.texture_coordinates.len(),
            });
        }
        for (ordinal, corners) in self.triangle_indices.chunks_exact(3).enumerate() {
            if let Some(&index) = corners
                .iter()
                .find(|&&index| index as usize >= self.positions.len())
            {
                return Err(MeshError::IndexOutOfRange {
                    triangle: ordinal,
                    index,
                    vertex_count: self.positions.len(),
                });
            }
        }
        Ok(())
    }

    /// Bounding box of all positions as `(min, max)`, or `None` when empty.
    pub fn bounds(&self) -> Option<(DVec3, DVec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), &p| (min.min(p), max.max(p))),
        )
    }
}
