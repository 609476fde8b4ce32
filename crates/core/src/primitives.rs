//! Procedural meshes used by the probe CLI and the tests.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::Mesh;

/// Parameters for a latitude/longitude sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereParams {
    /// Longitude subdivisions.
    pub slices: u32,
    /// Latitude subdivisions.
    pub stacks: u32,
    /// Sphere centre.
    pub center: DVec3,
    /// Sphere radius.
    pub radius: f64,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            slices: 64,
            stacks: 32,
            center: DVec3::ZERO,
            radius: 1.0,
        }
    }
}

/// Textured globe: `(slices + 1) * (stacks + 1)` vertices with a duplicated
/// seam column so the texture wraps once around. `u` runs with the slice and
/// `v` runs from the north pole (0) to the south pole (1).
///
/// The seam and pole vertices are duplicated, so the mesh is not welded and
/// reports boundary edges along the seam.
pub fn uv_sphere(params: &SphereParams) -> Mesh {
    let slices = params.slices.max(3);
    let stacks = params.stacks.max(2);
    let mut positions = Vec::with_capacity(((slices + 1) * (stacks + 1)) as usize);
    let mut texture_coordinates = Vec::with_capacity(positions.capacity());

    for stack in 0..=stacks {
        let phi = FRAC_PI_2 - stack as f64 * PI / stacks as f64;
        let y = params.radius * phi.sin();
        let scale = -params.radius * phi.cos();
        for slice in 0..=slices {
            let theta = slice as f64 * TAU / slices as f64;
            let x = scale * theta.sin();
            let z = scale * theta.cos();
            positions.push(DVec3::new(x, y, z) + params.center);
            texture_coordinates.push(DVec2::new(
                slice as f64 / slices as f64,
                stack as f64 / stacks as f64,
            ));
        }
    }

    let mut triangle_indices = Vec::new();
    for stack in 0..stacks {
        let top = stack * (slices + 1);
        let bottom = (stack + 1) * (slices + 1);
        for slice in 0..slices {
            if stack != 0 {
                triangle_indices.extend([top + slice, bottom + slice, top + slice + 1]);
            }
            if stack != stacks - 1 {
                triangle_indices.extend([top + slice + 1, bottom + slice, bottom + slice + 1]);
            }
        }
    }

    Mesh::new(positions, texture_coordinates, triangle_indices)
}

/// Closed, welded sphere with outward winding: one vertex per pole and one
/// ring of `slices` vertices per interior latitude. Every edge is shared by
/// exactly two triangles.
pub fn welded_sphere(params: &SphereParams) -> Mesh {
    let slices = params.slices.max(3);
    let stacks = params.stacks.max(2);
    let mut positions = Vec::new();
    let mut texture_coordinates = Vec::new();

    positions.push(params.center + DVec3::new(0.0, params.radius, 0.0));
    texture_coordinates.push(DVec2::new(0.5, 0.0));
    for ring in 1..stacks {
        let phi = FRAC_PI_2 - ring as f64 * PI / stacks as f64;
        let y = params.radius * phi.sin();
        let r = params.radius * phi.cos();
        for slice in 0..slices {
            let theta = slice as f64 * TAU / slices as f64;
            positions.push(params.center + DVec3::new(r * theta.cos(), y, r * theta.sin()));
            texture_coordinates.push(DVec2::new(
                slice as f64 / slices as f64,
                ring as f64 / stacks as f64,
            ));
        }
    }
    let south = positions.len() as u32;
    positions.push(params.center - DVec3::new(0.0, params.radius, 0.0));
    texture_coordinates.push(DVec2::new(0.5, 1.0));

    let ring_vertex = |ring: u32, slice: u32| 1 + (ring - 1) * slices + slice % slices;
    let mut triangle_indices = Vec::new();
    for slice in 0..slices {
        triangle_indices.extend([0, ring_vertex(1, slice + 1), ring_vertex(1, slice)]);
    }
    for ring in 1..stacks - 1 {
        for slice in 0..slices {
            let upper = ring_vertex(ring, slice);
            let upper_next = ring_vertex(ring, slice + 1);
            let lower = ring_vertex(ring + 1, slice);
            let lower_next = ring_vertex(ring + 1, slice + 1);
            triangle_indices.extend([upper, upper_next, lower_next]);
            triangle_indices.extend([upper, lower_next, lower]);
        }
    }
    for slice in 0..slices {
        triangle_indices.extend([
            ring_vertex(stacks - 1, slice),
            ring_vertex(stacks - 1, slice + 1),
            south,
        ]);
    }

    Mesh::new(positions, texture_coordinates, triangle_indices)
}

/// Flat `columns x rows` grid in the z = 0 plane spanning `[-w/2, w/2] x
/// [-h/2, h/2]`, facing +z. Texture `v` grows downwards (screen convention),
/// so the top-left corner maps to (0,0).
pub fn plane_grid(width: f64, height: f64, columns: u32, rows: u32) -> Mesh {
    let columns = columns.max(1);
    let rows = rows.max(1);
    let mut positions = Vec::new();
    let mut texture_coordinates = Vec::new();
    for row in 0..=rows {
        let v = row as f64 / rows as f64;
        for column in 0..=columns {
            let u = column as f64 / columns as f64;
            positions.push(DVec3::new((u - 0.5) * width, (0.5 - v) * height, 0.0));
            texture_coordinates.push(DVec2::new(u, v));
        }
    }
    let stride = columns + 1;
    let mut triangle_indices = Vec::new();
    for row in 0..rows {
        for column in 0..columns {
            let top_left = row * stride + column;
            let top_right = top_left + 1;
            let bottom_left = top_left + stride;
            let bottom_right = bottom_left + 1;
            triangle_indices.extend([top_left, bottom_left, bottom_right]);
            triangle_indices.extend([top_left, bottom_right, top_right]);
        }
    }
    Mesh::new(positions, texture_coordinates, triangle_indices)
}
