//! Visible-edge extraction with a single-entry cache.

use glam::{DMat4, DVec2, DVec3};
use meshpick_core::{is_invertible, HitError, Mesh, Rect, Triangle};
use tracing::{debug, trace, warn};

use crate::clip::{clip_edge_to_quad, clip_quad_against_triangle};
use crate::edge::{EdgeTable, FaceSide, HitTestEdge};

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    /// Reasons the cached edge list can no longer be trusted.
    pub struct Dirty: u8 {
        /// Mesh positions, texture coordinates or indices changed.
        const GEOMETRY = 0b0000_0001;
        /// Content bounds or material mapping changed.
        const MATERIAL = 0b0000_0010;
        /// Transforms changed outside the cache key.
        const TRANSFORM = 0b0000_0100;
    }
}

impl Default for Dirty {
    fn default() -> Self {
        Dirty::empty()
    }
}

/// Last extraction result keyed by bounding quad and object-to-2D transform.
///
/// Keys compare bit-for-bit, so a transform that is recomputed to the same
/// value still hits.
#[derive(Debug, Default)]
pub struct EdgeCache {
    quad: Option<[DVec2; 4]>,
    object_to_2d: Option<DMat4>,
    edges: Vec<HitTestEdge>,
    dirty: Dirty,
    recompute_count: u64,
}

impl EdgeCache {
    /// Empty cache; the first lookup always misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the next extraction to recompute.
    pub fn mark_dirty(&mut self, flags: Dirty) {
        self.dirty |= flags;
    }

    /// Pending dirty flags.
    pub fn dirty(&self) -> Dirty {
        self.dirty
    }

    /// Drop the stored entry.
    pub fn invalidate(&mut self) {
        self.quad = None;
        self.object_to_2d = None;
        self.edges.clear();
    }

    /// Number of full extraction passes stored in this cache.
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    /// Edges of the last stored pass (unprojected).
    pub fn edges(&self) -> &[HitTestEdge] {
        &self.edges
    }

    fn lookup(&self, quad: &[DVec2; 4], object_to_2d: &DMat4) -> Option<&[HitTestEdge]> {
        if !self.dirty.is_empty() {
            return None;
        }
        let stored_quad = self.quad.as_ref()?;
        let stored_matrix = self.object_to_2d.as_ref()?;
        let same_quad = stored_quad
            .iter()
            .zip(quad)
            .all(|(a, b)| a.x.to_bits() == b.x.to_bits() && a.y.to_bits() == b.y.to_bits());
        let same_matrix = stored_matrix
            .to_cols_array()
            .iter()
            .zip(object_to_2d.to_cols_array().iter())
            .all(|(a, b)| a.to_bits() == b.to_bits());
        (same_quad && same_matrix).then_some(self.edges.as_slice())
    }

    fn store(&mut self, quad: &[DVec2; 4], object_to_2d: DMat4, edges: &[HitTestEdge]) {
        self.quad = Some(*quad);
        self.object_to_2d = Some(object_to_2d);
        self.edges.clear();
        self.edges.extend_from_slice(edges);
        self.dirty = Dirty::empty();
        self.recompute_count += 1;
    }
}

/// Walks a mesh and produces the silhouette, mesh-boundary and content-border
/// edges visible inside a texture-space quad.
#[derive(Debug, Default)]
pub struct SilhouetteExtractor {
    table: EdgeTable,
}

impl SilhouetteExtractor {
    /// Extractor with an empty edge table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adjacency gathered by the last full pass.
    pub fn edge_table(&self) -> &EdgeTable {
        &self.table
    }

    /// Visible edges of `mesh` clipped to `quad`, in mesh-local space and not
    /// yet projected.
    ///
    /// Missing transforms or a singular `object_to_camera` yield an empty
    /// list. When `cache` holds a clean entry for the same quad and
    /// `object_to_2d`, its edges are returned without walking the mesh.
    pub fn extract(
        &mut self,
        mesh: &Mesh,
        object_to_camera: Option<DMat4>,
        object_to_2d: Option<DMat4>,
        quad: &[DVec2; 4],
        cache: &mut EdgeCache,
    ) -> Vec<HitTestEdge> {
        let (Some(object_to_camera), Some(object_to_2d)) = (object_to_camera, object_to_2d) else {
            debug!(error = %HitError::InvalidTransform, "surface transforms unavailable");
            return Vec::new();
        };
        if !is_invertible(&object_to_camera) {
            debug!(error = %HitError::InvalidTransform, "camera transform is singular");
            return Vec::new();
        }
        if let Some(edges) = cache.lookup(quad, &object_to_2d) {
            trace!(edges = edges.len(), "edge cache hit");
            return edges.to_vec();
        }

        let camera = object_to_camera.inverse().transform_point3(DVec3::ZERO);
        let edges = self.walk(mesh, camera, quad);
        cache.store(quad, object_to_2d, &edges);
        debug!(
            triangles = mesh.triangle_count(),
            distinct_edges = self.table.len(),
            emitted = edges.len(),
            recompute_count = cache.recompute_count(),
            "silhouette pass"
        );
        edges
    }

    fn walk(&mut self, mesh: &Mesh, camera: DVec3, quad: &[DVec2; 4]) -> Vec<HitTestEdge> {
        if let Err(err) = mesh.validate() {
            warn!(%err, "mesh has unusable triangles, skipping them");
        }
        self.table.clear();
        let quad_bounds = Rect::from_points(quad.iter().copied());
        let mut edges = Vec::new();
        let mut degenerate = 0usize;

        for tri in mesh.triangles() {
            if !tri.uv_bounds().intersects(&quad_bounds) {
                continue;
            }
            let side = classify(&tri, camera);
            if side.is_none() {
                degenerate += 1;
            }
            self.record_edges(&tri, side, quad, &mut edges);
            if side == Some(FaceSide::Front) {
                clip_quad_against_triangle(&tri, quad, &mut edges);
            }
        }
        if degenerate > 0 {
            trace!(
                count = degenerate,
                reason = %HitError::DegenerateGeometry("zero-area triangle"),
                "triangles skipped for face classification"
            );
        }

        for (edge, info) in self.table.iter() {
            if info.is_boundary() {
                clip_edge_to_quad(edge.start, edge.end, info.front_uv1, info.front_uv2, quad, &mut edges);
            }
        }
        edges
    }

    fn record_edges(
        &mut self,
        tri: &Triangle,
        side: Option<FaceSide>,
        quad: &[DVec2; 4],
        out: &mut Vec<HitTestEdge>,
    ) {
        for k in 0..3 {
            let next = (k + 1) % 3;
            let became_silhouette = self.table.record(
                tri.positions[k],
                tri.positions[next],
                tri.uvs[k],
                tri.uvs[next],
                side,
            );
            if let Some((edge, info)) = became_silhouette {
                clip_edge_to_quad(edge.start, edge.end, info.front_uv1, info.front_uv2, quad, out);
            }
        }
    }
}

/// Front when the camera lies strictly on the side the normal points to.
/// `None` for zero-area triangles.
fn classify(tri: &Triangle, camera: DVec3) -> Option<FaceSide> {
    let normal = tri.normal();
    if normal == DVec3::ZERO {
        return None;
    }
    if normal.dot(camera - tri.positions[0]) > 0.0 {
        Some(FaceSide::Front)
    } else {
        Some(FaceSide::Back)
    }
}
