//! One mesh instance with interactive content painted on it.

use glam::{DMat4, DVec2};
use meshpick_core::{ElementId, HitError, Mesh, Rect, SurfaceId, SurfaceTransforms};
use serde::Serialize;
use tracing::warn;

use crate::config::HitTestConfig;
use crate::edge::HitTestEdge;
use crate::locate::{nearest_edge, project_edges};
use crate::mapper::CoordinateMapper;
use crate::raycast::{raycast_mesh, screen_ray, MeshRayHit};
use crate::silhouette::{Dirty, EdgeCache, SilhouetteExtractor};

/// Where a pointer query landed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClosestIntersectionInfo {
    /// Texture coordinate of the hit.
    pub uv: DVec2,
    /// Content element painted on the surface.
    pub element: ElementId,
    /// Mesh instance hit.
    pub surface: SurfaceId,
}

/// A ray-cast hit together with its screen depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectHit {
    /// Hit reported to the caller.
    pub info: ClosestIntersectionInfo,
    /// Depth of the hit point in viewport space; smaller is nearer.
    pub depth: f64,
    /// Raw mesh intersection.
    pub ray: MeshRayHit,
}

/// Binds a mesh, the content element drawn on it, and the per-instance
/// extraction state.
#[derive(Debug)]
pub struct InteractiveSurface {
    id: SurfaceId,
    element: ElementId,
    mesh: Mesh,
    content_bounds: Rect,
    transforms: SurfaceTransforms,
    config: HitTestConfig,
    extractor: SilhouetteExtractor,
    cache: EdgeCache,
    last_edges: Vec<HitTestEdge>,
}

impl InteractiveSurface {
    /// New surface with unavailable transforms and default tunables.
    pub fn new(id: SurfaceId, element: ElementId, mesh: Mesh, content_bounds: Rect) -> Self {
        Self {
            id,
            element,
            mesh,
            content_bounds,
            transforms: SurfaceTransforms::INVALID,
            config: HitTestConfig::default(),
            extractor: SilhouetteExtractor::new(),
            cache: EdgeCache::new(),
            last_edges: Vec::new(),
        }
    }

    /// Replace the tunables.
    pub fn with_config(mut self, config: HitTestConfig) -> Self {
        self.config = config;
        self
    }

    /// Identifier the host registered this surface under.
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Content element painted on the mesh.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Current geometry.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Content bounds in content pixels.
    pub fn content_bounds(&self) -> Rect {
        self.content_bounds
    }

    /// Transforms from the last [`set_transforms`](Self::set_transforms).
    pub fn transforms(&self) -> SurfaceTransforms {
        self.transforms
    }

    /// Hit-testing tunables.
    pub fn config(&self) -> &HitTestConfig {
        &self.config
    }

    /// Extraction cache, mostly for its recompute counter.
    pub fn cache(&self) -> &EdgeCache {
        &self.cache
    }

    /// Push this frame's transforms. A new camera transform invalidates the
    /// cache; a new 2D transform is caught by the cache key.
    pub fn set_transforms(&mut self, transforms: SurfaceTransforms) {
        if transforms.object_to_camera != self.transforms.object_to_camera {
            self.cache.mark_dirty(Dirty::TRANSFORM);
        }
        self.transforms = transforms;
    }

    /// Swap the geometry.
    pub fn set_mesh(&mut self, mesh: Mesh) {
        self.mesh = mesh;
        self.cache.mark_dirty(Dirty::GEOMETRY);
    }

    /// Resize or move the content.
    pub fn set_content_bounds(&mut self, bounds: Rect) {
        if bounds != self.content_bounds {
            self.content_bounds = bounds;
            self.cache.mark_dirty(Dirty::MATERIAL);
        }
    }

    /// Mapper over the content bounds.
    pub fn mapper(&self) -> Result<CoordinateMapper, HitError> {
        CoordinateMapper::new(self.content_bounds)
    }

    /// Visible edges inside the texture-space `quad`, projected to the
    /// screen. Empty when the transforms are unavailable.
    pub fn visual_edges(&mut self, quad: &[DVec2; 4]) -> &[HitTestEdge] {
        let SurfaceTransforms {
            object_to_camera,
            object_to_2d,
        } = self.transforms;
        let mut edges = self
            .extractor
            .extract(&self.mesh, object_to_camera, object_to_2d, quad, &mut self.cache);
        if let Some(object_to_2d) = object_to_2d {
            project_edges(&mut edges, &object_to_2d);
        }
        self.last_edges = edges;
        &self.last_edges
    }

    /// Edges from the most recent [`visual_edges`](Self::visual_edges) call.
    pub fn last_silhouette_edges(&self) -> &[HitTestEdge] {
        &self.last_edges
    }

    /// Nearest visible point of the whole content to `point`.
    pub fn hit_test(&mut self, point: DVec2) -> Option<ClosestIntersectionInfo> {
        let mapper = self.checked_mapper()?;
        let quad = mapper.texture_quad(&self.content_bounds);
        let nearest = nearest_edge(point, self.visual_edges(&quad))?;
        Some(self.intersection(nearest.uv))
    }

    /// Nearest visible point of a captured sub-element, whose bounds are given
    /// in content pixels. A hit on the capture border is pushed just outside
    /// it so the element sees the pointer leave.
    pub fn hit_test_captured(
        &mut self,
        point: DVec2,
        capture_bounds: &Rect,
    ) -> Option<ClosestIntersectionInfo> {
        let mapper = self.checked_mapper()?;
        let quad = mapper.texture_quad(capture_bounds);
        let nearest = nearest_edge(point, self.visual_edges(&quad))?;
        let visual = push_past_border(mapper.to_visual(nearest.uv), capture_bounds, &self.config);
        Some(self.intersection(mapper.to_texture(visual)))
    }

    /// Ray-cast `point` straight onto the mesh.
    pub fn pick(&self, point: DVec2) -> Option<DirectHit> {
        let object_to_2d: DMat4 = self.transforms.object_to_2d?;
        let ray = screen_ray(&object_to_2d, point)?;
        let hit = raycast_mesh(&self.mesh, ray.origin, ray.direction)?;
        Some(DirectHit {
            info: self.intersection(hit.uv),
            depth: object_to_2d.project_point3(hit.position).z,
            ray: hit,
        })
    }

    fn checked_mapper(&self) -> Option<CoordinateMapper> {
        match self.mapper() {
            Ok(mapper) => Some(mapper),
            Err(err) => {
                warn!(surface = self.id.0, %err, "cannot map content bounds");
                None
            }
        }
    }

    fn intersection(&self, uv: DVec2) -> ClosestIntersectionInfo {
        ClosestIntersectionInfo {
            uv,
            element: self.element,
            surface: self.id,
        }
    }
}

fn push_past_border(mut point: DVec2, bounds: &Rect, config: &HitTestConfig) -> DVec2 {
    let slack = config.edge_slack;
    let nudge = config.edge_nudge;
    if point.x <= bounds.left + slack {
        point.x -= nudge;
    }
    if point.y <= bounds.top + slack {
        point.y -= nudge;
    }
    if point.x >= bounds.right() - slack {
        point.x += nudge;
    }
    if point.y >= bounds.bottom() - slack {
        point.y += nudge;
    }
    point
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_hits_are_pushed_outwards() {
        let bounds = Rect::new(10.0, 10.0, 100.0, 50.0);
        let config = HitTestConfig::default();
        assert_eq!(
            push_past_border(DVec2::new(10.5, 30.0), &bounds, &config),
            DVec2::new(8.5, 30.0)
        );
        assert_eq!(
            push_past_border(DVec2::new(109.5, 59.0), &bounds, &config),
            DVec2::new(111.5, 61.0)
        );
        assert_eq!(
            push_past_border(DVec2::new(50.0, 30.0), &bounds, &config),
            DVec2::new(50.0, 30.0)
        );
    }

    #[test]
    fn degenerate_bounds_never_hit() {
        let mut surface = InteractiveSurface::new(
            SurfaceId(1),
            ElementId(2),
            meshpick_core::primitives::plane_grid(1.0, 1.0, 1, 1),
            Rect::new(0.0, 0.0, 0.0, 0.0),
        );
        surface.set_transforms(SurfaceTransforms::new(DMat4::IDENTITY, DMat4::IDENTITY));
        assert!(surface.hit_test(DVec2::ZERO).is_none());
    }

    #[test]
    fn unavailable_transforms_never_hit() {
        let mut surface = InteractiveSurface::new(
            SurfaceId(1),
            ElementId(2),
            meshpick_core::primitives::plane_grid(1.0, 1.0, 1, 1),
            Rect::new(0.0, 0.0, 100.0, 100.0),
        );
        assert!(surface.hit_test(DVec2::ZERO).is_none());
        assert!(surface.pick(DVec2::ZERO).is_none());
        assert!(surface.last_silhouette_edges().is_empty());
    }

    #[test]
    fn content_bounds_change_marks_material_dirty() {
        let mut surface = InteractiveSurface::new(
            SurfaceId(1),
            ElementId(2),
            Mesh::default(),
            Rect::new(0.0, 0.0, 100.0, 100.0),
        );
        surface.set_content_bounds(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(surface.cache().dirty().is_empty());
        surface.set_content_bounds(Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(surface.cache().dirty(), Dirty::MATERIAL);
        surface.set_transforms(SurfaceTransforms::new(DMat4::IDENTITY, DMat4::IDENTITY));
        assert_eq!(surface.cache().dirty(), Dirty::MATERIAL | Dirty::TRANSFORM);
    }
}
