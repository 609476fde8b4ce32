//! Routes pointer moves across several surfaces.

use glam::DVec2;
use meshpick_core::{ElementId, Rect, SurfaceId};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::surface::{ClosestIntersectionInfo, InteractiveSurface};

/// An element holding pointer capture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptureTarget {
    /// Content element that owns the capture.
    pub element: ElementId,
    /// Bounds of the captured sub-element in content pixels.
    pub bounds: Rect,
}

/// Owns the surfaces of a scene and remembers the last successful hit so a
/// captured pointer that slides off the mesh keeps reporting positions.
#[derive(Debug, Default)]
pub struct PointerRouter {
    surfaces: Vec<InteractiveSurface>,
    last_valid: Option<ClosestIntersectionInfo>,
}

impl PointerRouter {
    /// Empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a surface. A surface with the same id is replaced.
    pub fn add_surface(&mut self, surface: InteractiveSurface) {
        match self.surfaces.iter_mut().find(|s| s.id() == surface.id()) {
            Some(existing) => *existing = surface,
            None => self.surfaces.push(surface),
        }
    }

    /// Surface registered under `id`.
    pub fn surface(&self, id: SurfaceId) -> Option<&InteractiveSurface> {
        self.surfaces.iter().find(|s| s.id() == id)
    }

    /// Mutable access to the surface registered under `id`.
    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut InteractiveSurface> {
        self.surfaces.iter_mut().find(|s| s.id() == id)
    }

    /// Registered surfaces in insertion order.
    pub fn surfaces(&self) -> &[InteractiveSurface] {
        &self.surfaces
    }

    /// Last hit produced by a direct pick.
    pub fn last_valid(&self) -> Option<ClosestIntersectionInfo> {
        self.last_valid
    }

    /// Resolve a pointer position.
    ///
    /// Surfaces are ray-cast first, nearest screen depth winning; while
    /// `capture` is active only surfaces showing the captured element take
    /// part. When nothing is hit under capture, the nearest visible edge of
    /// the captured element on the last hit surface is reported instead.
    pub fn pointer_moved(
        &mut self,
        point: DVec2,
        capture: Option<&CaptureTarget>,
    ) -> Option<ClosestIntersectionInfo> {
        let direct = self
            .surfaces
            .iter()
            .filter(|s| s.config().direct_pick)
            .filter(|s| capture.map_or(true, |c| s.element() == c.element))
            .filter_map(|s| s.pick(point))
            .min_by(|a, b| a.depth.total_cmp(&b.depth));

        if let Some(hit) = direct {
            trace!(surface = hit.info.surface.0, u = hit.info.uv.x, v = hit.info.uv.y, "direct hit");
            self.last_valid = Some(hit.info);
            return Some(hit.info);
        }

        let capture = capture?;
        let last = self.last_valid?;
        let surface = self.surface_mut(last.surface)?;
        let result = surface.hit_test_captured(point, &capture.bounds);
        debug!(
            surface = last.surface.0,
            found = result.is_some(),
            "captured pointer off mesh, using nearest edge"
        );
        result
    }
}
