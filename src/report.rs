//! JSON results of a probe run.

use glam::DVec2;
use meshpick_core::{ElementId, SurfaceId};
use meshpick_hit::{ClosestIntersectionInfo, HitTestEdge, PointerRouter};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{PointerConfig, SceneConfig};

#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub surfaces: usize,
    pub pointers: Vec<PointerResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<SurfaceEdges>,
}

#[derive(Debug, Serialize)]
pub struct PointerResult {
    pub step: usize,
    pub position: DVec2,
    pub captured: Option<ElementId>,
    pub hit: Option<ClosestIntersectionInfo>,
}

/// Visible edges of one surface over its whole content, in screen space.
#[derive(Debug, Serialize)]
pub struct SurfaceEdges {
    pub surface: SurfaceId,
    pub element: ElementId,
    pub recomputes: u64,
    pub edges: Vec<HitTestEdge>,
}

impl ProbeReport {
    /// Replay `pointers` in order against the scene's surfaces.
    pub fn run(scene: &SceneConfig, pointers: &[PointerConfig], dump_edges: bool) -> Self {
        let mut router = scene.build_router();
        let results = pointers
            .iter()
            .enumerate()
            .map(|(step, pointer)| {
                let hit = router.pointer_moved(pointer.position, pointer.capture.as_ref());
                debug!(
                    step,
                    x = pointer.position.x,
                    y = pointer.position.y,
                    hit = hit.is_some(),
                    "pointer moved"
                );
                PointerResult {
                    step,
                    position: pointer.position,
                    captured: pointer.capture.map(|c| c.element),
                    hit,
                }
            })
            .collect();
        let edges = if dump_edges {
            dump(&mut router)
        } else {
            Vec::new()
        };
        Self {
            surfaces: router.surfaces().len(),
            pointers: results,
            edges,
        }
    }
}

fn dump(router: &mut PointerRouter) -> Vec<SurfaceEdges> {
    let ids: Vec<SurfaceId> = router.surfaces().iter().map(|s| s.id()).collect();
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        let Some(surface) = router.surface_mut(id) else {
            continue;
        };
        let quad = match surface.mapper() {
            Ok(mapper) => mapper.texture_quad(&surface.content_bounds()),
            Err(err) => {
                warn!(surface = id.0, %err, "skipping edge dump");
                continue;
            }
        };
        let edges = surface.visual_edges(&quad).to_vec();
        out.push(SurfaceEdges {
            surface: id,
            element: surface.element(),
            recomputes: surface.cache().recompute_count(),
            edges,
        });
    }
    out
}
