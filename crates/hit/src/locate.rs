//! Screen-space projection of visible edges and the nearest-edge query.

use glam::{DMat4, DVec2};
use serde::Serialize;

use crate::edge::HitTestEdge;

/// Project every edge through `object_to_screen`. Only the screen endpoints
/// change, so projecting twice with the same matrix is harmless.
pub fn project_edges(edges: &mut [HitTestEdge], object_to_screen: &DMat4) {
    for edge in edges {
        edge.project(object_to_screen);
    }
}

/// Result of [`nearest_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NearestEdge {
    /// Texture coordinate at the closest point.
    pub uv: DVec2,
    /// Screen distance from the query point.
    pub distance: f64,
    /// Closest point in screen space.
    pub point: DVec2,
    /// Index of the winning edge.
    pub edge_index: usize,
}

/// Closest point over all projected edges to `point`.
///
/// The texture coordinate is interpolated by the distance ratio along the
/// winning edge; zero-length edges report their first texture coordinate.
/// On ties the earlier edge wins. Edges whose screen distance is not finite
/// are skipped; `None` when no edge is left.
pub fn nearest_edge(point: DVec2, edges: &[HitTestEdge]) -> Option<NearestEdge> {
    let mut best: Option<NearestEdge> = None;
    for (edge_index, edge) in edges.iter().enumerate() {
        let span = edge.screen2 - edge.screen1;
        let length_squared = span.length_squared();
        let closest = if length_squared == 0.0 {
            edge.screen1
        } else {
            let along = span.dot(point - edge.screen1);
            if along < 0.0 {
                edge.screen1
            } else if along > length_squared {
                edge.screen2
            } else {
                edge.screen1 + span * (along / length_squared)
            }
        };
        let distance = point.distance(closest);
        // Endpoints projected from the camera plane come out infinite or NaN.
        if !distance.is_finite() {
            continue;
        }
        if best.map_or(true, |b| distance < b.distance) {
            let uv = if length_squared == 0.0 {
                edge.uv1
            } else {
                let ratio = closest.distance(edge.screen1) / length_squared.sqrt();
                edge.uv1 + ratio * (edge.uv2 - edge.uv1)
            };
            best = Some(NearestEdge {
                uv,
                distance,
                point: closest,
                edge_index,
            });
        }
    }
    best
}
