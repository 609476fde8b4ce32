//! Edge adjacency bookkeeping for one silhouette pass.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use glam::{DMat4, DVec2, DVec3};
use serde::Serialize;

/// Which side of a triangle faces the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceSide {
    /// Normal points towards the camera.
    Front,
    /// Normal points away from the camera (or the camera lies in its plane).
    Back,
}

/// Undirected mesh edge with its endpoints in lexicographic (x, y, z) order,
/// so both windings of a shared edge produce the same key.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    /// Lexicographically smaller endpoint.
    pub start: DVec3,
    /// Lexicographically larger endpoint.
    pub end: DVec3,
}

impl Edge {
    /// Canonicalize `(a, b)`. The flag is true when the endpoints were swapped.
    pub fn canonical(a: DVec3, b: DVec3) -> (Self, bool) {
        if precedes(a, b) || a == b {
            (Self { start: a, end: b }, false)
        } else {
            (Self { start: b, end: a }, true)
        }
    }

    fn bits(&self) -> [u64; 6] {
        // Adding zero folds -0.0 into +0.0.
        let bits = |v: f64| (v + 0.0).to_bits();
        [
            bits(self.start.x),
            bits(self.start.y),
            bits(self.start.z),
            bits(self.end.x),
            bits(self.end.y),
            bits(self.end.z),
        ]
    }
}

fn precedes(a: DVec3, b: DVec3) -> bool {
    a.x < b.x || (a.x == b.x && (a.y < b.y || (a.y == b.y && a.z < b.z)))
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

/// Adjacency record for one [`Edge`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeInfo {
    /// At least one front-facing triangle uses the edge.
    pub has_front_face: bool,
    /// At least one back-facing triangle uses the edge.
    pub has_back_face: bool,
    /// Number of triangles using the edge, degenerate ones included.
    pub shared_count: u32,
    /// Texture coordinate of `Edge::start` as seen from a front face.
    pub front_uv1: DVec2,
    /// Texture coordinate of `Edge::end` as seen from a front face.
    pub front_uv2: DVec2,
}

impl EdgeInfo {
    /// Seen from both a front and a back face.
    pub fn is_silhouette(&self) -> bool {
        self.has_front_face && self.has_back_face
    }

    /// Front-facing edge of an open mesh with no neighbour.
    pub fn is_boundary(&self) -> bool {
        self.has_front_face && self.shared_count == 1
    }
}

/// Map from canonical edges to arena-allocated [`EdgeInfo`] records.
///
/// Records keep first-encounter order, and [`EdgeTable::clear`] keeps the
/// allocations for the next pass.
#[derive(Debug, Default)]
pub struct EdgeTable {
    index: HashMap<Edge, usize>,
    arena: Vec<(Edge, EdgeInfo)>,
}

impl EdgeTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every record.
    pub fn clear(&mut self) {
        self.index.clear();
        self.arena.clear();
    }

    /// Number of distinct edges seen.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// True when no edge has been recorded.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Record one triangle edge `a -> b` with texture coordinates
    /// `uv_a`/`uv_b`. `side` is `None` for degenerate triangles, which only
    /// bump the share count.
    ///
    /// Returns the edge and its record when this call made the edge a
    /// silhouette for the first time.
    pub fn record(
        &mut self,
        a: DVec3,
        b: DVec3,
        uv_a: DVec2,
        uv_b: DVec2,
        side: Option<FaceSide>,
    ) -> Option<(Edge, EdgeInfo)> {
        let (edge, swapped) = Edge::canonical(a, b);
        let (uv_start, uv_end) = if swapped { (uv_b, uv_a) } else { (uv_a, uv_b) };
        let slot = match self.index.get(&edge) {
            Some(&slot) => slot,
            None => {
                self.arena.push((edge, EdgeInfo::default()));
                self.index.insert(edge, self.arena.len() - 1);
                self.arena.len() - 1
            }
        };
        let (key, info) = &mut self.arena[slot];
        let was_silhouette = info.is_silhouette();
        info.shared_count += 1;
        match side {
            Some(FaceSide::Front) => {
                info.has_front_face = true;
                info.front_uv1 = uv_start;
                info.front_uv2 = uv_end;
            }
            Some(FaceSide::Back) => info.has_back_face = true,
            None => {}
        }
        (!was_silhouette && info.is_silhouette()).then_some((*key, *info))
    }

    /// Look up the record for the edge between `a` and `b`.
    pub fn get(&self, a: DVec3, b: DVec3) -> Option<&EdgeInfo> {
        let (edge, _) = Edge::canonical(a, b);
        self.index.get(&edge).map(|&slot| &self.arena[slot].1)
    }

    /// Records in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = &(Edge, EdgeInfo)> {
        self.arena.iter()
    }
}

/// A visible edge ready for 2D hit testing.
///
/// Built by the silhouette extractor with 3D and texture endpoints; the
/// screen endpoints are filled in by [`HitTestEdge::project`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HitTestEdge {
    /// First endpoint in mesh-local space.
    pub p1: DVec3,
    /// Second endpoint in mesh-local space.
    pub p2: DVec3,
    /// Texture coordinate of `p1`.
    pub uv1: DVec2,
    /// Texture coordinate of `p2`.
    pub uv2: DVec2,
    /// `p1` in screen space.
    pub screen1: DVec2,
    /// `p2` in screen space.
    pub screen2: DVec2,
}

impl HitTestEdge {
    /// Unprojected edge.
    pub fn new(p1: DVec3, p2: DVec3, uv1: DVec2, uv2: DVec2) -> Self {
        Self {
            p1,
            p2,
            uv1,
            uv2,
            screen1: DVec2::ZERO,
            screen2: DVec2::ZERO,
        }
    }

    /// Transform both endpoints through `object_to_screen` (with perspective
    /// divide) and keep x/y.
    pub fn project(&mut self, object_to_screen: &DMat4) {
        self.screen1 = object_to_screen.project_point3(self.p1).truncate();
        self.screen2 = object_to_screen.project_point3(self.p2).truncate();
    }
}
